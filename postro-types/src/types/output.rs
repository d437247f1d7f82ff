use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::{fmt, str::Utf8Error};

use super::Typed;

/// Json literal fed to the deserializer when a box holds no value.
pub const NULL_LITERAL: &[u8] = b"null";

/// Untyped view of a json box, see [`Json::get`][crate::types::Json::get].
#[derive(Debug, Clone, PartialEq)]
pub enum Dynamic<'a> {
    /// Box was never populated.
    Undefined,
    /// Box is SQL `NULL`.
    Null,
    /// Box content parsed successfully.
    Parsed(serde_json::Value),
    /// Box content is not a valid json, the raw bytes is still available.
    Unparsed(&'a [u8]),
}

impl Dynamic<'_> {
    /// Returns the parsed value, if any.
    pub fn parsed(self) -> Option<serde_json::Value> {
        match self {
            Self::Parsed(value) => Some(value),
            _ => None,
        }
    }
}

/// Output location that a json box can be assigned into.
///
/// Which conversion applies is decided by the destination type:
///
/// 1. [`String`] receives the raw json text. When box holds no value, it
///    receives an empty string, check [`Json::status`][s] to tell `NULL` apart
///    from empty.
/// 2. `Option<String>` is always set to [`Some`], then populated as in (1).
/// 3. `Option<Vec<u8>>` and `Option<Bytes>` receive a copy of raw bytes, or
///    [`None`] when box holds no value.
/// 4. Anything else, [`Typed`], [`serde_json::Value`] and primitives, is
///    deserialized using [`serde_json`], where a box without value reads as
///    [`NULL_LITERAL`].
///
/// [s]: crate::types::Json::status
pub trait Destination {
    /// Assign box content, `src` is [`None`] when box holds no value.
    fn assign(&mut self, src: Option<&[u8]>) -> Result<(), DeserializationError>;
}

impl Destination for String {
    fn assign(&mut self, src: Option<&[u8]>) -> Result<(), DeserializationError> {
        self.clear();
        if let Some(raw) = src {
            self.push_str(std::str::from_utf8(raw)?);
        }
        Ok(())
    }
}

impl Destination for Option<String> {
    fn assign(&mut self, src: Option<&[u8]>) -> Result<(), DeserializationError> {
        self.insert(String::new()).assign(src)
    }
}

impl Destination for Option<Vec<u8>> {
    fn assign(&mut self, src: Option<&[u8]>) -> Result<(), DeserializationError> {
        *self = src.map(<[u8]>::to_vec);
        Ok(())
    }
}

impl Destination for Option<Bytes> {
    fn assign(&mut self, src: Option<&[u8]>) -> Result<(), DeserializationError> {
        *self = src.map(Bytes::copy_from_slice);
        Ok(())
    }
}

impl<T: DeserializeOwned> Destination for Typed<T> {
    fn assign(&mut self, src: Option<&[u8]>) -> Result<(), DeserializationError> {
        self.0 = deserialize(src)?;
        Ok(())
    }
}

macro_rules! structured {
    ($($ty:ty),*) => {
        $(
            impl Destination for $ty {
                fn assign(&mut self, src: Option<&[u8]>) -> Result<(), DeserializationError> {
                    *self = deserialize(src)?;
                    Ok(())
                }
            }
        )*
    };
}

structured!(bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, serde_json::Value);

/// Deserialize box content, reading missing value as [`NULL_LITERAL`].
pub(crate) fn deserialize<T: DeserializeOwned>(src: Option<&[u8]>) -> Result<T, DeserializationError> {
    Ok(serde_json::from_slice(src.unwrap_or(NULL_LITERAL))?)
}

/// An error when assigning json box into a [`Destination`].
pub enum DeserializationError {
    /// Raw json is not a valid utf8.
    Utf8(Utf8Error),
    /// Failed to deserialize using `serde_json`.
    Json(serde_json::Error),
}

impl std::error::Error for DeserializationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Utf8(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}

impl fmt::Display for DeserializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("failed to deserialize value, ")?;
        match self {
            Self::Utf8(e) => write!(f, "{e}"),
            Self::Json(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Debug for DeserializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

macro_rules! from {
    (<$ty:ty>$pat:pat => $body:expr) => {
        impl From<$ty> for DeserializationError {
            fn from($pat: $ty) -> Self {
                $body
            }
        }
    };
}

from!(<Utf8Error>e => Self::Utf8(e));
from!(<serde_json::Error>e => Self::Json(e));
