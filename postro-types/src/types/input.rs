use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Application value that can be written into a json box.
///
/// Text and bytes are taken as already valid json and stored as is, any other
/// value goes through [`serde_json`] serializer via [`Typed`].
///
/// [`None`] and `()` are SQL `NULL`.
pub trait JsonSource {
    /// Normalize self into raw json, returns [`None`] for `NULL`.
    fn into_raw(self) -> Result<Option<Bytes>, SerializationError>;
}

/// Serialize or deserialize the inner value using [`serde_json`].
///
/// As a [`JsonSource`], the inner value is serialized when written into a box.
/// As a [`Destination`][crate::types::Destination], the inner value is
/// deserialized from the box content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Typed<T>(pub T);

impl<T> Typed<T> {
    /// Consume self into the inner value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl JsonSource for () {
    fn into_raw(self) -> Result<Option<Bytes>, SerializationError> {
        Ok(None)
    }
}

impl<S: JsonSource> JsonSource for Option<S> {
    fn into_raw(self) -> Result<Option<Bytes>, SerializationError> {
        match self {
            Some(src) => src.into_raw(),
            None => Ok(None),
        }
    }
}

macro_rules! raw {
    (<$lf:lifetime $(, const $n:ident: usize)?> $ty:ty) => {
        impl<$lf $(, const $n: usize)?> JsonSource for $ty {
            fn into_raw(self) -> Result<Option<Bytes>, SerializationError> {
                Ok(Some(Bytes::copy_from_slice(self.as_ref())))
            }
        }
    };
    ($ty:ty) => {
        impl JsonSource for $ty {
            fn into_raw(self) -> Result<Option<Bytes>, SerializationError> {
                Ok(Some(Bytes::from(self)))
            }
        }
    };
}

raw!(<'a> &'a str);
raw!(<'a> &'a String);
raw!(<'a> &'a [u8]);
raw!(<'a, const N: usize> &'a [u8; N]);
raw!(<'a> &'a Vec<u8>);
raw!(String);
raw!(Vec<u8>);
raw!(Bytes);

impl JsonSource for &Bytes {
    fn into_raw(self) -> Result<Option<Bytes>, SerializationError> {
        Ok(Some(self.clone()))
    }
}

impl JsonSource for serde_json::Value {
    fn into_raw(self) -> Result<Option<Bytes>, SerializationError> {
        (&self).into_raw()
    }
}

impl JsonSource for &serde_json::Value {
    fn into_raw(self) -> Result<Option<Bytes>, SerializationError> {
        serialize(self)
    }
}

impl<T: Serialize> JsonSource for Typed<T> {
    fn into_raw(self) -> Result<Option<Bytes>, SerializationError> {
        serialize(&self.0)
    }
}

impl<T: Serialize> JsonSource for &Typed<T> {
    fn into_raw(self) -> Result<Option<Bytes>, SerializationError> {
        serialize(&self.0)
    }
}

fn serialize<T: Serialize + ?Sized>(value: &T) -> Result<Option<Bytes>, SerializationError> {
    match serde_json::to_vec(value) {
        Ok(ok) => Ok(Some(ok.into())),
        Err(err) => Err(SerializationError(err)),
    }
}

impl<T: Serialize> Serialize for Typed<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Typed<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Self(T::deserialize(deserializer)?))
    }
}

/// An error when [`serde_json`] failed to serialize a [`JsonSource`].
pub struct SerializationError(serde_json::Error);

impl SerializationError {
    /// Returns the underlying [`serde_json`] error.
    pub fn inner(&self) -> &serde_json::Error {
        &self.0
    }
}

impl std::error::Error for SerializationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl fmt::Display for SerializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to serialize value, {}", self.0)
    }
}

impl fmt::Debug for SerializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}
