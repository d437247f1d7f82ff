//! Generic scan and value protocol.
//!
//! For callers that does not speak postgres wire format, value boxes can be
//! populated from and converted into the driver native [`SqlValue`].
use bytes::Bytes;
use std::fmt;

use crate::{Result, ext::FmtExt};

/// Driver native value.
#[derive(Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Bytes),
}

impl SqlValue {
    /// Returns the name of current value kind.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int8",
            Self::Float(_) => "float8",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytea",
        }
    }

    /// Returns `true` if value is [`SqlValue::Null`].
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Debug for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(b) => fmt::Debug::fmt(b, f),
            Self::Int(i) => fmt::Debug::fmt(i, f),
            Self::Float(n) => fmt::Debug::fmt(n, f),
            Self::Text(s) => fmt::Debug::fmt(s, f),
            Self::Bytes(b) => fmt::Debug::fmt(&b.lossy(), f),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&[u8]> for SqlValue {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(Bytes::copy_from_slice(value))
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value.into())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A value box that can be populated from, and converted into [`SqlValue`].
pub trait Scan {
    /// Populate self from driver native value.
    fn scan(&mut self, src: SqlValue) -> Result<()>;

    /// Convert self into driver native value.
    fn value(&self) -> Result<SqlValue>;
}

/// An error when [`Scan::scan`] receive unsupported value kind.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TypeMismatchError {
    kind: &'static str,
}

impl TypeMismatchError {
    pub(crate) const fn new(kind: &'static str) -> Self {
        Self { kind }
    }

    /// Returns the name of received value kind.
    pub const fn kind(&self) -> &'static str {
        self.kind
    }
}

impl std::error::Error for TypeMismatchError { }

impl fmt::Display for TypeMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot scan {}", self.kind)
    }
}

impl fmt::Debug for TypeMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}
