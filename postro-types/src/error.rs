//! `postro-types` error types.
use std::{backtrace::Backtrace, fmt};

use crate::{
    codec::{DecodeError, UndefinedValueError},
    postgres::ProtocolError,
    scan::TypeMismatchError,
};

#[cfg(feature = "json")]
use crate::types::{DeserializationError, SerializationError};

/// A specialized [`Result`] type for `postro-types` operation.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// All possible error from `postro-types` library.
pub struct Error {
    backtrace: Backtrace,
    kind: ErrorKind,
}

impl Error {
    /// Returns the error kind.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Consume self into the error kind.
    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

/// All possible error kind from `postro-types` library.
pub enum ErrorKind {
    /// Encoding a box that never populated.
    Undefined(UndefinedValueError),
    /// Wire payload rejected while decoding.
    Decode(DecodeError),
    /// Framing does not follow the protocol.
    Protocol(ProtocolError),
    /// Generic scan received unsupported value kind.
    TypeMismatch(TypeMismatchError),
    /// Failed to serialize input value.
    #[cfg(feature = "json")]
    Serialization(SerializationError),
    /// Failed to deserialize into destination.
    #[cfg(feature = "json")]
    Deserialization(DeserializationError),
}

macro_rules! from {
    (<$ty:ty>$pat:pat => $body:expr) => {
        impl From<$ty> for Error {
            fn from($pat: $ty) -> Self {
                let backtrace = std::backtrace::Backtrace::capture();
                Self { backtrace, kind: $body }
            }
        }
    };
}

from!(<ErrorKind>e => e);
from!(<UndefinedValueError>e => ErrorKind::Undefined(e));
from!(<DecodeError>e => ErrorKind::Decode(e));
from!(<ProtocolError>e => ErrorKind::Protocol(e));
from!(<TypeMismatchError>e => ErrorKind::TypeMismatch(e));
#[cfg(feature = "json")]
from!(<SerializationError>e => ErrorKind::Serialization(e));
#[cfg(feature = "json")]
from!(<DeserializationError>e => ErrorKind::Deserialization(e));

impl std::error::Error for Error { }

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)?;

        if let std::backtrace::BacktraceStatus::Captured = self.backtrace.status() {
            let mut backtrace = self.backtrace.to_string();
            write!(f, "\n\n")?;
            writeln!(f, "Stack backtrace:")?;
            backtrace.truncate(backtrace.trim_end().len());
            write!(f, "{}", backtrace)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

impl std::error::Error for ErrorKind { }

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined(e) => fmt::Display::fmt(e, f),
            Self::Decode(e) => fmt::Display::fmt(e, f),
            Self::Protocol(e) => fmt::Display::fmt(e, f),
            Self::TypeMismatch(e) => fmt::Display::fmt(e, f),
            #[cfg(feature = "json")]
            Self::Serialization(e) => fmt::Display::fmt(e, f),
            #[cfg(feature = "json")]
            Self::Deserialization(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl fmt::Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn error_kind_from_source() {
        let err = Error::from(UndefinedValueError);
        assert!(matches!(err.kind(), ErrorKind::Undefined(_)));
        assert!(err.to_string().starts_with("cannot encode undefined value"));

        let err = Error::from(TypeMismatchError::new("bool"));
        assert!(matches!(err.into_kind(), ErrorKind::TypeMismatch(e) if e.kind() == "bool"));
    }
}
