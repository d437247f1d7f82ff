//! Value box nullability.
use std::fmt;

/// Tri-state nullability of a value box.
///
/// A box starts as [`Undefined`][Status::Undefined], which is not the same as SQL `NULL`:
/// it means nothing was ever assigned or decoded, and encoding it is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// Never populated.
    #[default]
    Undefined,
    /// SQL `NULL`.
    Null,
    /// Holds raw bytes.
    Present,
}

impl Status {
    /// Returns `true` if status is [`Status::Present`].
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Present)
    }

    /// Returns `true` if status is [`Status::Null`].
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if status is [`Status::Undefined`].
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Present => "present",
        })
    }
}

#[cfg(test)]
mod test {
    use super::Status;

    #[test]
    fn default_is_undefined() {
        let status = Status::default();
        assert!(status.is_undefined());
        assert!(!status.is_null());
        assert!(!status.is_present());
        assert_eq!(status.to_string(), "undefined");
    }
}
