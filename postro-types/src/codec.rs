//! Wire format decoding and encoding.
//!
//! - [`PgValue`]
//! - [`Context`]
//! - [`IsNull`]
//!
//! - [`DecodeError`]
//! - [`UndefinedValueError`]
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

use crate::{
    Result,
    common::{unit_error, verbose},
    postgres::{PgFormat, PgType, ProtocolError},
};

/// Opaque connection context passed through decode and encode.
///
/// Value boxes in this crate never inspect it. It is reserved for codecs that
/// need to resolve type oids of nested values.
#[derive(Debug, Clone, Default)]
pub struct Context {
    _priv: (),
}

impl Context {
    /// Create new empty [`Context`].
    pub const fn new() -> Self {
        Self { _priv: () }
    }
}

/// Whether encoding produced a value or SQL `NULL`.
///
/// [`IsNull::Yes`] is not the same as an empty value, the framer must send
/// the `NULL` indicator instead of zero length bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsNull {
    /// Value is `NULL`, no bytes written.
    Yes,
    /// Value written to the buffer.
    No,
}

/// A value box that can be decoded from and encoded to postgres wire format.
///
/// `src` of [`None`] in decoding means the wire reported `NULL`.
///
/// Encoding appends to `buf` and never touches bytes already in it.
pub trait PgValue: PgType {
    /// Decode value in text format.
    fn decode_text(&mut self, ctx: &Context, src: Option<&[u8]>) -> Result<()>;

    /// Decode value in binary format.
    fn decode_binary(&mut self, ctx: &Context, src: Option<&[u8]>) -> Result<()>;

    /// Encode value in text format.
    fn encode_text(&self, ctx: &Context, buf: &mut BytesMut) -> Result<IsNull>;

    /// Encode value in binary format.
    fn encode_binary(&self, ctx: &Context, buf: &mut BytesMut) -> Result<IsNull>;

    /// Decode value in given format.
    fn decode(&mut self, ctx: &Context, format: PgFormat, src: Option<&[u8]>) -> Result<()> {
        match format {
            PgFormat::Text => self.decode_text(ctx, src),
            PgFormat::Binary => self.decode_binary(ctx, src),
        }
    }

    /// Decode value in given format, taking ownership of the buffer.
    ///
    /// The default implementation copies the buffer.
    fn decode_owned(&mut self, ctx: &Context, format: PgFormat, src: Option<Bytes>) -> Result<()> {
        self.decode(ctx, format, src.as_deref())
    }

    /// Encode value in given format.
    fn encode(&self, ctx: &Context, format: PgFormat, buf: &mut BytesMut) -> Result<IsNull> {
        match format {
            PgFormat::Text => self.encode_text(ctx, buf),
            PgFormat::Binary => self.encode_binary(ctx, buf),
        }
    }

    /// Encode value as `Bind` message parameter.
    ///
    /// Writes the `int32` length of the value followed by the value bytes.
    /// As a special case, `-1` indicates a `NULL` parameter value and no value bytes follow.
    ///
    /// On error, `buf` is left as it was before the call.
    ///
    /// <https://www.postgresql.org/docs/current/protocol-message-formats.html#PROTOCOL-MESSAGE-FORMATS-BIND>
    fn encode_param(&self, ctx: &Context, format: PgFormat, buf: &mut BytesMut) -> Result<()> {
        let offset = buf.len();
        buf.put_i32(0);

        let size = match self.encode(ctx, format, buf) {
            Ok(IsNull::Yes) => {
                buf.truncate(offset + size_of::<i32>());
                -1
            }
            Ok(IsNull::No) => {
                let len = buf.len() - offset - size_of::<i32>();
                match i32::try_from(len) {
                    Ok(len) => len,
                    Err(_) => {
                        buf.truncate(offset);
                        return Err(ProtocolError::ParamTooLarge(len).into());
                    }
                }
            }
            Err(err) => {
                buf.truncate(offset);
                return Err(err);
            }
        };

        verbose!(oid = Self::OID, size, "encode param");
        buf[offset..offset + size_of::<i32>()].copy_from_slice(&size.to_be_bytes());
        Ok(())
    }
}

unit_error! {
    /// An error when encoding a value box that was never populated.
    pub struct UndefinedValueError("cannot encode undefined value");
}

/// An error when wire payload is rejected by a value box.
pub enum DecodeError {
    /// Binary payload is empty while a header is required.
    Empty,
    /// Binary payload version is not supported.
    UnsupportedVersion(u8),
}

impl std::error::Error for DecodeError { }

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("failed to decode value, ")?;
        match self {
            Self::Empty => write!(f, "unexpected empty payload"),
            Self::UnsupportedVersion(v) => write!(f, "unsupported version number: {v}"),
        }
    }
}

impl fmt::Debug for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::postgres::Oid;

    /// Writes a fixed payload, fails when `fail` is set.
    struct Fixed {
        value: Option<&'static [u8]>,
        fail: bool,
    }

    impl PgType for Fixed {
        const OID: Oid = 25;
    }

    impl PgValue for Fixed {
        fn decode_text(&mut self, _: &Context, _: Option<&[u8]>) -> Result<()> {
            Ok(())
        }

        fn decode_binary(&mut self, _: &Context, _: Option<&[u8]>) -> Result<()> {
            Ok(())
        }

        fn encode_text(&self, _: &Context, buf: &mut BytesMut) -> Result<IsNull> {
            if self.fail {
                buf.put_slice(b"partial");
                return Err(UndefinedValueError.into());
            }
            match self.value {
                Some(value) => {
                    buf.put_slice(value);
                    Ok(IsNull::No)
                }
                None => Ok(IsNull::Yes),
            }
        }

        fn encode_binary(&self, ctx: &Context, buf: &mut BytesMut) -> Result<IsNull> {
            self.encode_text(ctx, buf)
        }
    }

    #[test]
    fn encode_param_value() {
        let ctx = Context::new();
        let mut buf = BytesMut::from(&b"head"[..]);
        let value = Fixed { value: Some(b"{}"), fail: false };
        value.encode_param(&ctx, PgFormat::Text, &mut buf).unwrap();
        assert_eq!(&buf[..], b"head\x00\x00\x00\x02{}");
    }

    #[test]
    fn encode_param_null() {
        let ctx = Context::new();
        let mut buf = BytesMut::new();
        let value = Fixed { value: None, fail: false };
        value.encode_param(&ctx, PgFormat::Binary, &mut buf).unwrap();
        assert_eq!(&buf[..], b"\xff\xff\xff\xff");
    }

    #[test]
    fn encode_param_error_restores_buffer() {
        let ctx = Context::new();
        let mut buf = BytesMut::from(&b"head"[..]);
        let value = Fixed { value: None, fail: true };
        assert!(value.encode_param(&ctx, PgFormat::Text, &mut buf).is_err());
        assert_eq!(&buf[..], b"head");
    }

    #[test]
    fn decode_error_display() {
        assert_eq!(
            DecodeError::UnsupportedVersion(2).to_string(),
            "failed to decode value, unsupported version number: 2"
        );
    }
}
