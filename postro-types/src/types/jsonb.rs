use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::{
    fmt,
    ops::{Deref, DerefMut},
};

use super::Json;
use crate::{
    Result,
    codec::{Context, DecodeError, IsNull, PgValue, UndefinedValueError},
    common::verbose,
    ext::FmtExt,
    postgres::PgFormat,
    scan::{Scan, SqlValue},
};

/// `jsonb` binary format version number.
const JSONB_VERSION: u8 = 1;

/// Postgres `jsonb` value box.
///
/// Same as [`Json`] in text format, while the binary format prefix the json
/// text with a version number byte. All [`Json`] operations are available
/// through [`Deref`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Jsonb(Json);

impl Jsonb {
    /// Create new [`Status::Undefined`][crate::Status::Undefined] box.
    pub const fn new() -> Self {
        Self(Json::new())
    }

    /// Create new [`Status::Null`][crate::Status::Null] box.
    pub const fn null() -> Self {
        Self(Json::null())
    }

    /// Create new [`Status::Present`][crate::Status::Present] box from raw json, without validation.
    pub fn from_raw(raw: impl Into<Bytes>) -> Self {
        Self(Json::from_raw(raw))
    }

    /// Consume self into [`Json`] box.
    pub fn into_inner(self) -> Json {
        self.0
    }
}

/// Returns the json text after version header.
fn strip_version(src: &[u8]) -> Result<usize, DecodeError> {
    match src.first() {
        Some(&JSONB_VERSION) => Ok(1),
        Some(&version) => Err(DecodeError::UnsupportedVersion(version)),
        None => Err(DecodeError::Empty),
    }
}

impl PgValue for Jsonb {
    fn decode_text(&mut self, ctx: &Context, src: Option<&[u8]>) -> Result<()> {
        self.0.decode_text(ctx, src)
    }

    fn decode_binary(&mut self, ctx: &Context, src: Option<&[u8]>) -> Result<()> {
        let Some(src) = src else {
            return self.0.decode_binary(ctx, None);
        };
        let header = strip_version(src)?;
        verbose!(version = src[0], "decode jsonb");
        self.0.decode_binary(ctx, Some(&src[header..]))
    }

    /// Binary format header is stripped without copying.
    fn decode_owned(&mut self, ctx: &Context, format: PgFormat, src: Option<Bytes>) -> Result<()> {
        match (format, src) {
            (PgFormat::Binary, Some(mut src)) => {
                let header = strip_version(&src)?;
                src.advance(header);
                self.0.decode_owned(ctx, format, Some(src))
            }
            (_, src) => self.0.decode_owned(ctx, format, src),
        }
    }

    fn encode_text(&self, ctx: &Context, buf: &mut BytesMut) -> Result<IsNull> {
        self.0.encode_text(ctx, buf)
    }

    fn encode_binary(&self, ctx: &Context, buf: &mut BytesMut) -> Result<IsNull> {
        match self.0.as_bytes() {
            Some(raw) => {
                buf.reserve(1 + raw.len());
                buf.put_u8(JSONB_VERSION);
                buf.put_slice(raw);
                Ok(IsNull::No)
            }
            None if self.0.is_null() => Ok(IsNull::Yes),
            None => Err(UndefinedValueError.into()),
        }
    }
}

impl Scan for Jsonb {
    fn scan(&mut self, src: SqlValue) -> Result<()> {
        self.0.scan(src)
    }

    fn value(&self) -> Result<SqlValue> {
        self.0.value()
    }
}

impl Deref for Jsonb {
    type Target = Json;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Jsonb {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Json> for Jsonb {
    fn from(value: Json) -> Self {
        Self(value)
    }
}

impl From<Jsonb> for Json {
    fn from(value: Jsonb) -> Self {
        value.0
    }
}

impl fmt::Debug for Jsonb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_bytes() {
            Some(raw) => f.debug_tuple("Jsonb").field(&raw.lossy()).finish(),
            None if self.0.is_null() => f.write_str("Jsonb(NULL)"),
            None => f.write_str("Jsonb(undefined)"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{ErrorKind, types::Dynamic};

    #[test]
    fn transcode() {
        let ctx = Context::new();
        let values = [
            Jsonb::from_raw("{}"),
            Jsonb::from_raw("null"),
            Jsonb::from_raw("42"),
            Jsonb::from_raw(r#""hello""#),
            Jsonb::null(),
        ];

        for value in values {
            for format in [PgFormat::Text, PgFormat::Binary] {
                let mut buf = BytesMut::new();
                let src = match value.encode(&ctx, format, &mut buf).unwrap() {
                    IsNull::Yes => None,
                    IsNull::No => Some(buf.freeze()),
                };

                let mut decoded = Jsonb::new();
                decoded.decode(&ctx, format, src.as_deref()).unwrap();
                assert_eq!(decoded, value);

                let mut owned = Jsonb::new();
                owned.decode_owned(&ctx, format, src).unwrap();
                assert_eq!(owned, value);
            }
        }
    }

    #[test]
    fn binary_layout() {
        let ctx = Context::new();
        let mut buf = BytesMut::new();
        Jsonb::from_raw("[1]").encode_binary(&ctx, &mut buf).unwrap();
        assert_eq!(&buf[..], b"\x01[1]");

        buf.clear();
        Jsonb::from_raw("[1]").encode_text(&ctx, &mut buf).unwrap();
        assert_eq!(&buf[..], b"[1]");
    }

    #[test]
    fn decode_binary() {
        let ctx = Context::new();
        let mut jsonb = Jsonb::new();
        jsonb.decode_binary(&ctx, Some(b"\x01{\"a\":1}")).unwrap();
        assert_eq!(jsonb.as_bytes(), Some(&b"{\"a\":1}"[..]));
        assert_eq!(jsonb.get(), Dynamic::Parsed(serde_json::json!({ "a": 1 })));
    }

    #[test]
    fn reject_unknown_version() {
        let ctx = Context::new();
        let mut jsonb = Jsonb::from_raw("[]");

        let err = jsonb.decode_binary(&ctx, Some(b"\x02{}")).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Decode(DecodeError::UnsupportedVersion(2))));

        let err = jsonb.decode_binary(&ctx, Some(b"")).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Decode(DecodeError::Empty)));

        let err = jsonb
            .decode_owned(&ctx, PgFormat::Binary, Some(Bytes::from_static(b"\x00{}")))
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Decode(DecodeError::UnsupportedVersion(0))));

        assert_eq!(jsonb, Jsonb::from_raw("[]"));
    }

    #[test]
    fn encode_undefined() {
        let ctx = Context::new();
        let mut buf = BytesMut::new();
        let err = Jsonb::new().encode_binary(&ctx, &mut buf).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Undefined(_)));
        assert_eq!(Jsonb::null().encode_binary(&ctx, &mut buf).unwrap(), IsNull::Yes);
        assert!(buf.is_empty());
    }

    #[test]
    fn json_operations() {
        let mut jsonb = Jsonb::new();
        jsonb.set(crate::types::Typed(vec!["a", "b"])).unwrap();
        assert_eq!(jsonb.value().unwrap(), SqlValue::Text(r#"["a","b"]"#.into()));

        let mut list = crate::types::Typed(Vec::<String>::new());
        jsonb.assign_to(&mut list).unwrap();
        assert_eq!(list.0, ["a", "b"]);
        assert_eq!(format!("{jsonb:?}"), r#"Jsonb(b"["a","b"]")"#);
        assert_eq!(format!("{:?}", Jsonb::null()), "Jsonb(NULL)");
    }
}
