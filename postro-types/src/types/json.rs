use bytes::{BufMut, Bytes, BytesMut};
use serde::de::DeserializeOwned;
use std::fmt;

use super::{
    Destination, Dynamic, JsonSource,
    output::deserialize,
};
use crate::{
    Result, Status,
    codec::{Context, IsNull, PgValue, UndefinedValueError},
    common::{debug, span, verbose},
    ext::FmtExt,
    postgres::PgFormat,
    scan::{Scan, SqlValue, TypeMismatchError},
};

/// Postgres `json` value box.
///
/// Holds raw json bytes and its [`Status`]. Text and binary wire formats of
/// `json` are identical, the content is never validated when decoded, it is
/// parsed only when read with [`get`][Json::get] or [`assign_to`][Json::assign_to].
///
/// # Examples
///
/// ```
/// use postro_types::{Context, PgFormat, PgValue, Status, types::{Json, Typed}};
///
/// # fn app() -> postro_types::Result<()> {
/// let ctx = Context::new();
///
/// let mut json = Json::new();
/// json.decode(&ctx, PgFormat::Text, Some(br#"{"id":420}"#))?;
/// assert_eq!(json.status(), Status::Present);
///
/// let mut id = Typed(serde_json::Value::Null);
/// json.assign_to(&mut id)?;
/// assert_eq!(id.0["id"], 420);
/// # Ok(())
/// # }
/// # app().unwrap();
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Json {
    bytes: Bytes,
    status: Status,
}

impl Json {
    /// Create new [`Status::Undefined`] box.
    pub const fn new() -> Self {
        Self { bytes: Bytes::new(), status: Status::Undefined }
    }

    /// Create new [`Status::Null`] box.
    pub const fn null() -> Self {
        Self { bytes: Bytes::new(), status: Status::Null }
    }

    /// Create new [`Status::Present`] box from raw json, without validation.
    pub fn from_raw(raw: impl Into<Bytes>) -> Self {
        Self { bytes: raw.into(), status: Status::Present }
    }

    /// Returns current [`Status`].
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Return `true` if value is `NULL`.
    pub const fn is_null(&self) -> bool {
        self.status.is_null()
    }

    /// Returns raw json bytes.
    ///
    /// Returns [`None`] if value is not [`Status::Present`].
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self.status {
            Status::Present => Some(&self.bytes),
            _ => None,
        }
    }

    /// Consume self into raw json bytes.
    ///
    /// Returns [`None`] if value is not [`Status::Present`].
    pub fn into_bytes(self) -> Option<Bytes> {
        match self.status {
            Status::Present => Some(self.bytes),
            _ => None,
        }
    }

    /// Write application value into the box.
    ///
    /// On error, the box is left unchanged.
    pub fn set<S: JsonSource>(&mut self, src: S) -> Result<()> {
        let raw = src.into_raw()?;
        verbose!(null = raw.is_none(), "set json");
        self.replace(raw);
        Ok(())
    }

    /// Returns untyped view of the box content.
    ///
    /// Invalid json does not fail, it is returned as [`Dynamic::Unparsed`].
    pub fn get(&self) -> Dynamic<'_> {
        match self.status {
            Status::Present => match serde_json::from_slice(&self.bytes) {
                Ok(value) => Dynamic::Parsed(value),
                Err(_err) => {
                    debug!("json is not parsable, returning raw bytes: {_err}");
                    Dynamic::Unparsed(&self.bytes)
                }
            },
            Status::Null => Dynamic::Null,
            Status::Undefined => Dynamic::Undefined,
        }
    }

    /// Assign box content into destination.
    ///
    /// See [`Destination`] for the conversion applied for each destination type.
    pub fn assign_to<D: Destination + ?Sized>(&self, dst: &mut D) -> Result<()> {
        dst.assign(self.as_bytes())?;
        Ok(())
    }

    /// Deserialize box content using [`serde_json`].
    ///
    /// Box without value is deserialized from `null`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(deserialize(self.as_bytes())?)
    }

    /// `None` means `NULL`.
    pub(crate) fn replace(&mut self, raw: Option<Bytes>) {
        *self = match raw {
            Some(bytes) => Self { bytes, status: Status::Present },
            None => Self::null(),
        };
    }
}

impl PgValue for Json {
    fn decode_text(&mut self, _: &Context, src: Option<&[u8]>) -> Result<()> {
        verbose!(null = src.is_none(), "decode json");
        self.replace(src.map(Bytes::copy_from_slice));
        Ok(())
    }

    fn decode_binary(&mut self, ctx: &Context, src: Option<&[u8]>) -> Result<()> {
        self.decode_text(ctx, src)
    }

    /// Both format are identical, `src` is stored without copy.
    fn decode_owned(&mut self, _: &Context, _: PgFormat, src: Option<Bytes>) -> Result<()> {
        self.replace(src);
        Ok(())
    }

    fn encode_text(&self, _: &Context, buf: &mut BytesMut) -> Result<IsNull> {
        span!("encode json", status = %self.status);
        match self.status {
            Status::Present => {
                buf.put_slice(&self.bytes);
                Ok(IsNull::No)
            }
            Status::Null => Ok(IsNull::Yes),
            Status::Undefined => Err(UndefinedValueError.into()),
        }
    }

    fn encode_binary(&self, ctx: &Context, buf: &mut BytesMut) -> Result<IsNull> {
        self.encode_text(ctx, buf)
    }
}

impl Scan for Json {
    fn scan(&mut self, src: SqlValue) -> Result<()> {
        match src {
            SqlValue::Null => self.replace(None),
            SqlValue::Text(text) => self.replace(Some(text.into())),
            SqlValue::Bytes(bytes) => self.replace(Some(bytes)),
            src => return Err(TypeMismatchError::new(src.kind()).into()),
        }
        Ok(())
    }

    /// Raw json that is not a valid utf8 is returned as [`SqlValue::Bytes`].
    fn value(&self) -> Result<SqlValue> {
        match self.status {
            Status::Present => match std::str::from_utf8(&self.bytes) {
                Ok(text) => Ok(SqlValue::Text(text.to_owned())),
                Err(_) => Ok(SqlValue::Bytes(self.bytes.clone())),
            },
            Status::Null => Ok(SqlValue::Null),
            Status::Undefined => Err(UndefinedValueError.into()),
        }
    }
}

impl fmt::Debug for Json {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Status::Present => f.debug_tuple("Json").field(&self.bytes.lossy()).finish(),
            Status::Null => f.write_str("Json(NULL)"),
            Status::Undefined => f.write_str("Json(undefined)"),
        }
    }
}

impl From<serde_json::Value> for Json {
    fn from(value: serde_json::Value) -> Self {
        Self::from_raw(value.to_string())
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::{ErrorKind, types::Typed};

    fn present(raw: &'static str) -> Json {
        Json::from_raw(raw)
    }

    #[test]
    fn transcode() {
        let ctx = Context::new();
        let values = [
            present("{}"),
            present("null"),
            present("42"),
            present(r#""hello""#),
            Json::null(),
        ];

        for value in values {
            for format in [PgFormat::Text, PgFormat::Binary] {
                let mut buf = BytesMut::new();
                let is_null = value.encode(&ctx, format, &mut buf).unwrap();

                let mut decoded = Json::new();
                let src = match is_null {
                    IsNull::Yes => None,
                    IsNull::No => Some(&buf[..]),
                };
                decoded.decode(&ctx, format, src).unwrap();
                assert_eq!(decoded, value);
            }
        }
    }

    #[test]
    fn set() {
        let mut json = Json::new();
        json.set("{}").unwrap();
        assert_eq!(json, present("{}"));

        json.set(b"{}".to_vec()).unwrap();
        assert_eq!(json, present("{}"));

        json.set(Typed([1, 2, 3])).unwrap();
        assert_eq!(json, present("[1,2,3]"));

        json.set(Typed(HashMap::from([("foo", "bar")]))).unwrap();
        assert_eq!(json, present(r#"{"foo":"bar"}"#));
    }

    #[test]
    fn set_null() {
        let setters: [fn(&mut Json) -> Result<()>; 3] = [
            |json: &mut Json| json.set(()),
            |json: &mut Json| json.set(None::<&str>),
            |json: &mut Json| json.set(None::<Vec<u8>>),
        ];

        for set in setters {
            let mut json = present("{}");
            set(&mut json).unwrap();
            assert_eq!(json.status(), Status::Null);
            assert_eq!(json.as_bytes(), None);
        }
    }

    #[test]
    fn set_failure_keeps_value() {
        let mut json = present("[1]");
        let map = HashMap::from([((1, 2), 3)]);
        let err = json.set(Typed(map)).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Serialization(_)));
        assert_eq!(json, present("[1]"));
    }

    #[test]
    fn get_roundtrip() {
        let value = json!({ "b": [1, 2.5, null], "a": { "c": "d" }, "e": true });
        let mut json = Json::new();
        json.set(Typed(&value)).unwrap();
        assert_eq!(json.get(), Dynamic::Parsed(value));
    }

    #[test]
    fn get() {
        let ctx = Context::new();
        let mut json = Json::new();
        assert_eq!(json.get(), Dynamic::Undefined);

        json.decode_text(&ctx, Some(b"{}")).unwrap();
        assert_eq!(json.status(), Status::Present);
        assert_eq!(json.as_bytes(), Some(&b"{}"[..]));
        assert_eq!(json.get(), Dynamic::Parsed(json!({})));

        json.decode_text(&ctx, None).unwrap();
        assert_eq!(json.status(), Status::Null);
        assert_eq!(json.get(), Dynamic::Null);
    }

    #[test]
    fn get_unparsed() {
        let ctx = Context::new();
        let mut json = Json::new();
        json.decode_binary(&ctx, Some(b"{not json")).unwrap();
        assert_eq!(json.status(), Status::Present);
        assert_eq!(json.get(), Dynamic::Unparsed(b"{not json"));
        assert!(json.get().parsed().is_none());
    }

    #[test]
    fn decode_copies_input() {
        let ctx = Context::new();
        let mut wire = b"[1]".to_vec();
        let mut json = Json::new();
        json.decode_text(&ctx, Some(&wire)).unwrap();
        wire[1] = b'2';
        assert_eq!(json.as_bytes(), Some(&b"[1]"[..]));
    }

    #[test]
    fn decode_owned() {
        let ctx = Context::new();
        let wire = Bytes::from_static(b"[1]");
        let mut json = Json::new();
        json.decode_owned(&ctx, PgFormat::Binary, Some(wire.clone())).unwrap();
        assert_eq!(json.into_bytes(), Some(wire));
    }

    #[test]
    fn encode() {
        let ctx = Context::new();

        let mut buf = BytesMut::from(&b"prefix"[..]);
        assert!(matches!(
            Json::new().encode_text(&ctx, &mut buf).unwrap_err().kind(),
            ErrorKind::Undefined(_)
        ));
        assert_eq!(Json::null().encode_text(&ctx, &mut buf).unwrap(), IsNull::Yes);
        assert_eq!(Json::null().encode_binary(&ctx, &mut buf).unwrap(), IsNull::Yes);
        assert_eq!(&buf[..], b"prefix");

        assert_eq!(present("{}").encode_binary(&ctx, &mut buf).unwrap(), IsNull::No);
        assert_eq!(&buf[..], b"prefix{}");
    }

    #[test]
    fn assign_raw_string() {
        let mut s = String::new();
        present("{}").assign_to(&mut s).unwrap();
        assert_eq!(s, "{}");

        Json::null().assign_to(&mut s).unwrap();
        assert_eq!(s, "");
    }

    #[test]
    fn assign_raw_bytes() {
        let mut b = None::<Vec<u8>>;
        present("{}").assign_to(&mut b).unwrap();
        assert_eq!(b.as_deref(), Some(&b"{}"[..]));

        Json::null().assign_to(&mut b).unwrap();
        assert_eq!(b, None);
    }

    #[test]
    fn assign_pointer_alloc() {
        let mut ps = None::<String>;
        Json::null().assign_to(&mut ps).unwrap();
        assert_eq!(ps.as_deref(), Some(""));
    }

    #[test]
    fn assign_unmarshal() {
        #[derive(Debug, Default, PartialEq, Deserialize)]
        struct Person {
            name: String,
            age: i32,
        }

        let mut map = Typed(HashMap::<String, String>::new());
        present(r#"{"foo":"bar"}"#).assign_to(&mut map).unwrap();
        assert_eq!(map.0, HashMap::from([("foo".to_owned(), "bar".to_owned())]));

        let mut person = Typed(Person::default());
        present(r#"{"name":"John","age":42}"#).assign_to(&mut person).unwrap();
        assert_eq!(person.0, Person { name: "John".into(), age: 42 });

        let err = present(r#"{"name":"John"}"#).assign_to(&mut person).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Deserialization(_)));
    }

    #[test]
    fn assign_null_literal() {
        let mut value = Typed(Some(1));
        Json::new().assign_to(&mut value).unwrap();
        assert_eq!(value.0, None);

        let mut value = json!([]);
        Json::null().assign_to(&mut value).unwrap();
        assert_eq!(value, serde_json::Value::Null);
    }

    #[test]
    fn set_text_assign_integer() {
        let mut json = Json::new();
        json.set("42").unwrap();
        assert_eq!(json.as_bytes(), Some(&b"42"[..]));

        let mut n = 0i32;
        json.assign_to(&mut n).unwrap();
        assert_eq!(n, 42);
        assert_eq!(json.deserialize::<u64>().unwrap(), 42);
    }

    #[test]
    fn scan() {
        let mut json = Json::new();
        json.scan(SqlValue::from("{}")).unwrap();
        assert_eq!(json, present("{}"));

        json.scan(SqlValue::from(b"[]".to_vec())).unwrap();
        assert_eq!(json, present("[]"));

        json.scan(SqlValue::Null).unwrap();
        assert_eq!(json.status(), Status::Null);

        let err = json.scan(SqlValue::Int(1)).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TypeMismatch(e) if e.kind() == "int8"));
        assert_eq!(json.status(), Status::Null);
    }

    #[test]
    fn value() {
        assert_eq!(present("{}").value().unwrap(), SqlValue::Text("{}".into()));
        assert_eq!(Json::null().value().unwrap(), SqlValue::Null);
        assert_eq!(
            Json::from_raw(&b"\xff"[..]).value().unwrap(),
            SqlValue::Bytes(Bytes::from_static(b"\xff"))
        );
        assert!(matches!(Json::new().value().unwrap_err().kind(), ErrorKind::Undefined(_)));
    }

    #[test]
    fn debug() {
        assert_eq!(format!("{:?}", present("{}")), "Json(b\"{}\")");
        assert_eq!(format!("{:?}", Json::null()), "Json(NULL)");
        assert_eq!(format!("{:?}", Json::new()), "Json(undefined)");
    }
}
