use bytes::{Buf, Bytes};
use postro_types::{
    Context, PgFormat, PgValue, Result, Status,
    types::{Dynamic, Json, Jsonb, Typed},
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
struct Foo {
    id: i32,
}

/// Split `DataRow` column values, `-1` length is `NULL`.
fn columns(mut body: Bytes) -> Vec<Option<Bytes>> {
    let len = body.get_u16();
    (0..len)
        .map(|_| match body.get_i32() {
            -1 => None,
            len => Some(body.split_to(len as _)),
        })
        .collect()
}

pub fn main() -> Result<()> {
    let ctx = Context::new();

    // DataRow of (json, jsonb, json) where the last column is NULL
    let body = Bytes::from_static(b"\x00\x03\x00\x00\x00\x0a{\"id\":420}\x00\x00\x00\x03\x01[]\xff\xff\xff\xff");
    let mut cols = columns(body).into_iter();

    let mut json = Json::new();
    json.decode_owned(&ctx, PgFormat::Text, cols.next().flatten())?;

    let mut jsonb = Jsonb::new();
    jsonb.decode_owned(&ctx, PgFormat::Binary, cols.next().flatten())?;

    let mut null = Json::new();
    null.decode_owned(&ctx, PgFormat::Text, cols.next().flatten())?;

    let mut foo = Typed(Foo::default());
    json.assign_to(&mut foo)?;
    assert_eq!(foo.0, Foo { id: 420 });

    assert_eq!(jsonb.get(), Dynamic::Parsed(serde_json::json!([])));

    assert_eq!(null.status(), Status::Null);
    let mut text = None::<String>;
    null.assign_to(&mut text)?;
    assert_eq!(text.as_deref(), Some(""));

    tracing::info!(?json, ?jsonb, ?null, "decoded row");

    Ok(())
}
