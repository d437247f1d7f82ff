use bytes::BytesMut;
use postro_types::{
    Context, PgFormat, PgValue, Result,
    types::{Json, Jsonb, Typed},
};
use serde::Serialize;

#[derive(Serialize)]
struct Post<'a> {
    id: i32,
    name: &'a str,
}

pub fn main() -> Result<()> {
    let ctx = Context::new();
    let mut buf = BytesMut::new();

    let mut post = Jsonb::new();
    post.set(Typed(Post { id: 1, name: "thread1" }))?;
    post.encode_param(&ctx, PgFormat::Binary, &mut buf)?;

    let mut raw = Json::new();
    raw.set(r#"{"already":"json"}"#)?;
    raw.encode_param(&ctx, PgFormat::Text, &mut buf)?;

    let mut null = Json::new();
    null.set(None::<&str>)?;
    null.encode_param(&ctx, PgFormat::Text, &mut buf)?;

    tracing::info!(len = buf.len(), "bind parameters encoded");

    assert_eq!(&buf[buf.len() - 4..], b"\xff\xff\xff\xff");

    Ok(())
}
