use std::collections::HashMap;

use bytes::BytesMut;
use postro_types::{
    Context, ErrorKind, PgFormat, PgValue, Result, Scan, SqlValue,
    types::{Json, Jsonb, Typed},
};

pub fn main() -> Result<()> {
    let ctx = Context::new();
    let mut buf = BytesMut::new();

    let errors = [
        Json::new().encode(&ctx, PgFormat::Text, &mut buf).map(drop),
        Json::new().set(Typed(HashMap::from([((4, 2), 0)]))),
        Json::from_raw("[]").assign_to(&mut Typed(0i32)),
        Json::new().scan(SqlValue::Bool(true)),
        Jsonb::new().decode(&ctx, PgFormat::Binary, Some(b"\x02{}")),
    ];

    for err in errors {
        let Err(err) = err else {
            panic!("expected error");
        };
        match err.kind() {
            ErrorKind::Undefined(_) => tracing::warn!("programming error: {err}"),
            _ => tracing::warn!("{err}"),
        }
    }

    Ok(())
}
