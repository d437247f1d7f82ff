//! Postgres type identity and wire format.
mod pg_type;
mod pg_format;

pub use pg_type::{Oid, PgType};
pub use pg_format::{PgFormat, ProtocolError};
