//! Postgres Value Boxes
//!
//! A value box holds a single postgres value in its raw wire bytes, together
//! with a tri-state [`Status`]: never populated, SQL `NULL`, or present.
//!
//! Boxes are decoded from and encoded to both text and binary wire format via
//! [`PgValue`], written from application values, and read back into arbitrary
//! destination types.
//!
//! # Examples
//!
//! Decode a field, then read it:
//!
//! ```
//! use postro_types::{Context, PgFormat, PgValue, types::{Dynamic, Json}};
//!
//! # fn app() -> postro_types::Result<()> {
//! let ctx = Context::new();
//!
//! let mut json = Json::new();
//! json.decode(&ctx, PgFormat::Binary, Some(b"{}"))?;
//! assert_eq!(json.get(), Dynamic::Parsed(serde_json::json!({})));
//!
//! json.decode(&ctx, PgFormat::Binary, None)?;
//! assert_eq!(json.get(), Dynamic::Null);
//! # Ok(())
//! # }
//! # app().unwrap();
//! ```
//!
//! Write a parameter:
//!
//! ```
//! use bytes::BytesMut;
//! use postro_types::{Context, IsNull, PgFormat, PgValue, types::{Jsonb, Typed}};
//!
//! # fn app() -> postro_types::Result<()> {
//! let ctx = Context::new();
//! let mut buf = BytesMut::new();
//!
//! let mut jsonb = Jsonb::new();
//! jsonb.set(Typed([4, 2, 0]))?;
//!
//! assert_eq!(jsonb.encode(&ctx, PgFormat::Binary, &mut buf)?, IsNull::No);
//! assert_eq!(&buf[..], b"\x01[4,2,0]");
//! # Ok(())
//! # }
//! # app().unwrap();
//! ```
mod common;
mod ext;

// Protocol
pub mod postgres;

// Value
mod status;
pub mod codec;
pub mod scan;
pub mod types;

mod error;


pub use status::Status;
pub use codec::{Context, IsNull, PgValue};
pub use postgres::{Oid, PgFormat, PgType};
pub use scan::{Scan, SqlValue};
pub use error::{Error, ErrorKind, Result};
