//! Value boxes.
//!
//! Each box holds raw wire bytes together with its [`Status`][s], and implements
//! [`PgValue`][v] and [`Scan`][c].
//!
//! Available for:
//!
//! - `json` via [`Json`], requires `json` feature
//! - `jsonb` via [`Jsonb`], requires `json` feature
//!
//! Application values are written into a box using [`JsonSource`], and read
//! back using [`Destination`] or the untyped [`Dynamic`].
//!
//! [s]: crate::Status
//! [v]: crate::PgValue
//! [c]: crate::Scan

#[cfg(feature = "json")]
mod input;
#[cfg(feature = "json")]
mod output;
#[cfg(feature = "json")]
mod json;
#[cfg(feature = "json")]
mod jsonb;

#[cfg(feature = "json")]
pub use input::{JsonSource, SerializationError, Typed};
#[cfg(feature = "json")]
pub use output::{Destination, DeserializationError, Dynamic, NULL_LITERAL};
#[cfg(feature = "json")]
pub use json::Json;
#[cfg(feature = "json")]
pub use jsonb::Jsonb;
