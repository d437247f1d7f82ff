
/// Postgres object identifier.
///
/// The oid type is implemented as an unsigned four-byte integer.
///
/// <https://www.postgresql.org/docs/current/datatype-oid.html>
pub type Oid = u32;

/// A type that have corresponding postgres oid.
pub trait PgType {
    const OID: Oid;
}

macro_rules! oid {
    ($ty:ty, $oid:literal $(, $doc:literal)? ) => {
        impl PgType for $ty {
            $(#[doc = $doc])?
            const OID: Oid = $oid;
        }
    };
}

#[cfg(feature = "json")]
oid!(crate::types::Json, 114, "`json` JSON stored as text");
#[cfg(feature = "json")]
oid!(crate::types::Jsonb, 3802, "`jsonb` Binary JSON");
