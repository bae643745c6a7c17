//! Localized metadata record lookup.
//!
//! One operation lives here: given a record identifier and a language
//! preference, project the matching row of the `metadata` table into a
//! fixed-shape JSON record and wrap it in an `Items` envelope. The
//! projection is closed (the same 37 keys on every response), three
//! fields localize between English and French source columns, and the
//! doubly-escaped `plugins` payload is unescaped and decoded on the way
//! out.
//!
//! The crate is engine-agnostic: [`RecordLookup`] drives any
//! [`boreal_core::QueryEngine`], which is how the tests run the full path
//! against a deterministic in-memory backend.

pub mod error;
pub mod lookup;
pub mod normalize;
pub mod projection;
pub mod record;

pub use error::LookupError;
pub use lookup::LookupRequest;
pub use lookup::RecordLookup;
pub use normalize::decode_plugins;
pub use normalize::unescape_plugins;
pub use projection::build_record_query;
pub use projection::projected_field_names;
pub use projection::Language;
pub use projection::ID_COLUMN;
pub use projection::METADATA_TABLE;
pub use projection::RESPONSE_FIELD_COUNT;
pub use record::LookupResponse;
pub use record::MetadataRecord;
