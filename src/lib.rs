//! Configurable CSV marshalling with pluggable storage sinks.
//!
//! This library converts between schema-described records and CSV byte
//! streams. A [`schema::SchemaRegistry`] resolves logical type names to
//! [`schema::RecordType`]s, the [`codec`] performs streaming decode and
//! encode under per-call [`codec::CsvOptions`], [`negotiate`] derives those
//! options from content types and transport headers, and the [`sink`] layer
//! routes marshalled output to storage backends, streaming when the backend
//! allows and buffering when it does not.
//!
//! # Example
//! ```
//! use csvbind::codec::{decode, encode, CsvOptions};
//! use csvbind::record::{Record, Value};
//! use csvbind::schema::{FieldKind, FieldSpec, RecordType};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let point = RecordType::new(
//!     "point",
//!     vec![
//!         FieldSpec::new("x", FieldKind::Integer),
//!         FieldSpec::new("y", FieldKind::Integer),
//!     ],
//! )?;
//!
//! let records = vec![Record::from_pairs(vec![
//!     ("x".to_string(), Value::Integer(1)),
//!     ("y".to_string(), Value::Integer(2)),
//! ])];
//!
//! let opts = CsvOptions::default();
//! let bytes = encode(&records, &point, &opts)?;
//! assert_eq!(&bytes[..], b"x,y\n1,2\n");
//!
//! let decoded = decode(&bytes, &point, &opts, &[])?;
//! assert_eq!(decoded, records);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod charset;
pub mod codec;
pub mod error;
pub mod negotiate;
pub mod record;
pub mod schema;
pub mod sink;
pub mod window;

// Re-export main types
pub use api::CsvService;
pub use charset::Charset;
pub use codec::{decode, encode, CsvOptions, Decoder, Encoder};
pub use error::{
    BindError, CharsetError, DecodeError, EncodeError, SchemaError, StoreError,
};
pub use record::{Date, Record, Value};
pub use schema::{
    parse_record_type, FieldKind, FieldSpec, InMemoryRegistry, RecordType, SchemaRegistry,
};
pub use sink::{Datastore, DirectoryStore, Locator, MemoryStore, StreamSink};
pub use window::{Window, WindowSet};
