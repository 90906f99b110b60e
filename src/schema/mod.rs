//! Record type schemas: definitions, JSON parsing, and registry resolution.

pub mod parser;
pub mod registry;
pub mod types;

pub use parser::{parse_record_type, parse_record_type_value};
pub use registry::{InMemoryRegistry, SchemaRegistry};
pub use types::{FieldKind, FieldSpec, RecordType};
