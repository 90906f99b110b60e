//! Error types for CSV marshalling.

use std::io;
use thiserror::Error;

/// Errors that can occur during schema operations
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Invalid schema document
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
    /// Unsupported field kind
    #[error("Unsupported field kind: {0}")]
    UnsupportedKind(String),
    /// Duplicate field name within a record type
    #[error("Duplicate field name: {0}")]
    DuplicateField(String),
    /// Record type not registered
    #[error("Unknown record type: {0}")]
    UnknownType(String),
}

/// Errors that can occur while translating bytes to and from characters
#[derive(Debug, Error)]
pub enum CharsetError {
    /// Charset label not recognized
    #[error("Unknown charset label: {0}")]
    UnknownLabel(String),
    /// Input byte sequence is invalid for the charset
    #[error("Invalid byte sequence at offset {offset} for charset {charset}")]
    InvalidByte { charset: &'static str, offset: usize },
    /// Character cannot be represented in the target charset
    #[error("Character {ch:?} cannot be encoded in charset {charset}")]
    Unencodable { charset: &'static str, ch: char },
}

/// Errors that can occur during decoding (unmarshal)
#[derive(Debug, Error)]
pub enum DecodeError {
    /// IO error reading the input stream
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Charset decoding error
    #[error("Charset error: {0}")]
    Charset(#[from] CharsetError),
    /// Header row does not match the record type when validation is requested
    #[error("Header mismatch: expected {expected:?}, found {found:?}")]
    HeaderMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    /// A single field failed type coercion
    #[error("Parse failure at record {record_index}, field {field:?}, value {value:?}: {message}")]
    FieldParse {
        record_index: u64,
        field: String,
        value: String,
        message: String,
    },
    /// Structurally broken CSV, e.g. an unterminated quoted field
    #[error("Malformed record {record_index}: {message}")]
    MalformedRecord { record_index: u64, message: String },
}

/// Errors that can occur during encoding (marshal)
#[derive(Debug, Error)]
pub enum EncodeError {
    /// IO error writing the output stream
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Charset encoding error
    #[error("Charset error: {0}")]
    Charset(#[from] CharsetError),
}

/// Errors that can occur while routing output to a datastore
#[derive(Debug, Error)]
pub enum StoreError {
    /// The destination rejects both streaming and buffered writes
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    /// Object name is not acceptable to the store
    #[error("Invalid object name: {0}")]
    InvalidName(String),
    /// IO error from the destination
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Encoding failed while writing to the destination
    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),
}

/// Top-level error type for the service operations
#[derive(Debug, Error)]
pub enum BindError {
    /// Schema resolution error
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
    /// Decode error
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
    /// Encode error
    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),
    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
