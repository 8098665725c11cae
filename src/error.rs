use thiserror::Error;

use crate::core::value::ValueKind;

#[derive(Error, Debug, PartialEq)]
/// Failure while turning a delimited line back into a record
pub enum FormatError {
    #[error("expected {expected} fields, found {found}")]
    TokenCount { expected: usize, found: usize },

    #[error("field `{field}` cannot be read from `{token}`: {reason}")]
    InvalidToken {
        field: String,
        token: String,
        reason: String,
    },
}

#[derive(Error, Debug, PartialEq)]
/// TypeSpec error
pub enum TypeSpecError {
    #[error("no converter registered for kind {kind} of field `{field}`")]
    UnsupportedKind { field: String, kind: ValueKind },

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("invalid field table: {0}")]
    Descriptor(String),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Settings from: {0}")]
    Settings(String),

    #[error("ItemWriter from: {0}")]
    ItemWriter(String),

    #[error("ItemReader from: {0}")]
    ItemReader(String),
}
