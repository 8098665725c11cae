/// Value kinds, the value model and the `FieldType` bridge to Rust types
pub mod value;

/// Render/parse converters keyed by value kind
pub mod converter;

/// Field descriptors and the `Record` field table
pub mod field;

/// Mapping configuration and field order resolution
pub mod config;

/// Mapping settings loaded from JSON
pub mod settings;

/// The `TypeSpec` codec and its builder
pub mod type_spec;

pub mod item;
