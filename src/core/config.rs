use std::{collections::HashMap, sync::Arc};

use super::{
    converter::ConverterRegistry,
    field::FieldDescriptor,
    value::{Value, ValueKind},
};

pub(crate) type FieldRenderer<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;
pub(crate) type KindRenderer = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Default delimiter between two fields of a line.
pub const DEFAULT_DELIMITER: char = ';';

/// Render overrides collected by [`TypeSpecBuilder::serialization`].
///
/// A field mapping receives the whole record and wins over a type mapping,
/// which receives the value of the field and wins over the default converter
/// of the kind. Neither is called for an absent value.
///
/// [`TypeSpecBuilder::serialization`]: crate::core::type_spec::TypeSpecBuilder::serialization
pub struct SerializationBuilder<T> {
    pub(crate) field_mappings: HashMap<String, FieldRenderer<T>>,
    pub(crate) type_mappings: HashMap<ValueKind, KindRenderer>,
}

impl<T: 'static> SerializationBuilder<T> {
    pub fn new() -> Self {
        Self {
            field_mappings: HashMap::new(),
            type_mappings: HashMap::new(),
        }
    }

    pub fn field_mapping<F>(mut self, name: impl Into<String>, render: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.field_mappings.insert(name.into(), Arc::new(render));
        self
    }

    pub fn type_mapping<F>(mut self, kind: ValueKind, render: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.type_mappings.insert(kind, Arc::new(render));
        self
    }
}

impl<T: 'static> Default for SerializationBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutable configuration gathered by the builder until `build()`.
pub(crate) struct MappingConfiguration<T> {
    pub(crate) null_replacement: String,
    pub(crate) delimiter: char,
    pub(crate) positions: HashMap<String, usize>,
    pub(crate) serialization: SerializationBuilder<T>,
    pub(crate) converters: ConverterRegistry,
}

impl<T: 'static> Default for MappingConfiguration<T> {
    fn default() -> Self {
        Self {
            null_replacement: String::new(),
            delimiter: DEFAULT_DELIMITER,
            positions: HashMap::new(),
            serialization: SerializationBuilder::new(),
            converters: ConverterRegistry::new(),
        }
    }
}

/// Where the effective position of a field comes from. At equal positions an
/// explicit source goes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum PositionSource {
    Configured,
    Declared,
    Ordinal,
}

/// Resolves the serialization order as indexes into `fields`.
///
/// Fields are sorted by effective position, then by source, then by
/// declaration order.
pub(crate) fn resolve_order<T>(
    fields: &[FieldDescriptor<T>],
    positions: &HashMap<String, usize>,
) -> Vec<usize> {
    let effective = |field: &FieldDescriptor<T>| match positions.get(field.name()) {
        Some(position) => (*position, PositionSource::Configured),
        None => match field.declared_position() {
            Some(position) => (position, PositionSource::Declared),
            None => (field.ordinal(), PositionSource::Ordinal),
        },
    };

    let mut order: Vec<usize> = (0..fields.len()).collect();
    order.sort_by_key(|&index| effective(&fields[index]));
    order
}
