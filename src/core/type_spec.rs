use std::{any::type_name, fmt, mem};

use log::{debug, trace};

use crate::error::{FormatError, TypeSpecError};

use super::{
    config::{FieldRenderer, KindRenderer, MappingConfiguration, SerializationBuilder, resolve_order},
    converter::Converter,
    field::{Argument, Arguments, Construction, FieldDescriptor, FieldTable, Record},
    settings::SpecSettings,
    value::{Value, ValueKind},
};

/// Render operation of one column, resolved once at build time.
enum Renderer<T> {
    Field(FieldRenderer<T>),
    Kind(KindRenderer),
    Converter(Converter),
}

struct Column<T> {
    field: usize,
    renderer: Renderer<T>,
    parser: Converter,
}

impl<T> Column<T> {
    fn render(&self, item: &T, value: &Value) -> String {
        match &self.renderer {
            Renderer::Field(render) => render(item),
            Renderer::Kind(render) => render(value),
            Renderer::Converter(converter) => converter.render(value),
        }
    }
}

/// Frozen codec mapping one record type to a delimited line and back.
///
/// A `TypeSpec` is built once with [`TypeSpec::for_type`] and can then be
/// shared freely: serialization and deserialization never mutate it.
///
/// # Examples
///
/// ```
/// use typespec_rs::core::field::{FieldTable, Record};
/// use typespec_rs::core::type_spec::TypeSpec;
///
/// #[derive(Debug, PartialEq)]
/// struct Car {
///     year: u16,
///     make: String,
///     model: Option<String>,
/// }
///
/// impl Record for Car {
///     fn describe(table: &mut FieldTable<Self>) {
///         table.field("year", |c: &Car| c.year);
///         table.field("make", |c: &Car| c.make.clone());
///         table.field("model", |c: &Car| c.model.clone());
///         table.all_args_constructor(|args| {
///             Ok(Car {
///                 year: args.next()?,
///                 make: args.next()?,
///                 model: args.next()?,
///             })
///         });
///     }
/// }
///
/// let spec = TypeSpec::<Car>::for_type()
///     .null_replacement("-")
///     .position("make", 0)
///     .build()
///     .unwrap();
///
/// let car = Car { year: 1948, make: "Porsche".to_string(), model: None };
/// let line = spec.serialize(&car);
/// assert_eq!(line, "Porsche;1948;-");
/// assert_eq!(spec.deserialize(&line).unwrap(), car);
/// ```
pub struct TypeSpec<T> {
    fields: Vec<FieldDescriptor<T>>,
    columns: Vec<Column<T>>,
    construction: Construction<T>,
    null_replacement: String,
    delimiter: char,
}

impl<T: Record> TypeSpec<T> {
    /// Starts the configuration of a codec for `T`, reading its field table.
    pub fn for_type() -> TypeSpecBuilder<T> {
        TypeSpecBuilder::new()
    }
}

impl<T> TypeSpec<T> {
    /// Renders `item` as one delimited line.
    ///
    /// Absent values are written as the null replacement. Values containing
    /// the delimiter are written as is, which makes the line ambiguous.
    pub fn serialize(&self, item: &T) -> String {
        let mut line = String::new();

        for (index, column) in self.columns.iter().enumerate() {
            if index > 0 {
                line.push(self.delimiter);
            }
            match self.fields[column.field].read(item) {
                Some(value) => line.push_str(&column.render(item, &value)),
                None => line.push_str(&self.null_replacement),
            }
        }

        trace!("Serialized {}: {}", type_name::<T>(), line);
        line
    }

    /// Parses one delimited line back into a record.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::TokenCount`] when the number of tokens differs
    /// from the number of fields and [`FormatError::InvalidToken`] when a
    /// token cannot be read as its field.
    pub fn deserialize(&self, line: &str) -> Result<T, TypeSpecError> {
        trace!("Deserializing {}: {}", type_name::<T>(), line);

        let tokens: Vec<&str> = line.split(self.delimiter).collect();
        if tokens.len() != self.columns.len() {
            return Err(FormatError::TokenCount {
                expected: self.columns.len(),
                found: tokens.len(),
            }
            .into());
        }

        let mut slots: Vec<Option<Argument>> = self.fields.iter().map(|_| None).collect();
        for (column, token) in self.columns.iter().zip(tokens) {
            let field = &self.fields[column.field];
            let value = if token == self.null_replacement {
                None
            } else {
                let value = column
                    .parser
                    .parse(token)
                    .map_err(|reason| invalid_token(field.name(), token, reason))?;
                Some(value)
            };

            slots[column.field] = Some(Argument {
                field: field.name().to_string(),
                kind: field.kind(),
                token: token.to_string(),
                value,
            });
        }
        let arguments: Vec<Argument> = slots.into_iter().flatten().collect();

        match &self.construction {
            Construction::AllArgs(constructor) => {
                let mut arguments = Arguments::new(arguments);
                let item = constructor(&mut arguments)?;
                if arguments.remaining() > 0 {
                    return Err(TypeSpecError::Descriptor(format!(
                        "constructor of {} left {} field(s) unread",
                        type_name::<T>(),
                        arguments.remaining()
                    )));
                }
                Ok(item)
            }
            Construction::NoArgs(constructor) => {
                let mut item = constructor();
                for (field, argument) in self.fields.iter().zip(arguments) {
                    field
                        .write(&mut item, argument.value)
                        .map_err(|reason| invalid_token(field.name(), &argument.token, reason))?;
                }
                Ok(item)
            }
        }
    }

    /// Field names in serialization order.
    pub fn field_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(|column| self.fields[column.field].name())
            .collect()
    }

    /// Field names in serialization order, joined with the delimiter.
    pub fn header(&self) -> String {
        let delimiter = self.delimiter.to_string();
        self.field_names().join(delimiter.as_str())
    }

    pub fn null_replacement(&self) -> &str {
        &self.null_replacement
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }
}

impl<T> fmt::Debug for TypeSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeSpec")
            .field("type", &type_name::<T>())
            .field("fields", &self.field_names())
            .field("null_replacement", &self.null_replacement)
            .field("delimiter", &self.delimiter)
            .finish()
    }
}

fn invalid_token(field: &str, token: &str, reason: String) -> TypeSpecError {
    FormatError::InvalidToken {
        field: field.to_string(),
        token: token.to_string(),
        reason,
    }
    .into()
}

/// A builder for configuring a [`TypeSpec`].
///
/// # Default Configuration
///
/// - Null replacement: empty string
/// - Delimiter: semicolon (;)
/// - Field order: declared positions, then declaration order
/// - Rendering: built-in converter of each field's kind
///
/// Every check happens in [`TypeSpecBuilder::build`]: a field of an
/// unregistered kind, a duplicate field name or a setting naming an unknown
/// field fails there, never while serializing.
pub struct TypeSpecBuilder<T> {
    table: FieldTable<T>,
    config: MappingConfiguration<T>,
}

impl<T: Record> TypeSpecBuilder<T> {
    pub fn new() -> Self {
        let mut table = FieldTable::new();
        T::describe(&mut table);
        Self::with_table(table)
    }
}

impl<T: Record> Default for TypeSpecBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> TypeSpecBuilder<T> {
    /// Starts from a field table built by hand, for types that do not
    /// implement [`Record`].
    pub fn with_table(table: FieldTable<T>) -> Self {
        Self {
            table,
            config: MappingConfiguration::default(),
        }
    }

    /// Sets the text written for absent values and read back as absent.
    pub fn null_replacement(mut self, text: impl Into<String>) -> Self {
        self.config.null_replacement = text.into();
        self
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    /// Places a field at `position`, overriding its declared position.
    ///
    /// Use [`LAST_POSITION`](crate::core::field::LAST_POSITION) to move a
    /// field to the end.
    pub fn position(mut self, name: impl Into<String>, position: usize) -> Self {
        self.config.positions.insert(name.into(), position);
        self
    }

    /// Configures render overrides.
    ///
    /// # Examples
    ///
    /// ```
    /// # use typespec_rs::core::field::{FieldTable, Record};
    /// # use typespec_rs::core::type_spec::TypeSpec;
    /// use typespec_rs::core::value::{Value, ValueKind};
    /// # #[derive(Default)]
    /// # struct Account { id: i64, owner: String, credit: i64 }
    /// # impl Record for Account {
    /// #     fn describe(table: &mut FieldTable<Self>) {
    /// #         table.property("id", |a: &Account| a.id, |a, v| a.id = v);
    /// #         table.property("owner", |a: &Account| a.owner.clone(), |a, v| a.owner = v);
    /// #         table.property("credit", |a: &Account| a.credit, |a, v| a.credit = v);
    /// #         table.no_args_constructor(Account::default);
    /// #     }
    /// # }
    ///
    /// let spec = TypeSpec::<Account>::for_type()
    ///     .serialization(|s| {
    ///         s.field_mapping("id", |a: &Account| format!("{:0>6}", a.id))
    ///             .type_mapping(ValueKind::Integer, |v: &Value| format!("{}.00", v))
    ///     })
    ///     .build()
    ///     .unwrap();
    ///
    /// let account = Account { id: 42, owner: "Ann".to_string(), credit: 7 };
    /// assert_eq!(spec.serialize(&account), "000042;Ann;7.00");
    /// ```
    pub fn serialization<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(SerializationBuilder<T>) -> SerializationBuilder<T>,
    {
        let current = mem::take(&mut self.config.serialization);
        self.config.serialization = configure(current);
        self
    }

    /// Registers the converter of a custom kind, or replaces a built-in one.
    ///
    /// Unlike render overrides, a converter also changes how the kind is parsed.
    pub fn converter(mut self, kind: ValueKind, converter: Converter) -> Self {
        self.config.converters.register(kind, converter);
        self
    }

    /// Applies external settings on top of the current configuration.
    pub fn settings(mut self, settings: &SpecSettings) -> Self {
        if let Some(null_replacement) = &settings.null_replacement {
            self.config.null_replacement = null_replacement.clone();
        }
        if let Some(delimiter) = settings.delimiter {
            self.config.delimiter = delimiter;
        }
        for (name, position) in &settings.positions {
            self.config.positions.insert(name.clone(), position.resolve());
        }
        self
    }

    /// Freezes the configuration into a [`TypeSpec`].
    ///
    /// # Errors
    ///
    /// - [`TypeSpecError::Descriptor`] when the field table is invalid
    /// - [`TypeSpecError::UnknownField`] when a position or a field mapping
    ///   names a field the type does not declare
    /// - [`TypeSpecError::UnsupportedKind`] when no converter is registered for
    ///   the kind of a field
    pub fn build(self) -> Result<TypeSpec<T>, TypeSpecError> {
        let TypeSpecBuilder { table, config } = self;
        let (fields, construction) = table.into_parts()?;

        let is_declared = |name: &String| fields.iter().any(|field| field.name() == name);
        if let Some(name) = config
            .positions
            .keys()
            .chain(config.serialization.field_mappings.keys())
            .find(|name| !is_declared(*name))
        {
            return Err(TypeSpecError::UnknownField(name.clone()));
        }

        let columns = resolve_order(&fields, &config.positions)
            .into_iter()
            .map(|index| -> Result<Column<T>, TypeSpecError> {
                let field = &fields[index];
                let parser = config
                    .converters
                    .get(field.kind())
                    .cloned()
                    .ok_or_else(|| TypeSpecError::UnsupportedKind {
                        field: field.name().to_string(),
                        kind: field.kind(),
                    })?;

                let renderer = match config.serialization.field_mappings.get(field.name()) {
                    Some(render) => Renderer::Field(render.clone()),
                    None => match config.serialization.type_mappings.get(&field.kind()) {
                        Some(render) => Renderer::Kind(render.clone()),
                        None => Renderer::Converter(parser.clone()),
                    },
                };

                Ok(Column {
                    field: index,
                    renderer,
                    parser,
                })
            })
            .collect::<Result<Vec<_>, TypeSpecError>>()?;

        let spec = TypeSpec {
            fields,
            columns,
            construction,
            null_replacement: config.null_replacement,
            delimiter: config.delimiter,
        };

        debug!(
            "TypeSpec for {} built with fields [{}]",
            type_name::<T>(),
            spec.field_names().join(", ")
        );

        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::TypeSpec;
    use crate::{
        core::{
            converter::Converter,
            field::{FieldTable, LAST_POSITION, Record},
            type_spec::TypeSpecBuilder,
            value::{Value, ValueKind},
        },
        error::{FormatError, TypeSpecError},
    };

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Line {
        label: Option<String>,
        count: u32,
        ratio: Option<i64>,
    }

    impl Record for Line {
        fn describe(table: &mut FieldTable<Self>) {
            table.property("label", |l: &Line| l.label.clone(), |l, v| l.label = v);
            table.property("count", |l: &Line| l.count, |l, v| l.count = v);
            table.property("ratio", |l: &Line| l.ratio, |l, v| l.ratio = v);
            table.no_args_constructor(Line::default);
        }
    }

    fn line() -> Line {
        Line {
            label: Some("x".to_string()),
            count: 3,
            ratio: Some(-1),
        }
    }

    #[test]
    fn empty_tokens_are_preserved() {
        let spec = TypeSpec::<Line>::for_type().build().unwrap();
        let item = Line {
            label: None,
            count: 0,
            ratio: None,
        };
        assert_eq!(spec.serialize(&item), ";0;");
        assert_eq!(spec.deserialize(";0;").unwrap(), item);
    }

    #[test]
    fn header_follows_field_order() {
        let spec = TypeSpec::<Line>::for_type()
            .position("ratio", 0)
            .delimiter('|')
            .build()
            .unwrap();
        assert_eq!(spec.field_names(), ["ratio", "label", "count"]);
        assert_eq!(spec.header(), "ratio|label|count");
        assert_eq!(spec.serialize(&line()), "-1|x|3");
    }

    #[test]
    fn last_position_moves_field_to_end() {
        let spec = TypeSpec::<Line>::for_type()
            .position("label", LAST_POSITION)
            .build()
            .unwrap();
        assert_eq!(spec.serialize(&line()), "3;-1;x");
        assert_eq!(spec.deserialize("3;-1;x").unwrap(), line());
    }

    #[test]
    fn token_count_must_match() {
        let spec = TypeSpec::<Line>::for_type().build().unwrap();
        assert_eq!(
            spec.deserialize("x;3").unwrap_err(),
            TypeSpecError::Format(FormatError::TokenCount {
                expected: 3,
                found: 2
            })
        );
        assert!(spec.deserialize("x;3;1;").is_err());
    }

    #[test]
    fn unparsable_token_names_field() {
        let spec = TypeSpec::<Line>::for_type().build().unwrap();
        match spec.deserialize("x;three;1") {
            Err(TypeSpecError::Format(FormatError::InvalidToken { field, token, .. })) => {
                assert_eq!(field, "count");
                assert_eq!(token, "three");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn required_field_rejects_null_replacement() {
        let spec = TypeSpec::<Line>::for_type()
            .null_replacement("NULL")
            .build()
            .unwrap();
        assert!(matches!(
            spec.deserialize("x;NULL;1"),
            Err(TypeSpecError::Format(FormatError::InvalidToken { .. }))
        ));
    }

    #[test]
    fn converter_changes_rendering_and_parsing() {
        let hex = Converter::new(
            |value| format!("{:x}", value.as_integer().unwrap_or_default()),
            |text| {
                i64::from_str_radix(text, 16)
                    .map(Value::Integer)
                    .map_err(|error| error.to_string())
            },
        );
        let spec = TypeSpec::<Line>::for_type()
            .converter(ValueKind::Integer, hex)
            .build()
            .unwrap();

        let item = Line {
            label: None,
            count: 255,
            ratio: Some(16),
        };
        assert_eq!(spec.serialize(&item), ";ff;10");
        assert_eq!(spec.deserialize(";ff;10").unwrap(), item);
    }

    #[test]
    fn serialization_calls_accumulate() {
        let spec = TypeSpec::<Line>::for_type()
            .serialization(|s| s.field_mapping("label", |_: &Line| "L".to_string()))
            .serialization(|s| s.type_mapping(ValueKind::Integer, |_: &Value| "N".to_string()))
            .build()
            .unwrap();
        assert_eq!(spec.serialize(&line()), "L;N;N");
    }

    #[test]
    fn unknown_field_fails_build() {
        let result = TypeSpec::<Line>::for_type().position("missing", 1).build();
        assert_eq!(
            result.err(),
            Some(TypeSpecError::UnknownField("missing".to_string()))
        );

        let result = TypeSpec::<Line>::for_type()
            .serialization(|s| s.field_mapping("other", |_: &Line| String::new()))
            .build();
        assert_eq!(
            result.err(),
            Some(TypeSpecError::UnknownField("other".to_string()))
        );
    }

    #[test]
    fn hand_built_table_is_accepted() {
        let mut table = FieldTable::<(i32, bool)>::new();
        table.field("number", |t: &(i32, bool)| t.0);
        table.field("flag", |t: &(i32, bool)| t.1);
        table.all_args_constructor(|args| Ok((args.next()?, args.next()?)));

        let spec = TypeSpecBuilder::with_table(table).build().unwrap();
        assert_eq!(spec.serialize(&(7, true)), "7;true");
        assert_eq!(spec.deserialize("7;true").unwrap(), (7, true));
    }

    #[test]
    fn constructor_must_read_every_field() {
        let mut table = FieldTable::<i32>::new();
        table.field("a", |t: &i32| *t);
        table.field("b", |t: &i32| *t);
        table.all_args_constructor(|args| args.next());

        let spec = TypeSpecBuilder::with_table(table).build().unwrap();
        assert!(matches!(
            spec.deserialize("1;2"),
            Err(TypeSpecError::Descriptor(_))
        ));
    }
}
