use std::{collections::HashSet, fmt, vec};

use crate::error::{FormatError, TypeSpecError};

use super::value::{FieldType, Value, ValueKind};

/// Position sentinel placing a field after every field with a lower position.
pub const LAST_POSITION: usize = usize::MAX;

type Getter<T> = Box<dyn Fn(&T) -> Option<Value> + Send + Sync>;
type Setter<T> = Box<dyn Fn(&mut T, Option<Value>) -> Result<(), String> + Send + Sync>;
type AllArgsConstructor<T> = Box<dyn Fn(&mut Arguments) -> Result<T, TypeSpecError> + Send + Sync>;
type NoArgsConstructor<T> = Box<dyn Fn() -> T + Send + Sync>;

/// Static metadata about one field of a record type.
pub struct FieldDescriptor<T> {
    name: String,
    kind: ValueKind,
    ordinal: usize,
    declared_position: Option<usize>,
    getter: Getter<T>,
    setter: Option<Setter<T>>,
}

impl<T> FieldDescriptor<T> {
    /// Declares the default position of the field.
    ///
    /// This is the lowest-priority explicit position: a position given on the
    /// `TypeSpecBuilder` wins over it. Without it, the field sits at its
    /// declaration index.
    pub fn position(&mut self, position: usize) -> &mut Self {
        self.declared_position = Some(position);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// 0-based declaration index.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn declared_position(&self) -> Option<usize> {
        self.declared_position
    }

    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    pub fn read(&self, item: &T) -> Option<Value> {
        (self.getter)(item)
    }

    pub(crate) fn write(&self, item: &mut T, value: Option<Value>) -> Result<(), String> {
        match &self.setter {
            Some(setter) => setter(item, value),
            None => Err(format!("field `{}` has no setter", self.name)),
        }
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("ordinal", &self.ordinal)
            .field("declared_position", &self.declared_position)
            .field("writable", &self.is_writable())
            .finish()
    }
}

pub(crate) enum Construction<T> {
    AllArgs(AllArgsConstructor<T>),
    NoArgs(NoArgsConstructor<T>),
}

/// Field table of a record type, filled once by [`Record::describe`].
///
/// Two shapes are supported:
///
/// - value types register read-only fields with [`FieldTable::field`] and an
///   [`FieldTable::all_args_constructor`] receiving the parsed values in
///   declaration order,
/// - mutable types register [`FieldTable::property`] accessors and a
///   [`FieldTable::no_args_constructor`], every property being written after
///   instantiation.
pub struct FieldTable<T> {
    fields: Vec<FieldDescriptor<T>>,
    construction: Option<Construction<T>>,
}

impl<T: 'static> FieldTable<T> {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            construction: None,
        }
    }

    /// Registers a read-only field.
    pub fn field<V, G>(&mut self, name: impl Into<String>, getter: G) -> &mut FieldDescriptor<T>
    where
        V: FieldType + 'static,
        G: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.push(
            name.into(),
            V::KIND,
            Box::new(move |item: &T| getter(item).into_value()),
            None,
        )
    }

    /// Registers a field with both a getter and a setter.
    pub fn property<V, G, S>(
        &mut self,
        name: impl Into<String>,
        getter: G,
        setter: S,
    ) -> &mut FieldDescriptor<T>
    where
        V: FieldType + 'static,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let setter: Setter<T> = Box::new(move |item: &mut T, value: Option<Value>| {
            setter(item, V::from_value(value)?);
            Ok(())
        });

        self.push(
            name.into(),
            V::KIND,
            Box::new(move |item: &T| getter(item).into_value()),
            Some(setter),
        )
    }

    /// Registers the constructor of a value type.
    ///
    /// The constructor pulls one argument per declared field, in declaration
    /// order, whatever the serialization order is.
    pub fn all_args_constructor<C>(&mut self, constructor: C)
    where
        C: Fn(&mut Arguments) -> Result<T, TypeSpecError> + Send + Sync + 'static,
    {
        self.construction = Some(Construction::AllArgs(Box::new(constructor)));
    }

    /// Registers the constructor of a mutable type.
    pub fn no_args_constructor<C>(&mut self, constructor: C)
    where
        C: Fn() -> T + Send + Sync + 'static,
    {
        self.construction = Some(Construction::NoArgs(Box::new(constructor)));
    }

    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    fn push(
        &mut self,
        name: String,
        kind: ValueKind,
        getter: Getter<T>,
        setter: Option<Setter<T>>,
    ) -> &mut FieldDescriptor<T> {
        let ordinal = self.fields.len();
        self.fields.push(FieldDescriptor {
            name,
            kind,
            ordinal,
            declared_position: None,
            getter,
            setter,
        });
        &mut self.fields[ordinal]
    }

    /// Checks the table and splits it into its fields and constructor.
    pub(crate) fn into_parts(
        self,
    ) -> Result<(Vec<FieldDescriptor<T>>, Construction<T>), TypeSpecError> {
        if self.fields.is_empty() {
            return Err(TypeSpecError::Descriptor("no field declared".to_string()));
        }

        let mut names = HashSet::new();
        if let Some(duplicate) = self.fields.iter().find(|field| !names.insert(field.name())) {
            return Err(TypeSpecError::Descriptor(format!(
                "field `{}` is declared twice",
                duplicate.name()
            )));
        }

        let construction = self
            .construction
            .ok_or_else(|| TypeSpecError::Descriptor("no constructor declared".to_string()))?;

        if let Construction::NoArgs(_) = construction {
            if let Some(field) = self.fields.iter().find(|field| !field.is_writable()) {
                return Err(TypeSpecError::Descriptor(format!(
                    "field `{}` has no setter but the type is built through its no-args constructor",
                    field.name()
                )));
            }
        }

        Ok((self.fields, construction))
    }
}

impl<T: 'static> Default for FieldTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A type that can be mapped to a delimited line.
///
/// # Examples
///
/// ```
/// use typespec_rs::core::field::{FieldTable, Record};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Record for Point {
///     fn describe(table: &mut FieldTable<Self>) {
///         table.property("x", |p: &Point| p.x, |p, x| p.x = x);
///         table.property("y", |p: &Point| p.y, |p, y| p.y = y);
///         table.no_args_constructor(Point::default);
///     }
/// }
/// ```
pub trait Record: Sized + 'static {
    fn describe(table: &mut FieldTable<Self>);
}

pub(crate) struct Argument {
    pub(crate) field: String,
    pub(crate) kind: ValueKind,
    pub(crate) token: String,
    pub(crate) value: Option<Value>,
}

/// Parsed field values handed to an all-args constructor, in declaration order.
pub struct Arguments {
    values: vec::IntoIter<Argument>,
}

impl Arguments {
    pub(crate) fn new(values: Vec<Argument>) -> Self {
        Self {
            values: values.into_iter(),
        }
    }

    /// Takes the value of the next declared field.
    pub fn next<V: FieldType>(&mut self) -> Result<V, TypeSpecError> {
        let argument = self.values.next().ok_or_else(|| {
            TypeSpecError::Descriptor("constructor reads more arguments than declared fields".to_string())
        })?;

        if argument.kind != V::KIND {
            return Err(TypeSpecError::Descriptor(format!(
                "constructor reads field `{}` of kind {} as kind {}",
                argument.field,
                argument.kind,
                V::KIND
            )));
        }

        V::from_value(argument.value).map_err(|reason| {
            FormatError::InvalidToken {
                field: argument.field,
                token: argument.token,
                reason,
            }
            .into()
        })
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}
