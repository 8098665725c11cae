use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

/// Format used for calendar dates: `2010-04-17`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format used for date-times: `2022-03-04T14:56:00`, with a fractional
/// second only when the value carries one.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Conversion category of a field.
///
/// The kind selects the converter used to render and parse the field.
/// `Custom` kinds have no built-in converter; one has to be registered on the
/// builder, otherwise building the `TypeSpec` fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Integer,
    Decimal,
    Boolean,
    Date,
    DateTime,
    Custom(&'static str),
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::String => f.write_str("string"),
            ValueKind::Integer => f.write_str("integer"),
            ValueKind::Decimal => f.write_str("decimal"),
            ValueKind::Boolean => f.write_str("boolean"),
            ValueKind::Date => f.write_str("date"),
            ValueKind::DateTime => f.write_str("date-time"),
            ValueKind::Custom(name) => write!(f, "custom({})", name),
        }
    }
}

/// A present field value, as seen by converters and render overrides.
///
/// Absent values never reach this type: they are `None` at the field level
/// and rendered as the null replacement.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(integer) => Some(*integer),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Decimal(decimal) => Some(*decimal),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(boolean) => Some(*boolean),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(date) => Some(*date),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(date_time) => Some(*date_time),
            _ => None,
        }
    }

    fn variant(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Integer(_) => "integer",
            Value::Decimal(_) => "decimal",
            Value::Boolean(_) => "boolean",
            Value::Date(_) => "date",
            Value::DateTime(_) => "date-time",
        }
    }
}

/// Canonical text form of a value. The built-in converters render with it.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => f.write_str(text),
            Value::Integer(integer) => write!(f, "{}", integer),
            Value::Decimal(decimal) => write!(f, "{}", decimal),
            Value::Boolean(boolean) => write!(f, "{}", boolean),
            Value::Date(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            Value::DateTime(date_time) => write!(f, "{}", date_time.format(DATE_TIME_FORMAT)),
        }
    }
}

/// Bridges a Rust field type and the [`Value`] model.
///
/// `Option<V>` is nullable: `None` is rendered as the null replacement and the
/// null replacement parses back to `None`. Plain types are required, with the
/// exception of `String`, which reads an absent value as the empty string.
///
/// # Examples
///
/// A type with its own textual form declares a custom kind and maps onto one
/// of the existing value variants:
///
/// ```
/// use typespec_rs::core::value::{FieldType, Value, ValueKind};
///
/// #[derive(Debug, PartialEq)]
/// struct Percent(u8);
///
/// impl FieldType for Percent {
///     const KIND: ValueKind = ValueKind::Custom("percent");
///
///     fn into_value(self) -> Option<Value> {
///         Some(Value::Integer(i64::from(self.0)))
///     }
///
///     fn from_value(value: Option<Value>) -> Result<Self, String> {
///         match value.as_ref().and_then(Value::as_integer) {
///             Some(integer) => u8::try_from(integer)
///                 .map(Percent)
///                 .map_err(|error| error.to_string()),
///             None => Err("expected an integer".to_string()),
///         }
///     }
/// }
///
/// assert_eq!(Percent(42).into_value(), Some(Value::Integer(42)));
/// ```
pub trait FieldType: Sized {
    const KIND: ValueKind;

    fn into_value(self) -> Option<Value>;

    fn from_value(value: Option<Value>) -> Result<Self, String>;
}

impl<V: FieldType> FieldType for Option<V> {
    const KIND: ValueKind = V::KIND;

    fn into_value(self) -> Option<Value> {
        self.and_then(V::into_value)
    }

    fn from_value(value: Option<Value>) -> Result<Self, String> {
        match value {
            None => Ok(None),
            value => V::from_value(value).map(Some),
        }
    }
}

fn required(kind: ValueKind) -> String {
    format!("{} value is required", kind)
}

fn mismatch(kind: ValueKind, found: &Value) -> String {
    format!("expected {} value, found {}", kind, found.variant())
}

impl FieldType for String {
    const KIND: ValueKind = ValueKind::String;

    fn into_value(self) -> Option<Value> {
        Some(Value::Text(self))
    }

    fn from_value(value: Option<Value>) -> Result<Self, String> {
        match value {
            Some(Value::Text(text)) => Ok(text),
            Some(other) => Err(mismatch(Self::KIND, &other)),
            None => Ok(String::new()),
        }
    }
}

macro_rules! integer_field_type {
    ($($ty:ty),*) => {
        $(
            impl FieldType for $ty {
                const KIND: ValueKind = ValueKind::Integer;

                fn into_value(self) -> Option<Value> {
                    Some(Value::Integer(i64::from(self)))
                }

                fn from_value(value: Option<Value>) -> Result<Self, String> {
                    match value {
                        Some(Value::Integer(integer)) => {
                            <$ty>::try_from(integer).map_err(|error| error.to_string())
                        }
                        Some(other) => Err(mismatch(Self::KIND, &other)),
                        None => Err(required(Self::KIND)),
                    }
                }
            }
        )*
    };
}

integer_field_type!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! scalar_field_type {
    ($ty:ty, $kind:expr, $variant:ident) => {
        impl FieldType for $ty {
            const KIND: ValueKind = $kind;

            fn into_value(self) -> Option<Value> {
                Some(Value::$variant(self))
            }

            fn from_value(value: Option<Value>) -> Result<Self, String> {
                match value {
                    Some(Value::$variant(inner)) => Ok(inner),
                    Some(other) => Err(mismatch(Self::KIND, &other)),
                    None => Err(required(Self::KIND)),
                }
            }
        }
    };
}

scalar_field_type!(Decimal, ValueKind::Decimal, Decimal);
scalar_field_type!(bool, ValueKind::Boolean, Boolean);
scalar_field_type!(NaiveDate, ValueKind::Date, Date);
scalar_field_type!(NaiveDateTime, ValueKind::DateTime, DateTime);
