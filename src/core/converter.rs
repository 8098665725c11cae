use std::{collections::HashMap, fmt, str::FromStr, sync::Arc};

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use super::value::{DATE_FORMAT, DATE_TIME_FORMAT, Value, ValueKind};

type RenderFn = dyn Fn(&Value) -> String + Send + Sync;
type ParseFn = dyn Fn(&str) -> Result<Value, String> + Send + Sync;

/// A pair of pure functions turning a value into text and back.
///
/// Built-in converters are exact inverses of each other: parsing a rendered
/// value gives the original value back.
#[derive(Clone)]
pub struct Converter {
    render: Arc<RenderFn>,
    parse: Arc<ParseFn>,
}

impl Converter {
    /// Creates a converter from a render and a parse function.
    ///
    /// # Examples
    ///
    /// ```
    /// use typespec_rs::core::converter::Converter;
    /// use typespec_rs::core::value::Value;
    ///
    /// let percent = Converter::new(
    ///     |value| format!("{}%", value),
    ///     |text| {
    ///         text.strip_suffix('%')
    ///             .ok_or_else(|| "missing % sign".to_string())?
    ///             .parse::<i64>()
    ///             .map(Value::Integer)
    ///             .map_err(|error| error.to_string())
    ///     },
    /// );
    ///
    /// assert_eq!(percent.render(&Value::Integer(42)), "42%");
    /// assert_eq!(percent.parse("42%"), Ok(Value::Integer(42)));
    /// ```
    pub fn new<R, P>(render: R, parse: P) -> Self
    where
        R: Fn(&Value) -> String + Send + Sync + 'static,
        P: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self {
            render: Arc::new(render),
            parse: Arc::new(parse),
        }
    }

    pub fn render(&self, value: &Value) -> String {
        (self.render)(value)
    }

    pub fn parse(&self, text: &str) -> Result<Value, String> {
        (self.parse)(text)
    }

    /// Converter of a built-in kind, `None` for custom kinds.
    pub fn builtin(kind: ValueKind) -> Option<Self> {
        let parse: fn(&str) -> Result<Value, String> = match kind {
            ValueKind::String => |text| Ok(Value::Text(text.to_string())),
            ValueKind::Integer => |text| {
                text.parse::<i64>()
                    .map(Value::Integer)
                    .map_err(|error| error.to_string())
            },
            ValueKind::Decimal => |text| {
                Decimal::from_str(text)
                    .map(Value::Decimal)
                    .map_err(|error| error.to_string())
            },
            ValueKind::Boolean => |text| {
                text.parse::<bool>()
                    .map(Value::Boolean)
                    .map_err(|error| error.to_string())
            },
            ValueKind::Date => |text| {
                NaiveDate::parse_from_str(text, DATE_FORMAT)
                    .map(Value::Date)
                    .map_err(|error| error.to_string())
            },
            ValueKind::DateTime => |text| {
                NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT)
                    .map(Value::DateTime)
                    .map_err(|error| error.to_string())
            },
            ValueKind::Custom(_) => return None,
        };

        Some(Self::new(Value::to_string, parse))
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter").finish_non_exhaustive()
    }
}

/// Maps each value kind to its converter.
///
/// A new registry knows the six built-in kinds. Custom kinds are added with
/// [`ConverterRegistry::register`], which can also replace a built-in converter.
#[derive(Clone, Debug)]
pub struct ConverterRegistry {
    converters: HashMap<ValueKind, Converter>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        let converters = [
            ValueKind::String,
            ValueKind::Integer,
            ValueKind::Decimal,
            ValueKind::Boolean,
            ValueKind::Date,
            ValueKind::DateTime,
        ]
        .into_iter()
        .filter_map(|kind| Converter::builtin(kind).map(|converter| (kind, converter)))
        .collect();

        Self { converters }
    }

    pub fn register(&mut self, kind: ValueKind, converter: Converter) {
        self.converters.insert(kind, converter);
    }

    pub fn get(&self, kind: ValueKind) -> Option<&Converter> {
        self.converters.get(&kind)
    }

    pub fn contains(&self, kind: ValueKind) -> bool {
        self.converters.contains_key(&kind)
    }

    pub fn render(&self, kind: ValueKind, value: &Value) -> Result<String, String> {
        self.get(kind)
            .map(|converter| converter.render(value))
            .ok_or_else(|| format!("no converter registered for kind {}", kind))
    }

    pub fn parse(&self, kind: ValueKind, text: &str) -> Result<Value, String> {
        self.get(kind)
            .ok_or_else(|| format!("no converter registered for kind {}", kind))?
            .parse(text)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
