//! Argument declarations and the scalar value model
//!
//! A `Declaration` describes one bindable slot: its names, untyped default,
//! help text, and value kind. Declarations are immutable after construction
//! and identified by their `SlotId`, never by name.

use serde_json::Value;
use std::fmt;

use crate::error::ArgError;

/// Unique identity of a bindable field slot: owning type plus field name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotId {
    type_name: String,
    field: String,
}

impl SlotId {
    pub fn new(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            field: field.into(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.field)
    }
}

/// The identifier set of a declaration.
///
/// A declaration always carries at least one name; the invariant is encoded
/// in the variants rather than checked at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Names {
    Long(String),
    Short(String),
    LongShort { long: String, short: String },
}

impl Names {
    pub fn long(name: impl Into<String>) -> Self {
        Names::Long(name.into())
    }

    pub fn short(name: impl Into<String>) -> Self {
        Names::Short(name.into())
    }

    pub fn long_short(long: impl Into<String>, short: impl Into<String>) -> Self {
        Names::LongShort {
            long: long.into(),
            short: short.into(),
        }
    }

    /// The long name, if any
    pub fn long_name(&self) -> Option<&str> {
        match self {
            Names::Long(long) | Names::LongShort { long, .. } => Some(long),
            Names::Short(_) => None,
        }
    }

    /// The short name, if any
    pub fn short_name(&self) -> Option<&str> {
        match self {
            Names::Short(short) | Names::LongShort { short, .. } => Some(short),
            Names::Long(_) => None,
        }
    }

    /// Whether a delimiter-stripped token matches either name exactly
    pub fn matches(&self, stripped: &str) -> bool {
        self.long_name() == Some(stripped) || self.short_name() == Some(stripped)
    }

    /// Long name if present, short name otherwise
    pub fn display_name(&self) -> &str {
        match self {
            Names::Long(long) | Names::LongShort { long, .. } => long,
            Names::Short(short) => short,
        }
    }
}

/// Static type descriptor of a slot, drives scalar conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Integer,
    Float,
    Boolean,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Text => write!(f, "text"),
            ValueKind::Integer => write!(f, "integer"),
            ValueKind::Float => write!(f, "float"),
            ValueKind::Boolean => write!(f, "boolean"),
        }
    }
}

impl ValueKind {
    /// Parse a user-supplied token into a typed value
    pub fn parse(self, token: &str, slot: &SlotId) -> Result<ArgValue, ArgError> {
        let invalid = || ArgError::InvalidConversion {
            slot: slot.to_string(),
            value: token.to_string(),
            expected: self.to_string(),
        };

        match self {
            ValueKind::Text => Ok(ArgValue::Text(token.to_string())),
            ValueKind::Integer => token
                .trim()
                .parse::<i64>()
                .map(ArgValue::Integer)
                .map_err(|_| invalid()),
            ValueKind::Float => token
                .trim()
                .parse::<f64>()
                .map(ArgValue::Float)
                .map_err(|_| invalid()),
            ValueKind::Boolean => match token.trim() {
                "true" => Ok(ArgValue::Boolean(true)),
                "false" => Ok(ArgValue::Boolean(false)),
                _ => Err(invalid()),
            },
        }
    }

    /// Convert an untyped default into a typed value
    ///
    /// Strings go through the same parsing path as user tokens, so a default
    /// of `"42"` on an integer slot yields the typed integer 42. Null, arrays,
    /// and objects never convert.
    pub fn convert(self, value: &Value, slot: &SlotId) -> Result<ArgValue, ArgError> {
        let invalid = || ArgError::InvalidConversion {
            slot: slot.to_string(),
            value: value.to_string(),
            expected: self.to_string(),
        };

        match (self, value) {
            (_, Value::String(s)) => self.parse(s, slot),
            (ValueKind::Text, Value::Number(n)) => Ok(ArgValue::Text(n.to_string())),
            (ValueKind::Text, Value::Bool(b)) => Ok(ArgValue::Text(b.to_string())),
            (ValueKind::Integer, Value::Number(n)) => {
                n.as_i64().map(ArgValue::Integer).ok_or_else(invalid)
            }
            (ValueKind::Float, Value::Number(n)) => {
                n.as_f64().map(ArgValue::Float).ok_or_else(invalid)
            }
            (ValueKind::Boolean, Value::Bool(b)) => Ok(ArgValue::Boolean(*b)),
            _ => Err(invalid()),
        }
    }
}

/// A resolved, typed value ready for assignment
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl ArgValue {
    pub fn text(&self) -> Option<&str> {
        match self {
            ArgValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn integer(&self) -> Option<i64> {
        match self {
            ArgValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn float(&self) -> Option<f64> {
        match self {
            ArgValue::Float(f) => Some(*f),
            ArgValue::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn boolean(&self) -> Option<bool> {
        match self {
            ArgValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Narrow to a Rust scalar, reporting `slot` on failure
    ///
    /// This is the accessor `Bindable::assign` implementations are expected
    /// to use: `self.port = value.convert_to(slot)?;`
    pub fn convert_to<T: FromArgValue>(&self, slot: &SlotId) -> Result<T, ArgError> {
        T::from_arg_value(self).ok_or_else(|| ArgError::InvalidConversion {
            slot: slot.to_string(),
            value: self.render(),
            expected: std::any::type_name::<T>().to_string(),
        })
    }

    fn render(&self) -> String {
        match self {
            ArgValue::Text(s) => s.clone(),
            ArgValue::Integer(n) => n.to_string(),
            ArgValue::Float(f) => f.to_string(),
            ArgValue::Boolean(b) => b.to_string(),
        }
    }
}

/// Narrowing conversions from a typed value to Rust scalars
pub trait FromArgValue: Sized {
    fn from_arg_value(value: &ArgValue) -> Option<Self>;
}

impl FromArgValue for String {
    fn from_arg_value(value: &ArgValue) -> Option<Self> {
        value.text().map(str::to_string)
    }
}

impl FromArgValue for bool {
    fn from_arg_value(value: &ArgValue) -> Option<Self> {
        value.boolean()
    }
}

impl FromArgValue for f64 {
    fn from_arg_value(value: &ArgValue) -> Option<Self> {
        value.float()
    }
}

impl FromArgValue for f32 {
    fn from_arg_value(value: &ArgValue) -> Option<Self> {
        value.float().map(|f| f as f32)
    }
}

impl FromArgValue for i64 {
    fn from_arg_value(value: &ArgValue) -> Option<Self> {
        value.integer()
    }
}

macro_rules! narrow_integer {
    ($($ty:ty),*) => {
        $(
            impl FromArgValue for $ty {
                fn from_arg_value(value: &ArgValue) -> Option<Self> {
                    value.integer().and_then(|n| <$ty>::try_from(n).ok())
                }
            }
        )*
    };
}

narrow_integer!(i32, u64, u32, u16, usize);

/// Immutable descriptor of one bindable argument
#[derive(Debug, Clone)]
pub struct Declaration {
    slot: SlotId,
    kind: ValueKind,
    names: Names,
    default: Value,
    help: String,
}

impl Declaration {
    pub fn new(slot: SlotId, kind: ValueKind, names: Names) -> Self {
        Self {
            slot,
            kind,
            names,
            default: Value::Null,
            help: String::new(),
        }
    }

    /// Set the untyped default value
    pub fn default_value(mut self, default: Value) -> Self {
        self.default = default;
        self
    }

    /// Set the help text (carried for rendering layers, never inspected here)
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn slot(&self) -> &SlotId {
        &self.slot
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn names(&self) -> &Names {
        &self.names
    }

    pub fn default(&self) -> &Value {
        &self.default
    }

    pub fn help_text(&self) -> &str {
        &self.help
    }

    /// Convert the default to this declaration's kind
    pub fn converted_default(&self) -> Result<ArgValue, ArgError> {
        self.kind.convert(&self.default, &self.slot)
    }
}
