//! Dynamic property values and the default response parser.

use std::{borrow::Cow, fmt};

use crate::error::{communication_error, Result, ValidationError};

/// A value travelling through a property, in either direction.
///
/// Text is a `Cow<'static, str>` so command tables can hold `const` values.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Float(f64),
    Int(i64),
    Bool(bool),
    Text(Cow<'static, str>),
    List(Vec<Value>),
}

impl Value {
    pub const fn text(s: &'static str) -> Self {
        Value::Text(Cow::Borrowed(s))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Float(_) => "float",
            Value::Int(_) => "integer",
            Value::Bool(_) => "boolean",
            Value::Text(_) => "text",
            Value::List(_) => "list",
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Equality that treats `Int(1)` and `Float(1.0)` as the same value.
    /// Device responses always come back as floats, so value maps are
    /// matched with this rather than `==`.
    pub fn matches(&self, other: &Value) -> bool {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Float(x) => write!(f, "{}", x),
            Value::Int(i) => write!(f, "{}", i),
            // IEEE 488.2 booleans
            Value::Bool(b) => write!(f, "{}", if *b { 1 } else { 0 }),
            Value::Text(s) => write!(f, "{}", s),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}
impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}
impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}
impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i as i64)
    }
}
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
impl From<&'static str> for Value {
    fn from(s: &'static str) -> Self {
        Value::Text(Cow::Borrowed(s))
    }
}
impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(Cow::Owned(s))
    }
}
impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// Conversion between a Rust type and a [`Value`] for typed property access.
pub trait Param: Sized {
    const TYPE: &'static str;
    fn into_value(self) -> Value;
    fn from_value(value: Value) -> std::result::Result<Self, ValidationError>;
}

fn wrong_type<T>(expected: &'static str, found: &Value) -> std::result::Result<T, ValidationError> {
    Err(ValidationError::WrongType {
        expected,
        found: format!("{} '{}'", found.type_name(), found),
    })
}

impl Param for f64 {
    const TYPE: &'static str = "float";
    fn into_value(self) -> Value {
        Value::Float(self)
    }
    fn from_value(value: Value) -> std::result::Result<Self, ValidationError> {
        match value.as_f64() {
            Some(x) => Ok(x),
            None => wrong_type(Self::TYPE, &value),
        }
    }
}

impl Param for i64 {
    const TYPE: &'static str = "integer";
    fn into_value(self) -> Value {
        Value::Int(self)
    }
    fn from_value(value: Value) -> std::result::Result<Self, ValidationError> {
        match value {
            Value::Int(i) => Ok(i),
            Value::Float(x) if x.fract() == 0.0 && x.is_finite() => Ok(x as i64),
            other => wrong_type(Self::TYPE, &other),
        }
    }
}

impl Param for bool {
    const TYPE: &'static str = "boolean";
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
    fn from_value(value: Value) -> std::result::Result<Self, ValidationError> {
        match &value {
            Value::Bool(b) => Ok(*b),
            Value::Int(0) => Ok(false),
            Value::Int(1) => Ok(true),
            Value::Float(x) if *x == 0.0 => Ok(false),
            Value::Float(x) if *x == 1.0 => Ok(true),
            Value::Text(s) if s.eq_ignore_ascii_case("ON") => Ok(true),
            Value::Text(s) if s.eq_ignore_ascii_case("OFF") => Ok(false),
            _ => wrong_type(Self::TYPE, &value),
        }
    }
}

impl Param for String {
    const TYPE: &'static str = "text";
    fn into_value(self) -> Value {
        Value::from(self)
    }
    fn from_value(value: Value) -> std::result::Result<Self, ValidationError> {
        match value {
            Value::Text(s) => Ok(s.into_owned()),
            other => Ok(other.to_string()),
        }
    }
}

impl Param for Vec<f64> {
    const TYPE: &'static str = "list of floats";
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(Value::Float).collect())
    }
    fn from_value(value: Value) -> std::result::Result<Self, ValidationError> {
        match value {
            Value::List(items) => items.into_iter().map(f64::from_value).collect(),
            other => f64::from_value(other).map(|x| vec![x]),
        }
    }
}

/// Default parsing of a query response.
///
/// The response is split on commas; every token that reads as a float becomes
/// [`Value::Float`], anything else becomes unquoted [`Value::Text`]. A single
/// token is returned as a scalar.
pub fn parse_response(response: &str) -> Result<Value> {
    let response = response.trim();
    if response.is_empty() {
        return Err(communication_error("empty response"));
    }
    let mut values: Vec<Value> = response.split(',').map(parse_token).collect();
    if values.len() == 1 {
        Ok(values.remove(0))
    } else {
        Ok(Value::List(values))
    }
}

fn parse_token(token: &str) -> Value {
    let token = token.trim();
    match token.parse::<f64>() {
        Ok(x) => Value::Float(x),
        Err(_) => Value::from(token.trim_matches('"').to_string()),
    }
}

pub fn parse_float(response: &str) -> Result<f64> {
    response.trim().parse::<f64>().map_err(|_| {
        communication_error(format!(
            "expected a floating-point response, got '{}'",
            response.trim()
        ))
    })
}
