//! Value domains, value maps and the validator family.
//!
//! A validator is a plain function `(candidate, domain) -> validated value`.
//! Validators never touch a transport.

use crate::{error::ValidationError, value::Value};

pub type Validator = fn(Value, &Values) -> Result<Value, ValidationError>;

/// The declared domain of a property.
#[derive(Debug, Clone, Copy)]
pub enum Values {
    /// Inclusive numeric bounds.
    Range(f64, f64),
    /// An enumerated set of legal values.
    Set(&'static [Value]),
    /// Logical values paired with their wire tokens.
    Map(ValueMap),
}

impl Values {
    /// Logical members of an enumerated domain.
    pub fn members(&self) -> Vec<&'static Value> {
        match *self {
            Values::Range(..) => Vec::new(),
            Values::Set(set) => set.iter().collect(),
            Values::Map(map) => map.keys().collect(),
        }
    }

    fn contains(&self, value: &Value) -> bool {
        match *self {
            Values::Range(min, max) => match value.as_f64() {
                Some(x) => x.fract() == 0.0 && x >= min && x <= max,
                None => false,
            },
            _ => self.members().iter().any(|m| m.matches(value)),
        }
    }

    fn bounds(&self) -> Option<(f64, f64)> {
        match *self {
            Values::Range(min, max) => Some((min, max)),
            _ => self
                .members()
                .iter()
                .filter_map(|m| m.as_f64())
                .fold(None, |acc, x| match acc {
                    None => Some((x, x)),
                    Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
                }),
        }
    }
}

/// Bidirectional mapping between logical values and wire tokens.
#[derive(Debug, Clone, Copy)]
pub struct ValueMap(&'static [(Value, Value)]);

impl ValueMap {
    pub const fn new(pairs: &'static [(Value, Value)]) -> Self {
        Self(pairs)
    }

    pub fn pairs(&self) -> &'static [(Value, Value)] {
        self.0
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static Value> {
        self.0.iter().map(|(k, _)| k)
    }

    pub fn forward(&self, key: &Value) -> Option<&'static Value> {
        self.0.iter().find(|(k, _)| k.matches(key)).map(|(_, v)| v)
    }

    pub fn reverse(&self, token: &Value) -> Option<&'static Value> {
        self.0.iter().find(|(_, v)| v.matches(token)).map(|(k, _)| k)
    }

    /// True when no two keys and no two tokens coincide.
    pub fn is_bijective(&self) -> bool {
        let pairs = self.0;
        pairs.iter().enumerate().all(|(i, (k, v))| {
            pairs[i + 1..]
                .iter()
                .all(|(k2, v2)| !k.matches(k2) && !v.matches(v2))
        })
    }
}

fn numeric(value: &Value) -> Result<f64, ValidationError> {
    value.as_f64().ok_or_else(|| ValidationError::WrongType {
        expected: "numeric",
        found: format!("{} '{}'", value.type_name(), value),
    })
}

fn not_in_set(value: &Value) -> ValidationError {
    ValidationError::NotInSet {
        value: value.to_string(),
    }
}

/// Accepts `value` only if it is a member of the domain. For a map domain the
/// logical keys are the members.
pub fn strict_discrete_set(value: Value, values: &Values) -> Result<Value, ValidationError> {
    if values.contains(&value) {
        Ok(value)
    } else {
        Err(not_in_set(&value))
    }
}

/// Accepts a numeric `value` inside the inclusive bounds of the domain.
pub fn strict_range(value: Value, values: &Values) -> Result<Value, ValidationError> {
    let x = numeric(&value)?;
    let (min, max) = values.bounds().ok_or_else(|| not_in_set(&value))?;
    if x >= min && x <= max {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange { value: x, min, max })
    }
}

/// Clamps a numeric `value` into the bounds of the domain.
pub fn truncated_range(value: Value, values: &Values) -> Result<Value, ValidationError> {
    let x = numeric(&value)?;
    if x.is_nan() {
        return Err(not_in_set(&value));
    }
    let (min, max) = values.bounds().ok_or_else(|| not_in_set(&value))?;
    if x >= min && x <= max {
        return Ok(value);
    }
    let clamped = x.max(min).min(max);
    Ok(match value {
        Value::Int(_) if clamped.fract() == 0.0 => Value::Int(clamped as i64),
        _ => Value::Float(clamped),
    })
}

/// Rounds a numeric `value` up to the next member of the domain; values past
/// the largest member become the largest member.
pub fn truncated_discrete_set(value: Value, values: &Values) -> Result<Value, ValidationError> {
    let x = numeric(&value)?;
    if x.is_nan() {
        return Err(not_in_set(&value));
    }
    let mut members: Vec<&'static Value> = values
        .members()
        .into_iter()
        .filter(|m| m.as_f64().is_some())
        .collect();
    members.sort_by(|a, b| {
        a.as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let chosen = members
        .iter()
        .find(|m| m.as_f64().map_or(false, |v| v >= x))
        .or_else(|| members.last())
        .ok_or_else(|| not_in_set(&value))?;
    Ok((*chosen).clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODE_TOKENS: &[(Value, Value)] = &[
        (Value::text("HEAT"), Value::text("HON")),
        (Value::text("COOL"), Value::text("CON")),
    ];
    const MODES: ValueMap = ValueMap::new(MODE_TOKENS);
    const RANGES: &[Value] = &[
        Value::Float(0.1),
        Value::Float(1.0),
        Value::Float(10.0),
        Value::Float(100.0),
    ];

    #[test]
    fn discrete_set_checks_map_keys() {
        let values = Values::Map(MODES);
        assert_eq!(
            strict_discrete_set(Value::from("HEAT"), &values).unwrap(),
            Value::from("HEAT")
        );
        assert_eq!(
            strict_discrete_set(Value::from("BOTH"), &values),
            Err(ValidationError::NotInSet {
                value: "BOTH".to_string()
            })
        );
        // wire tokens are not members
        assert!(strict_discrete_set(Value::from("HON"), &values).is_err());
    }

    #[test]
    fn discrete_set_over_integer_range() {
        let temps = Values::Range(-1.0, 71.0);
        assert!(strict_discrete_set(Value::Int(25), &temps).is_ok());
        assert!(strict_discrete_set(Value::Float(25.5), &temps).is_err());
        assert!(strict_discrete_set(Value::Int(72), &temps).is_err());
    }

    #[test]
    fn strict_range_is_inclusive() {
        let amplitude = Values::Range(0.0, 10.0);
        assert!(strict_range(Value::Float(0.0), &amplitude).is_ok());
        assert!(strict_range(Value::Int(10), &amplitude).is_ok());
        assert_eq!(
            strict_range(Value::Int(12), &amplitude),
            Err(ValidationError::OutOfRange {
                value: 12.0,
                min: 0.0,
                max: 10.0
            })
        );
        assert!(strict_range(Value::Float(f64::NAN), &amplitude).is_err());
        assert!(matches!(
            strict_range(Value::from("5"), &amplitude),
            Err(ValidationError::WrongType { .. })
        ));
    }

    #[test]
    fn truncation() {
        let range = Values::Range(0.0, 1010.0);
        assert_eq!(
            truncated_range(Value::Float(2000.0), &range).unwrap(),
            Value::Float(1010.0)
        );
        assert_eq!(
            truncated_range(Value::Int(-3), &range).unwrap(),
            Value::Int(0)
        );
        let set = Values::Set(RANGES);
        assert_eq!(
            truncated_discrete_set(Value::Float(0.5), &set).unwrap(),
            Value::Float(1.0)
        );
        assert_eq!(
            truncated_discrete_set(Value::Float(1.0), &set).unwrap(),
            Value::Float(1.0)
        );
        assert_eq!(
            truncated_discrete_set(Value::Float(500.0), &set).unwrap(),
            Value::Float(100.0)
        );
    }

    #[test]
    fn value_map_round_trips() {
        assert!(MODES.is_bijective());
        for key in MODES.keys() {
            let token = MODES.forward(key).unwrap();
            assert_eq!(MODES.reverse(token).unwrap(), key);
        }
        assert!(MODES.reverse(&Value::from("HOFF")).is_none());

        const DUPLICATE_TOKENS: &[(Value, Value)] = &[
            (Value::Int(1), Value::text("ON")),
            (Value::Int(2), Value::text("ON")),
        ];
        assert!(!ValueMap::new(DUPLICATE_TOKENS).is_bijective());
    }
}
