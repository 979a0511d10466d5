//! Attribute values stored on resource vertices.
//!
//! Values form a closed sum type: a scalar, an ordered sequence, or a nested
//! mapping. Absence is never a value; solvers see it as `None`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A leaf attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

/// A value in a vertex's attribute tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum AttributeValue {
    Scalar(Scalar),
    Sequence(Vec<AttributeValue>),
    Mapping(BTreeMap<String, AttributeValue>),
}

impl AttributeValue {
    pub fn null() -> Self {
        Self::Scalar(Scalar::Null)
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::Scalar(Scalar::String(s.into()))
    }

    pub fn number(n: f64) -> Self {
        Self::Scalar(Scalar::Number(n))
    }

    pub fn bool(b: bool) -> Self {
        Self::Scalar(Scalar::Bool(b))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(Scalar::Null))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[AttributeValue]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Numeric view: numbers, and strings that parse as a float.
    /// Booleans are not numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Scalar(Scalar::Number(n)) => Some(*n),
            Self::Scalar(Scalar::String(s)) => s.trim().parse::<f64>().ok().filter(|n| !n.is_nan()),
            _ => None,
        }
    }

    /// Boolean view over the fixed vocabulary: boolean literals and the
    /// strings "true"/"false" in any ASCII case.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Scalar(Scalar::Bool(b)) => Some(*b),
            Self::Scalar(Scalar::String(s)) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case("true") {
                    Some(true)
                } else if s.eq_ignore_ascii_case("false") {
                    Some(false)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Length of measurable values. Numbers and booleans have none.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Scalar(Scalar::Null) => Some(0),
            Self::Scalar(Scalar::String(s)) => Some(s.chars().count()),
            Self::Sequence(items) => Some(items.len()),
            Self::Mapping(map) => Some(map.len()),
            Self::Scalar(_) => None,
        }
    }

    /// Null, an empty string, or an empty sequence/mapping.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Scalar(Scalar::Null) => true,
            Self::Scalar(Scalar::String(s)) => s.is_empty(),
            Self::Sequence(items) => items.is_empty(),
            Self::Mapping(map) => map.is_empty(),
            Self::Scalar(_) => false,
        }
    }

    /// Stringified form used by text operators.
    pub fn to_text(&self) -> String {
        match self {
            Self::Scalar(Scalar::Null) => String::new(),
            Self::Scalar(Scalar::Bool(b)) => b.to_string(),
            Self::Scalar(Scalar::Number(n)) => format_number(*n),
            Self::Scalar(Scalar::String(s)) => s.clone(),
            Self::Sequence(_) | Self::Mapping(_) => {
                serde_json::Value::from(self.clone()).to_string()
            }
        }
    }

    /// Type-aware equality.
    ///
    /// Numeric-looking values compare as numbers, a boolean compares with a
    /// recognized boolean string, containers compare structurally.
    pub fn loose_eq(&self, other: &AttributeValue, ignore_case: bool) -> bool {
        match (self, other) {
            (Self::Sequence(a), Self::Sequence(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y, ignore_case))
            }
            (Self::Mapping(a), Self::Mapping(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(k, v)| {
                        b.get(k).is_some_and(|other| v.loose_eq(other, ignore_case))
                    })
            }
            (Self::Sequence(_) | Self::Mapping(_), _)
            | (_, Self::Sequence(_) | Self::Mapping(_)) => false,
            (Self::Scalar(Scalar::Null), Self::Scalar(Scalar::Null)) => true,
            (Self::Scalar(Scalar::Null), _) | (_, Self::Scalar(Scalar::Null)) => false,
            (Self::Scalar(Scalar::Bool(_)), _) | (_, Self::Scalar(Scalar::Bool(_))) => {
                match (self.as_bool(), other.as_bool()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
            _ => {
                if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
                    return a == b;
                }
                text_eq(&self.to_text(), &other.to_text(), ignore_case)
            }
        }
    }

    /// Elements of a sequence, or the value itself for anything else.
    pub fn elements(&self) -> Vec<&AttributeValue> {
        match self {
            Self::Sequence(items) => items.iter().collect(),
            other => vec![other],
        }
    }
}

pub(crate) fn text_eq(a: &str, b: &str, ignore_case: bool) -> bool {
    if ignore_case {
        a.to_lowercase() == b.to_lowercase()
    } else {
        a == b
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl From<serde_json::Value> for AttributeValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Scalar(Scalar::Null),
            serde_json::Value::Bool(b) => Self::Scalar(Scalar::Bool(b)),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(|n| Self::Scalar(Scalar::Number(n)))
                .unwrap_or(Self::Scalar(Scalar::Null)),
            serde_json::Value::String(s) => Self::Scalar(Scalar::String(s)),
            serde_json::Value::Array(items) => {
                Self::Sequence(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Mapping(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<AttributeValue> for serde_json::Value {
    fn from(value: AttributeValue) -> Self {
        match value {
            AttributeValue::Scalar(Scalar::Null) => serde_json::Value::Null,
            AttributeValue::Scalar(Scalar::Bool(b)) => serde_json::Value::Bool(b),
            AttributeValue::Scalar(Scalar::Number(n)) => {
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    serde_json::Value::from(n as i64)
                } else {
                    serde_json::Number::from_f64(n)
                        .map(serde_json::Value::Number)
                        .unwrap_or(serde_json::Value::Null)
                }
            }
            AttributeValue::Scalar(Scalar::String(s)) => serde_json::Value::String(s),
            AttributeValue::Sequence(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            AttributeValue::Mapping(map) => serde_json::Value::Object(
                map.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
        }
    }
}
