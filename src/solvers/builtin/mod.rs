//! Built-in attribute solvers, one module per operator family.

pub mod affix;
pub mod any;
pub mod comparison;
pub mod contains;
pub mod emptiness;
pub mod equals;
pub mod exists;
pub mod length;
pub mod regex_match;
pub mod subset;
pub mod truthiness;
pub mod within;

use crate::error::Result;
use crate::graph::AttributeValue;

use super::registry::invalid_value;
use super::Operator;

pub(crate) fn require_value(
    operator: Operator,
    expected: Option<&AttributeValue>,
) -> Result<&AttributeValue> {
    expected.ok_or_else(|| invalid_value(operator, "an expected value is required"))
}

pub(crate) fn require_number(operator: Operator, expected: Option<&AttributeValue>) -> Result<f64> {
    let value = require_value(operator, expected)?;
    value
        .as_number()
        .ok_or_else(|| invalid_value(operator, format!("expected a number, got '{value}'")))
}

pub(crate) fn require_sequence(
    operator: Operator,
    expected: Option<&AttributeValue>,
) -> Result<Vec<AttributeValue>> {
    match require_value(operator, expected)? {
        AttributeValue::Sequence(items) => Ok(items.clone()),
        other => Err(invalid_value(
            operator,
            format!("expected a list, got '{other}'"),
        )),
    }
}

/// Scalar text operand; containers are rejected.
pub(crate) fn require_text(
    operator: Operator,
    expected: Option<&AttributeValue>,
) -> Result<String> {
    let value = require_value(operator, expected)?;
    match value {
        AttributeValue::Scalar(_) => Ok(value.to_text()),
        other => Err(invalid_value(
            operator,
            format!("expected a string, got '{other}'"),
        )),
    }
}
