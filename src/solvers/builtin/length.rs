use crate::error::Result;
use crate::graph::AttributeValue;
use crate::solvers::registry::invalid_value;
use crate::solvers::{AttributeSolver, Operator, SolverBase};

use super::require_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthComparison {
    Equals,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl LengthComparison {
    fn operator(self) -> Operator {
        match self {
            Self::Equals => Operator::LengthEquals,
            Self::GreaterThan => Operator::LengthGreaterThan,
            Self::GreaterThanOrEqual => Operator::LengthGreaterThanOrEqual,
            Self::LessThan => Operator::LengthLessThan,
            Self::LessThanOrEqual => Operator::LengthLessThanOrEqual,
        }
    }

    fn holds(self, len: usize, expected: usize) -> bool {
        match self {
            Self::Equals => len == expected,
            Self::GreaterThan => len > expected,
            Self::GreaterThanOrEqual => len >= expected,
            Self::LessThan => len < expected,
            Self::LessThanOrEqual => len <= expected,
        }
    }
}

/// Compares the length of a string, list or mapping. Absence has length 0;
/// numbers and booleans have no length and fail.
#[derive(Debug)]
pub struct LengthSolver {
    base: SolverBase,
    comparison: LengthComparison,
    expected: usize,
}

fn build(
    base: SolverBase,
    expected: Option<&AttributeValue>,
    comparison: LengthComparison,
) -> Result<Box<dyn AttributeSolver>> {
    let operator = comparison.operator();
    let n = require_number(operator, expected)?;
    if n < 0.0 || n.fract() != 0.0 || !n.is_finite() {
        return Err(invalid_value(operator, format!("expected a non-negative integer, got {n}")));
    }
    Ok(Box::new(LengthSolver {
        base,
        comparison,
        expected: n as usize,
    }))
}

pub fn build_equals(
    base: SolverBase,
    expected: Option<&AttributeValue>,
) -> Result<Box<dyn AttributeSolver>> {
    build(base, expected, LengthComparison::Equals)
}

pub fn build_greater_than(
    base: SolverBase,
    expected: Option<&AttributeValue>,
) -> Result<Box<dyn AttributeSolver>> {
    build(base, expected, LengthComparison::GreaterThan)
}

pub fn build_greater_than_or_equal(
    base: SolverBase,
    expected: Option<&AttributeValue>,
) -> Result<Box<dyn AttributeSolver>> {
    build(base, expected, LengthComparison::GreaterThanOrEqual)
}

pub fn build_less_than(
    base: SolverBase,
    expected: Option<&AttributeValue>,
) -> Result<Box<dyn AttributeSolver>> {
    build(base, expected, LengthComparison::LessThan)
}

pub fn build_less_than_or_equal(
    base: SolverBase,
    expected: Option<&AttributeValue>,
) -> Result<Box<dyn AttributeSolver>> {
    build(base, expected, LengthComparison::LessThanOrEqual)
}

impl AttributeSolver for LengthSolver {
    fn operator(&self) -> Operator {
        self.comparison.operator()
    }

    fn base(&self) -> &SolverBase {
        &self.base
    }

    fn get_operation(&self, value: Option<&AttributeValue>) -> bool {
        let len = match value {
            None => 0,
            Some(v) => match v.len() {
                Some(len) => len,
                None => return false,
            },
        };
        self.comparison.holds(len, self.expected)
    }
}
