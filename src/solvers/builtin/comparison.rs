use crate::error::Result;
use crate::graph::AttributeValue;
use crate::solvers::{AttributeSolver, Operator, SolverBase};

use super::require_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl Ordering {
    fn operator(self) -> Operator {
        match self {
            Self::GreaterThan => Operator::GreaterThan,
            Self::GreaterThanOrEqual => Operator::GreaterThanOrEqual,
            Self::LessThan => Operator::LessThan,
            Self::LessThanOrEqual => Operator::LessThanOrEqual,
        }
    }

    fn holds(self, value: f64, limit: f64) -> bool {
        match self {
            Self::GreaterThan => value > limit,
            Self::GreaterThanOrEqual => value >= limit,
            Self::LessThan => value < limit,
            Self::LessThanOrEqual => value <= limit,
        }
    }
}

/// Numeric ordering against a fixed limit.
///
/// Non-numeric values fail. A list value passes if any numeric element does.
#[derive(Debug)]
pub struct ComparisonSolver {
    base: SolverBase,
    ordering: Ordering,
    limit: f64,
}

fn build(
    base: SolverBase,
    expected: Option<&AttributeValue>,
    ordering: Ordering,
) -> Result<Box<dyn AttributeSolver>> {
    let limit = require_number(ordering.operator(), expected)?;
    Ok(Box::new(ComparisonSolver {
        base,
        ordering,
        limit,
    }))
}

pub fn build_greater_than(
    base: SolverBase,
    expected: Option<&AttributeValue>,
) -> Result<Box<dyn AttributeSolver>> {
    build(base, expected, Ordering::GreaterThan)
}

pub fn build_greater_than_or_equal(
    base: SolverBase,
    expected: Option<&AttributeValue>,
) -> Result<Box<dyn AttributeSolver>> {
    build(base, expected, Ordering::GreaterThanOrEqual)
}

pub fn build_less_than(
    base: SolverBase,
    expected: Option<&AttributeValue>,
) -> Result<Box<dyn AttributeSolver>> {
    build(base, expected, Ordering::LessThan)
}

pub fn build_less_than_or_equal(
    base: SolverBase,
    expected: Option<&AttributeValue>,
) -> Result<Box<dyn AttributeSolver>> {
    build(base, expected, Ordering::LessThanOrEqual)
}

impl AttributeSolver for ComparisonSolver {
    fn operator(&self) -> Operator {
        self.ordering.operator()
    }

    fn base(&self) -> &SolverBase {
        &self.base
    }

    fn get_operation(&self, value: Option<&AttributeValue>) -> bool {
        let Some(value) = value else {
            return false;
        };
        value
            .elements()
            .into_iter()
            .filter_map(AttributeValue::as_number)
            .any(|n| self.ordering.holds(n, self.limit))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use crate::error::CheckError;
    use crate::solvers::{compile, RuleDefinition};
    use serde_json::json;

    #[test]
    fn any_port_above_limit_passes() {
        let v = vertex(json!({"ports": [80, 443, 8080]}));
        assert!(solver("greater_than", "ports", json!(100)).evaluate(&v));
        assert!(!solver("greater_than", "ports", json!(9000)).evaluate(&v));
        assert!(solver("less_than", "ports.*", json!(81)).evaluate(&v));
    }

    #[test]
    fn boundaries() {
        let v = vertex(json!({"retention": 30}));
        assert!(solver("greater_than_or_equal", "retention", json!(30)).evaluate(&v));
        assert!(!solver("greater_than", "retention", json!(30)).evaluate(&v));
        assert!(solver("less_than_or_equal", "retention", json!("30")).evaluate(&v));
        assert!(!solver("less_than", "retention", json!(30)).evaluate(&v));
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let v = vertex(json!({"timeout": " 90 "}));
        assert!(solver("greater_than", "timeout", json!(60)).evaluate(&v));
    }

    #[test]
    fn non_numeric_and_absent_fail() {
        let v = vertex(json!({"name": "web", "on": true}));
        for op in ["greater_than", "greater_than_or_equal", "less_than", "less_than_or_equal"] {
            assert!(!solver(op, "name", json!(0)).evaluate(&v), "{op} on a string");
            assert!(!solver(op, "on", json!(0)).evaluate(&v), "{op} on a bool");
            assert!(!solver(op, "missing", json!(0)).evaluate(&v), "{op} on absence");
        }
    }

    #[test]
    fn non_numeric_limit_is_a_compile_error() {
        let err = compile(&RuleDefinition::new("greater_than", "x", json!("lots"))).unwrap_err();
        assert!(matches!(err, CheckError::InvalidValue { .. }));
    }
}
