use crate::error::Result;
use crate::graph::AttributeValue;
use crate::solvers::{AttributeSolver, Operator, SolverBase};

use super::require_value;

/// Type-aware equality against the expected value.
#[derive(Debug)]
pub struct EqualsSolver {
    base: SolverBase,
    expected: AttributeValue,
}

pub fn build(
    base: SolverBase,
    expected: Option<&AttributeValue>,
) -> Result<Box<dyn AttributeSolver>> {
    let expected = require_value(Operator::Equals, expected)?.clone();
    Ok(Box::new(EqualsSolver { base, expected }))
}

impl AttributeSolver for EqualsSolver {
    fn operator(&self) -> Operator {
        Operator::Equals
    }

    fn base(&self) -> &SolverBase {
        &self.base
    }

    fn get_operation(&self, value: Option<&AttributeValue>) -> bool {
        value.is_some_and(|v| v.loose_eq(&self.expected, self.base.ignore_case))
    }
}
