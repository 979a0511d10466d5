use crate::error::Result;
use crate::graph::AttributeValue;
use crate::solvers::{AttributeSolver, Operator, SolverBase};

use super::require_sequence;

/// Passes when the value is one of the allowed values. A list value passes
/// when every element is allowed, so an empty list always passes.
#[derive(Debug)]
pub struct WithinSolver {
    base: SolverBase,
    allowed: Vec<AttributeValue>,
}

pub fn build(
    base: SolverBase,
    expected: Option<&AttributeValue>,
) -> Result<Box<dyn AttributeSolver>> {
    let allowed = require_sequence(Operator::Within, expected)?;
    Ok(Box::new(WithinSolver { base, allowed }))
}

impl WithinSolver {
    fn is_allowed(&self, value: &AttributeValue) -> bool {
        self.allowed
            .iter()
            .any(|a| value.loose_eq(a, self.base.ignore_case))
    }
}

impl AttributeSolver for WithinSolver {
    fn operator(&self) -> Operator {
        Operator::Within
    }

    fn base(&self) -> &SolverBase {
        &self.base
    }

    fn get_operation(&self, value: Option<&AttributeValue>) -> bool {
        match value {
            None => false,
            Some(AttributeValue::Sequence(items)) => items.iter().all(|i| self.is_allowed(i)),
            Some(v) => self.is_allowed(v),
        }
    }
}
