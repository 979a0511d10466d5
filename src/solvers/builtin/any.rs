use crate::error::Result;
use crate::graph::AttributeValue;
use crate::solvers::{AttributeSolver, Operator, SolverBase};

/// Passes every vertex of the targeted resource types.
#[derive(Debug)]
pub struct AnyResourceSolver {
    base: SolverBase,
}

pub fn build(
    base: SolverBase,
    _expected: Option<&AttributeValue>,
) -> Result<Box<dyn AttributeSolver>> {
    Ok(Box::new(AnyResourceSolver { base }))
}

impl AttributeSolver for AnyResourceSolver {
    fn operator(&self) -> Operator {
        Operator::Any
    }

    fn base(&self) -> &SolverBase {
        &self.base
    }

    fn get_operation(&self, _value: Option<&AttributeValue>) -> bool {
        true
    }
}
