use crate::error::Result;
use crate::graph::AttributeValue;
use crate::solvers::{AttributeSolver, Operator, SolverBase};

/// Passes when the value reads as the expected boolean. Values outside the
/// boolean vocabulary pass neither `is_true` nor `is_false`.
#[derive(Debug)]
pub struct TruthinessSolver {
    base: SolverBase,
    expected: bool,
}

pub fn build_is_true(
    base: SolverBase,
    _expected: Option<&AttributeValue>,
) -> Result<Box<dyn AttributeSolver>> {
    Ok(Box::new(TruthinessSolver { base, expected: true }))
}

pub fn build_is_false(
    base: SolverBase,
    _expected: Option<&AttributeValue>,
) -> Result<Box<dyn AttributeSolver>> {
    Ok(Box::new(TruthinessSolver { base, expected: false }))
}

impl AttributeSolver for TruthinessSolver {
    fn operator(&self) -> Operator {
        if self.expected {
            Operator::IsTrue
        } else {
            Operator::IsFalse
        }
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
            .any(|v| v.as_bool() == Some(self.expected))
    }
}
