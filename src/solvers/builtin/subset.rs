use crate::error::Result;
use crate::graph::AttributeValue;
use crate::solvers::{AttributeSolver, Operator, SolverBase};

use super::require_sequence;

/// Passes when every expected element is present in the value.
///
/// A scalar value is treated as a one-element list. An empty expected list
/// is a subset of anything, absence included.
#[derive(Debug)]
pub struct SubsetSolver {
    base: SolverBase,
    required: Vec<AttributeValue>,
}

pub fn build(
    base: SolverBase,
    expected: Option<&AttributeValue>,
) -> Result<Box<dyn AttributeSolver>> {
    let required = require_sequence(Operator::Subset, expected)?;
    Ok(Box::new(SubsetSolver { base, required }))
}

impl AttributeSolver for SubsetSolver {
    fn operator(&self) -> Operator {
        Operator::Subset
    }

    fn base(&self) -> &SolverBase {
        &self.base
    }

    fn get_operation(&self, value: Option<&AttributeValue>) -> bool {
        let present = value.map(AttributeValue::elements).unwrap_or_default();
        self.required.iter().all(|wanted| {
            present
                .iter()
                .any(|have| have.loose_eq(wanted, self.base.ignore_case))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use crate::solvers::{compile, RuleDefinition};
    use serde_json::json;

    #[test]
    fn empty_expected_is_vacuous() {
        let s = solver("subset", "actions", json!([]));
        assert!(s.evaluate(&empty()));
        assert!(s.evaluate(&vertex(json!({"actions": ["s3:GetObject"]}))));
        assert!(s.evaluate(&vertex(json!({"actions": "x"}))));
    }

    #[test]
    fn all_expected_elements_required() {
        let v = vertex(json!({"protocols": ["TLSv1.2", "TLSv1.3", "SSLv3"]}));
        assert!(solver("subset", "protocols", json!(["TLSv1.2", "TLSv1.3"])).evaluate(&v));
        assert!(!solver("subset", "protocols", json!(["TLSv1.2", "TLSv1.1"])).evaluate(&v));
        assert!(solver("not_subset", "protocols", json!(["TLSv1.1"])).evaluate(&v));
    }

    #[test]
    fn gathers_wildcard_matches_into_one_collection() {
        let v = vertex(json!({"statements": [{"effect": "Allow"}, {"effect": "Deny"}]}));
        assert!(solver("subset", "statements.*.effect", json!(["Allow", "Deny"])).evaluate(&v));
    }

    #[test]
    fn absence_with_required_elements_fails() {
        assert!(!solver("subset", "x", json!([1])).evaluate(&empty()));
    }

    #[test]
    fn scalar_expected_is_a_compile_error() {
        assert!(compile(&RuleDefinition::new("subset", "x", json!("a"))).is_err());
    }
}
