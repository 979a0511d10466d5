use crate::error::Result;
use crate::graph::AttributeValue;
use crate::solvers::{AttributeSolver, Operator, SolverBase};

/// Passes when the attribute path resolves to at least one location.
#[derive(Debug)]
pub struct ExistsSolver {
    base: SolverBase,
}

pub fn build(
    base: SolverBase,
    _expected: Option<&AttributeValue>,
) -> Result<Box<dyn AttributeSolver>> {
    Ok(Box::new(ExistsSolver { base }))
}

impl AttributeSolver for ExistsSolver {
    fn operator(&self) -> Operator {
        Operator::Exists
    }

    fn base(&self) -> &SolverBase {
        &self.base
    }

    fn get_operation(&self, value: Option<&AttributeValue>) -> bool {
        value.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use serde_json::json;

    #[test]
    fn absent_key_fails_exists_and_passes_not_exists() {
        let v = vertex(json!({"tags": {"env": "prod"}}));
        assert!(!solver("exists", "name", json!(null)).evaluate(&v));
        assert!(solver("not_exists", "name", json!(null)).evaluate(&v));
    }

    #[test]
    fn null_valued_key_exists() {
        let v = vertex(json!({"name": null}));
        assert!(solver("exists", "name", json!(null)).evaluate(&v));
    }

    #[test]
    fn nested_and_wildcard_paths() {
        let v = vertex(json!({"ingress": [{"cidr": "0.0.0.0/0"}, {}]}));
        assert!(solver("exists", "ingress.*.cidr", json!(null)).evaluate(&v));
        assert!(!solver("exists", "ingress.*.port", json!(null)).evaluate(&v));
        assert!(solver("not_exists", "ingress[1].cidr", json!(null)).evaluate(&v));
    }

    #[test]
    fn malformed_path_is_absence() {
        let v = vertex(json!({"a": 1}));
        assert!(!solver("exists", "a..", json!(null)).evaluate(&v));
        assert!(solver("not_exists", "a..", json!(null)).evaluate(&v));
    }
}
