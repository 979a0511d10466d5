use crate::error::Result;
use crate::graph::AttributeValue;
use crate::solvers::{AttributeSolver, Operator, SolverBase};

/// Passes for absence, null, `""`, `[]` and `{}`.
#[derive(Debug)]
pub struct IsEmptySolver {
    base: SolverBase,
}

pub fn build(
    base: SolverBase,
    _expected: Option<&AttributeValue>,
) -> Result<Box<dyn AttributeSolver>> {
    Ok(Box::new(IsEmptySolver { base }))
}

impl AttributeSolver for IsEmptySolver {
    fn operator(&self) -> Operator {
        Operator::IsEmpty
    }

    fn base(&self) -> &SolverBase {
        &self.base
    }

    fn get_operation(&self, value: Option<&AttributeValue>) -> bool {
        value.map_or(true, AttributeValue::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use serde_json::json;

    #[test]
    fn empty_shapes() {
        let v = vertex(json!({"s": "", "l": [], "m": {}, "n": null, "zero": 0, "f": false}));
        for path in ["s", "l", "m", "n", "absent"] {
            assert!(solver("is_empty", path, json!(null)).evaluate(&v), "{path}");
            assert!(!solver("is_not_empty", path, json!(null)).evaluate(&v), "{path}");
        }
        for path in ["zero", "f"] {
            assert!(!solver("is_empty", path, json!(null)).evaluate(&v), "{path}");
        }
    }

    #[test]
    fn populated_values_are_not_empty() {
        let v = vertex(json!({"tags": {"env": "prod"}, "name": "x"}));
        assert!(solver("is_not_empty", "tags", json!(null)).evaluate(&v));
        assert!(solver("is_not_empty", "name", json!(null)).evaluate(&v));
    }
}
