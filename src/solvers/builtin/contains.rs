use crate::error::Result;
use crate::graph::{AttributeValue, Scalar};
use crate::solvers::{AttributeSolver, Operator, SolverBase};

use super::require_value;

/// Membership in a list, key presence in a mapping, or substring of a string.
#[derive(Debug)]
pub struct ContainsSolver {
    base: SolverBase,
    expected: AttributeValue,
}

pub fn build(
    base: SolverBase,
    expected: Option<&AttributeValue>,
) -> Result<Box<dyn AttributeSolver>> {
    let expected = require_value(Operator::Contains, expected)?.clone();
    Ok(Box::new(ContainsSolver { base, expected }))
}

impl AttributeSolver for ContainsSolver {
    fn operator(&self) -> Operator {
        Operator::Contains
    }

    fn base(&self) -> &SolverBase {
        &self.base
    }

    fn get_operation(&self, value: Option<&AttributeValue>) -> bool {
        let ignore_case = self.base.ignore_case;
        match value {
            None | Some(AttributeValue::Scalar(Scalar::Null)) => false,
            Some(AttributeValue::Sequence(items)) => {
                items.iter().any(|item| item.loose_eq(&self.expected, ignore_case))
            }
            Some(AttributeValue::Mapping(map)) => {
                let key = self.expected.to_text();
                if ignore_case {
                    map.keys().any(|k| k.eq_ignore_ascii_case(&key))
                } else {
                    map.contains_key(&key)
                }
            }
            Some(scalar) => {
                let haystack = scalar.to_text();
                let needle = self.expected.to_text();
                if ignore_case {
                    haystack.to_lowercase().contains(&needle.to_lowercase())
                } else {
                    haystack.contains(&needle)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use serde_json::json;

    #[test]
    fn list_membership_is_type_aware() {
        let v = vertex(json!({"ports": [80, "443"]}));
        assert!(solver("contains", "ports", json!(443)).evaluate(&v));
        assert!(!solver("contains", "ports", json!(22)).evaluate(&v));
        assert!(solver("not_contains", "ports", json!(22)).evaluate(&v));
    }

    #[test]
    fn substring_of_strings() {
        let v = vertex(json!({"policy": "{\"Action\": \"s3:*\"}"}));
        assert!(solver("contains", "policy", json!("s3:*")).evaluate(&v));
        assert!(!solver("contains", "policy", json!("iam:*")).evaluate(&v));
    }

    #[test]
    fn mapping_keys() {
        let v = vertex(json!({"tags": {"Owner": "team-a"}}));
        assert!(solver("contains", "tags", json!("Owner")).evaluate(&v));
        assert!(!solver("contains", "tags", json!("team-a")).evaluate(&v));
    }

    #[test]
    fn absence_fails_contains() {
        assert!(!solver("contains", "ports", json!(80)).evaluate(&empty()));
        assert!(solver("not_contains", "ports", json!(80)).evaluate(&empty()));
    }
}
