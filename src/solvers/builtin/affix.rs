use crate::error::Result;
use crate::graph::AttributeValue;
use crate::solvers::{AttributeSolver, Operator, SolverBase};

use super::require_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affix {
    Prefix,
    Suffix,
}

/// Prefix or suffix test on the stringified value. Case-sensitive unless the
/// rule sets `ignore_case`.
#[derive(Debug)]
pub struct AffixSolver {
    base: SolverBase,
    affix: Affix,
    text: String,
}

fn build(
    base: SolverBase,
    expected: Option<&AttributeValue>,
    affix: Affix,
) -> Result<Box<dyn AttributeSolver>> {
    let operator = match affix {
        Affix::Prefix => Operator::StartingWith,
        Affix::Suffix => Operator::EndingWith,
    };
    let mut text = require_text(operator, expected)?;
    if base.ignore_case {
        text = text.to_lowercase();
    }
    Ok(Box::new(AffixSolver { base, affix, text }))
}

pub fn build_starting_with(
    base: SolverBase,
    expected: Option<&AttributeValue>,
) -> Result<Box<dyn AttributeSolver>> {
    build(base, expected, Affix::Prefix)
}

pub fn build_ending_with(
    base: SolverBase,
    expected: Option<&AttributeValue>,
) -> Result<Box<dyn AttributeSolver>> {
    build(base, expected, Affix::Suffix)
}

impl AffixSolver {
    fn test(&self, candidate: &str) -> bool {
        let candidate = if self.base.ignore_case {
            candidate.to_lowercase()
        } else {
            candidate.to_string()
        };
        match self.affix {
            Affix::Prefix => candidate.starts_with(&self.text),
            Affix::Suffix => candidate.ends_with(&self.text),
        }
    }
}

impl AttributeSolver for AffixSolver {
    fn operator(&self) -> Operator {
        match self.affix {
            Affix::Prefix => Operator::StartingWith,
            Affix::Suffix => Operator::EndingWith,
        }
    }

    fn base(&self) -> &SolverBase {
        &self.base
    }

    fn get_operation(&self, value: Option<&AttributeValue>) -> bool {
        let Some(value) = value else {
            return false;
        };
        value.elements().into_iter().any(|v| self.test(&v.to_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use crate::solvers::{compile, RuleDefinition};
    use serde_json::json;

    #[test]
    fn prefix_is_case_sensitive_by_default() {
        let v = vertex(json!({"role": "Admin"}));
        assert!(!solver("starting_with", "role", json!("adm")).evaluate(&v));
        assert!(solver("starting_with", "role", json!("Adm")).evaluate(&v));
        assert!(solver("not_starting_with", "role", json!("adm")).evaluate(&v));
    }

    #[test]
    fn ignore_case_when_requested() {
        let mut def = RuleDefinition::new("starting_with", "role", json!("adm"));
        def.ignore_case = true;
        assert!(compile(&def).unwrap().evaluate(&vertex(json!({"role": "Admin"}))));
    }

    #[test]
    fn suffix_on_stringified_values() {
        let v = vertex(json!({"arn": "arn:aws:s3:::logs/*", "port": 8080}));
        assert!(solver("ending_with", "arn", json!("/*")).evaluate(&v));
        assert!(solver("ending_with", "port", json!("80")).evaluate(&v));
        assert!(solver("not_ending_with", "arn", json!("logs")).evaluate(&v));
    }

    #[test]
    fn absence_fails_positive_forms() {
        assert!(!solver("starting_with", "x", json!("")).evaluate(&empty()));
        assert!(!solver("ending_with", "x", json!("")).evaluate(&empty()));
        assert!(solver("not_ending_with", "x", json!("a")).evaluate(&empty()));
    }

    #[test]
    fn container_operand_is_rejected() {
        assert!(compile(&RuleDefinition::new("starting_with", "x", json!(["a"]))).is_err());
    }
}
