use regex::{Regex, RegexBuilder};

use crate::error::{CheckError, Result};
use crate::graph::AttributeValue;
use crate::solvers::{AttributeSolver, Operator, SolverBase};

use super::require_text;

/// Regex match against the stringified value.
///
/// Matching is anchored at the start of the value but not at the end; a
/// pattern must supply its own `$` to require a full match.
#[derive(Debug)]
pub struct RegexMatchSolver {
    base: SolverBase,
    pattern: Regex,
}

pub fn build(
    base: SolverBase,
    expected: Option<&AttributeValue>,
) -> Result<Box<dyn AttributeSolver>> {
    let raw = require_text(Operator::RegexMatch, expected)?;
    let pattern = RegexBuilder::new(&format!(r"\A(?:{raw})"))
        .case_insensitive(base.ignore_case)
        .build()
        .map_err(|e| CheckError::InvalidPattern {
            pattern: raw.clone(),
            message: e.to_string(),
        })?;
    Ok(Box::new(RegexMatchSolver { base, pattern }))
}

impl AttributeSolver for RegexMatchSolver {
    fn operator(&self) -> Operator {
        Operator::RegexMatch
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
            .any(|v| self.pattern.is_match(&v.to_text()))
    }
}
