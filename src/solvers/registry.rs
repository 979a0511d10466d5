//! Static operator registry.
//!
//! Every supported operator identifier has exactly one descriptor in
//! [`DESCRIPTORS`]. Negated operators are declared as negations of their
//! positive counterpart and are built by wrapping it in [`Negate`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::builtin::{
    affix, any, comparison, contains, emptiness, equals, exists, length, regex_match, subset,
    truthiness, within,
};
use super::definition::{ConditionType, RuleDefinition};
use super::negate::Negate;
use super::{Aggregation, AttributeSolver, Solver, SolverBase};
use crate::error::{CheckError, Result};
use crate::graph::{AttributePath, AttributeValue};

/// Per-operator aggregation overrides, keyed by operator.
pub type AggregationOverrides = BTreeMap<Operator, Aggregation>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Any,
    Exists,
    NotExists,
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    RegexMatch,
    NotRegexMatch,
    StartingWith,
    NotStartingWith,
    EndingWith,
    NotEndingWith,
    Contains,
    NotContains,
    Within,
    Subset,
    NotSubset,
    IsEmpty,
    IsNotEmpty,
    LengthEquals,
    LengthNotEquals,
    LengthGreaterThan,
    LengthGreaterThanOrEqual,
    LengthLessThan,
    LengthLessThanOrEqual,
    IsTrue,
    IsFalse,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Exists => "exists",
            Self::NotExists => "not_exists",
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::GreaterThan => "greater_than",
            Self::GreaterThanOrEqual => "greater_than_or_equal",
            Self::LessThan => "less_than",
            Self::LessThanOrEqual => "less_than_or_equal",
            Self::RegexMatch => "regex_match",
            Self::NotRegexMatch => "not_regex_match",
            Self::StartingWith => "starting_with",
            Self::NotStartingWith => "not_starting_with",
            Self::EndingWith => "ending_with",
            Self::NotEndingWith => "not_ending_with",
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
            Self::Within => "within",
            Self::Subset => "subset",
            Self::NotSubset => "not_subset",
            Self::IsEmpty => "is_empty",
            Self::IsNotEmpty => "is_not_empty",
            Self::LengthEquals => "length_equals",
            Self::LengthNotEquals => "length_not_equals",
            Self::LengthGreaterThan => "length_greater_than",
            Self::LengthGreaterThanOrEqual => "length_greater_than_or_equal",
            Self::LengthLessThan => "length_less_than",
            Self::LengthLessThanOrEqual => "length_less_than_or_equal",
            Self::IsTrue => "is_true",
            Self::IsFalse => "is_false",
        }
    }

    pub fn descriptor(&self) -> &'static OperatorDescriptor {
        // Every variant has an entry; checked by `registry_is_exhaustive`.
        INDEX
            .get(self.as_str())
            .copied()
            .unwrap_or(&DESCRIPTORS[0])
    }

    /// The positive operator this one negates, if any.
    pub fn negates(&self) -> Option<Operator> {
        match self.descriptor().construction {
            Construction::Negate(positive) => Some(positive),
            Construction::Build(_) => None,
        }
    }

    /// Operators without an attribute path or expected value.
    pub fn is_unary(&self) -> bool {
        matches!(
            self,
            Self::Any
                | Self::Exists
                | Self::NotExists
                | Self::IsEmpty
                | Self::IsNotEmpty
                | Self::IsTrue
                | Self::IsFalse
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Operator {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self> {
        INDEX
            .get(s.trim())
            .map(|d| d.operator)
            .ok_or_else(|| CheckError::UnknownOperator(s.to_string()))
    }
}

type BuildFn = fn(SolverBase, Option<&AttributeValue>) -> Result<Box<dyn AttributeSolver>>;

#[derive(Clone, Copy)]
pub enum Construction {
    Build(BuildFn),
    Negate(Operator),
}

/// Static description of one operator.
pub struct OperatorDescriptor {
    pub operator: Operator,
    /// How multiple resolved matches combine, unless overridden.
    pub aggregation: Aggregation,
    pub construction: Construction,
}

impl fmt::Debug for OperatorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorDescriptor")
            .field("operator", &self.operator)
            .field("aggregation", &self.aggregation)
            .field("negates", &self.operator.negates())
            .finish()
    }
}

const fn build(operator: Operator, aggregation: Aggregation, f: BuildFn) -> OperatorDescriptor {
    OperatorDescriptor {
        operator,
        aggregation,
        construction: Construction::Build(f),
    }
}

const fn negate(
    operator: Operator,
    aggregation: Aggregation,
    positive: Operator,
) -> OperatorDescriptor {
    OperatorDescriptor {
        operator,
        aggregation,
        construction: Construction::Negate(positive),
    }
}

pub static DESCRIPTORS: [OperatorDescriptor; 30] = [
    build(Operator::Any, Aggregation::Any, any::build),
    build(Operator::Exists, Aggregation::Any, exists::build),
    negate(Operator::NotExists, Aggregation::Any, Operator::Exists),
    build(Operator::Equals, Aggregation::Any, equals::build),
    negate(Operator::NotEquals, Aggregation::Any, Operator::Equals),
    build(Operator::GreaterThan, Aggregation::Any, comparison::build_greater_than),
    build(Operator::GreaterThanOrEqual, Aggregation::Any, comparison::build_greater_than_or_equal),
    build(Operator::LessThan, Aggregation::Any, comparison::build_less_than),
    build(Operator::LessThanOrEqual, Aggregation::Any, comparison::build_less_than_or_equal),
    build(Operator::RegexMatch, Aggregation::Any, regex_match::build),
    negate(Operator::NotRegexMatch, Aggregation::Any, Operator::RegexMatch),
    build(Operator::StartingWith, Aggregation::Any, affix::build_starting_with),
    negate(Operator::NotStartingWith, Aggregation::Any, Operator::StartingWith),
    build(Operator::EndingWith, Aggregation::Any, affix::build_ending_with),
    negate(Operator::NotEndingWith, Aggregation::Any, Operator::EndingWith),
    build(Operator::Contains, Aggregation::Any, contains::build),
    negate(Operator::NotContains, Aggregation::Any, Operator::Contains),
    build(Operator::Within, Aggregation::Any, within::build),
    build(Operator::Subset, Aggregation::Collection, subset::build),
    negate(Operator::NotSubset, Aggregation::Collection, Operator::Subset),
    build(Operator::IsEmpty, Aggregation::Any, emptiness::build),
    negate(Operator::IsNotEmpty, Aggregation::Any, Operator::IsEmpty),
    build(Operator::LengthEquals, Aggregation::Collection, length::build_equals),
    negate(Operator::LengthNotEquals, Aggregation::Collection, Operator::LengthEquals),
    build(Operator::LengthGreaterThan, Aggregation::Collection, length::build_greater_than),
    build(
        Operator::LengthGreaterThanOrEqual,
        Aggregation::Collection,
        length::build_greater_than_or_equal,
    ),
    build(Operator::LengthLessThan, Aggregation::Collection, length::build_less_than),
    build(
        Operator::LengthLessThanOrEqual,
        Aggregation::Collection,
        length::build_less_than_or_equal,
    ),
    build(Operator::IsTrue, Aggregation::Any, truthiness::build_is_true),
    build(Operator::IsFalse, Aggregation::Any, truthiness::build_is_false),
];

static INDEX: Lazy<HashMap<&'static str, &'static OperatorDescriptor>> = Lazy::new(|| {
    DESCRIPTORS
        .iter()
        .map(|d| (d.operator.as_str(), d))
        .collect()
});

/// All registered operators, in registry order.
pub fn operators() -> impl Iterator<Item = Operator> {
    DESCRIPTORS.iter().map(|d| d.operator)
}

/// Compile a rule definition using each operator's default aggregation.
pub fn compile(rule: &RuleDefinition) -> Result<Solver> {
    compile_with(rule, &AggregationOverrides::new())
}

/// Compile a rule definition into a reusable solver.
///
/// Aggregation precedence: the rule's own field, then `overrides`, then the
/// operator default. All shape errors surface here, never at evaluation.
pub fn compile_with(rule: &RuleDefinition, overrides: &AggregationOverrides) -> Result<Solver> {
    if rule.cond_type != ConditionType::Attribute {
        return Err(CheckError::UnsupportedCondition(
            rule.cond_type.as_str().to_string(),
        ));
    }

    let operator: Operator = rule.operator.parse()?;
    let descriptor = operator.descriptor();

    let attribute = match rule.attribute.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(AttributePath::parse(raw)),
        _ if operator == Operator::Any => None,
        _ => return Err(CheckError::MissingAttribute(operator.to_string())),
    };

    if operator.is_unary() && rule.value.is_some() {
        return Err(invalid_value(operator, "this operator takes no expected value"));
    }

    let aggregation = rule
        .aggregation
        .or_else(|| overrides.get(&operator).copied())
        .or_else(|| {
            // A negation follows its positive unless configured on its own.
            operator
                .negates()
                .and_then(|positive| overrides.get(&positive).copied())
        })
        .unwrap_or(descriptor.aggregation);

    let base = SolverBase {
        attribute,
        aggregation,
        ignore_case: rule.ignore_case,
    };
    let expected = rule.value.clone().map(AttributeValue::from);

    let inner = instantiate(descriptor, base, expected.as_ref())?;
    tracing::debug!(
        operator = %operator,
        attribute = rule.attribute.as_deref().unwrap_or("-"),
        aggregation = %aggregation,
        "compiled rule"
    );
    Ok(Solver::new(inner, rule.resource_types.clone()))
}

fn instantiate(
    descriptor: &OperatorDescriptor,
    base: SolverBase,
    expected: Option<&AttributeValue>,
) -> Result<Box<dyn AttributeSolver>> {
    match descriptor.construction {
        Construction::Build(f) => f(base, expected),
        Construction::Negate(positive) => {
            let inner = instantiate(positive.descriptor(), base, expected)?;
            Ok(Box::new(Negate::new(descriptor.operator, inner)))
        }
    }
}

/// Error for a missing or wrongly shaped expected value.
pub(crate) fn invalid_value(operator: Operator, message: impl Into<String>) -> CheckError {
    CheckError::InvalidValue {
        operator: operator.to_string(),
        message: message.into(),
    }
}
