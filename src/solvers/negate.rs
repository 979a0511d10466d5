use crate::graph::{AttributeValue, Vertex};

use super::{AttributeSolver, Evaluation, Operator, SolverBase};

/// Logical complement of another solver.
///
/// Inversion happens after path resolution and aggregation, so the wrapped
/// solver and its negation disagree on every vertex.
#[derive(Debug)]
pub struct Negate {
    operator: Operator,
    inner: Box<dyn AttributeSolver>,
}

impl Negate {
    pub fn new(operator: Operator, inner: Box<dyn AttributeSolver>) -> Self {
        Self { operator, inner }
    }

    pub fn inner(&self) -> &dyn AttributeSolver {
        self.inner.as_ref()
    }
}

impl AttributeSolver for Negate {
    fn operator(&self) -> Operator {
        self.operator
    }

    fn base(&self) -> &SolverBase {
        self.inner.base()
    }

    /// Complement for one value. `evaluate` never aggregates this hook; it
    /// inverts the inner solver's aggregated result instead.
    fn get_operation(&self, value: Option<&AttributeValue>) -> bool {
        !self.inner.get_operation(value)
    }

    fn evaluate(&self, vertex: &Vertex) -> Evaluation {
        let mut evaluation = self.inner.evaluate(vertex);
        evaluation.passed = !evaluation.passed;
        evaluation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AttributePath;
    use crate::solvers::builtin::equals::build as build_equals;
    use crate::solvers::{compile, Aggregation, RuleDefinition};
    use serde_json::json;

    #[test]
    fn negation_is_applied_after_aggregation() {
        // One port equals 22, another does not: equals passes existentially,
        // so not_equals must fail rather than pass on the other element.
        let vertex = Vertex::new("sg", "web").with_attributes_json(json!({"ports": [22, 443]}));
        let eq = compile(&RuleDefinition::new("equals", "ports.*", json!(22))).unwrap();
        let ne = compile(&RuleDefinition::new("not_equals", "ports.*", json!(22))).unwrap();
        assert!(eq.evaluate(&vertex));
        assert!(!ne.evaluate(&vertex));
    }

    #[test]
    fn single_value_hook_is_the_complement() {
        let base = || SolverBase {
            attribute: Some(AttributePath::parse("port")),
            aggregation: Aggregation::Any,
            ignore_case: false,
        };
        let expected = AttributeValue::number(22.0);
        let equals = build_equals(base(), Some(&expected)).unwrap();
        let negated = Negate::new(
            Operator::NotEquals,
            build_equals(base(), Some(&expected)).unwrap(),
        );

        let values = [
            None,
            Some(AttributeValue::number(22.0)),
            Some(AttributeValue::string("443")),
            Some(AttributeValue::from(json!([22, 443]))),
        ];
        for value in &values {
            assert_eq!(
                negated.get_operation(value.as_ref()),
                !equals.get_operation(value.as_ref()),
                "{value:?}"
            );
        }
    }
}
