//! Attribute solvers: compiled predicates over vertex attributes.
//!
//! A rule definition names an operator, an attribute path, and an expected
//! value. [`compile`] turns it into a [`Solver`], which can then be applied
//! to any number of vertices, concurrently if needed.

pub mod builtin;
pub mod definition;
pub mod negate;
pub mod registry;

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::graph::{AttributePath, AttributeValue, Resolution, ResourceGraph, Vertex};

pub use definition::{ConditionType, ResourceTypes, RuleDefinition};
pub use negate::Negate;
pub use registry::{compile, compile_with, AggregationOverrides, Operator, OperatorDescriptor};

/// Per-vertex outcome of a solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Passed,
    Failed,
    /// The rule does not apply to this vertex.
    Unknown,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => write!(f, "PASSED"),
            Self::Failed => write!(f, "FAILED"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// How the hook results of several resolved matches combine into one verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Pass if the hook passes for at least one match.
    Any,
    /// Pass if the hook passes for every match.
    All,
    /// Gather expanded matches into one sequence and run the hook once.
    Collection,
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::All => write!(f, "all"),
            Self::Collection => write!(f, "collection"),
        }
    }
}

/// Construction-time parameters shared by every attribute solver.
#[derive(Debug, Clone)]
pub struct SolverBase {
    /// `None` only for operators that ignore attributes (`any`).
    pub attribute: Option<AttributePath>,
    pub aggregation: Aggregation,
    pub ignore_case: bool,
}

/// Result of applying a solver's predicate to one vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub passed: bool,
    /// Concrete paths that matched, or the declared path when nothing did.
    pub paths: Vec<String>,
}

/// The shared solver contract.
///
/// Implementations override [`get_operation`](AttributeSolver::get_operation)
/// only; path resolution and aggregation live in the provided
/// [`evaluate`](AttributeSolver::evaluate).
pub trait AttributeSolver: Send + Sync + fmt::Debug {
    fn operator(&self) -> Operator;

    fn base(&self) -> &SolverBase;

    /// Predicate over one resolved value; `None` means the path matched nothing.
    fn get_operation(&self, value: Option<&AttributeValue>) -> bool;

    fn evaluate(&self, vertex: &Vertex) -> Evaluation {
        evaluate_attribute(self, vertex)
    }
}

fn evaluate_attribute<S: AttributeSolver + ?Sized>(solver: &S, vertex: &Vertex) -> Evaluation {
    let base = solver.base();
    let Some(path) = base.attribute.as_ref() else {
        return Evaluation {
            passed: solver.get_operation(None),
            paths: Vec::new(),
        };
    };

    let Resolution { matches, expanded } = path.resolution(&vertex.attributes);

    let passed = match (base.aggregation, matches.as_slice()) {
        (_, []) => solver.get_operation(None),
        (Aggregation::Collection, [single]) if !expanded => {
            solver.get_operation(Some(single.value))
        }
        (Aggregation::Collection, _) => {
            let gathered =
                AttributeValue::Sequence(matches.iter().map(|m| m.value.clone()).collect());
            solver.get_operation(Some(&gathered))
        }
        (Aggregation::Any, _) => matches.iter().any(|m| solver.get_operation(Some(m.value))),
        (Aggregation::All, _) => matches.iter().all(|m| solver.get_operation(Some(m.value))),
    };

    let paths = if matches.is_empty() {
        vec![path.to_string()]
    } else {
        matches.into_iter().map(|m| m.path).collect()
    };

    Evaluation { passed, paths }
}

/// Outcome of a solver on a single vertex, with the paths that explain it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VertexResult {
    pub verdict: Verdict,
    pub evaluated_paths: Vec<String>,
}

/// Vertex indices partitioned by verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SolverResults {
    pub passed: Vec<usize>,
    pub failed: Vec<usize>,
    pub unknown: Vec<usize>,
}

/// A compiled rule: an attribute solver bound to the resource types it targets.
///
/// Holds no per-call state; one instance may be shared across threads.
#[derive(Debug)]
pub struct Solver {
    inner: Box<dyn AttributeSolver>,
    resource_types: ResourceTypes,
}

impl Solver {
    pub fn new(inner: Box<dyn AttributeSolver>, resource_types: ResourceTypes) -> Self {
        Self {
            inner,
            resource_types,
        }
    }

    pub fn operator(&self) -> Operator {
        self.inner.operator()
    }

    pub fn attribute(&self) -> Option<&AttributePath> {
        self.inner.base().attribute.as_ref()
    }

    pub fn aggregation(&self) -> Aggregation {
        self.inner.base().aggregation
    }

    pub fn applies_to(&self, vertex: &Vertex) -> bool {
        self.resource_types.matches(&vertex.resource_type)
    }

    /// Raw predicate result, ignoring resource types.
    pub fn evaluate(&self, vertex: &Vertex) -> bool {
        self.inner.evaluate(vertex).passed
    }

    pub fn verdict(&self, vertex: &Vertex) -> VertexResult {
        if !self.applies_to(vertex) {
            return VertexResult {
                verdict: Verdict::Unknown,
                evaluated_paths: Vec::new(),
            };
        }
        let evaluation = self.inner.evaluate(vertex);
        VertexResult {
            verdict: if evaluation.passed {
                Verdict::Passed
            } else {
                Verdict::Failed
            },
            evaluated_paths: evaluation.paths,
        }
    }

    /// Evaluate every vertex of the graph in parallel.
    pub fn run(&self, graph: &ResourceGraph) -> SolverResults {
        let verdicts: Vec<(usize, Verdict)> = graph
            .vertices()
            .par_iter()
            .map(|vertex| (vertex.index(), self.verdict(vertex).verdict))
            .collect();

        let mut results = SolverResults::default();
        for (index, verdict) in verdicts {
            match verdict {
                Verdict::Passed => results.passed.push(index),
                Verdict::Failed => results.failed.push(index),
                Verdict::Unknown => results.unknown.push(index),
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bucket(attributes: serde_json::Value) -> Vertex {
        Vertex::new("aws_s3_bucket", "b").with_attributes_json(attributes)
    }

    fn rule(operator: &str, attribute: &str, value: serde_json::Value) -> RuleDefinition {
        RuleDefinition::new(operator, attribute, value)
    }

    #[test]
    fn verdict_is_unknown_outside_resource_types() {
        let mut def = rule("exists", "acl", json!(null));
        def.resource_types = ResourceTypes::Only(vec!["aws_s3_bucket".into()]);
        let solver = compile(&def).unwrap();

        let other = Vertex::new("aws_instance", "i").with_attributes_json(json!({"acl": "x"}));
        assert_eq!(solver.verdict(&other).verdict, Verdict::Unknown);
        assert_eq!(solver.verdict(&bucket(json!({"acl": "x"}))).verdict, Verdict::Passed);
    }

    #[test]
    fn evaluated_paths_report_matches_or_declared_path() {
        let solver = compile(&rule("greater_than", "ports.*", json!(100))).unwrap();
        let result = solver.verdict(&bucket(json!({"ports": [80, 443]})));
        assert_eq!(result.verdict, Verdict::Passed);
        assert_eq!(result.evaluated_paths, vec!["ports.0", "ports.1"]);

        let result = solver.verdict(&bucket(json!({})));
        assert_eq!(result.verdict, Verdict::Failed);
        assert_eq!(result.evaluated_paths, vec!["ports.*"]);
    }

    #[test]
    fn all_aggregation_requires_every_match() {
        let mut def = rule("greater_than", "ports.*", json!(100));
        def.aggregation = Some(Aggregation::All);
        let solver = compile(&def).unwrap();
        assert!(!solver.evaluate(&bucket(json!({"ports": [80, 443]}))));
        assert!(solver.evaluate(&bucket(json!({"ports": [443, 8080]}))));
    }

    #[test]
    fn collection_aggregation_gathers_wildcard_matches() {
        let solver = compile(&rule("length_equals", "rules.*.port", json!(2))).unwrap();
        let v = bucket(json!({"rules": [{"port": 1}, {"port": 2}, {"name": "x"}]}));
        assert!(solver.evaluate(&v));
    }

    #[test]
    fn implicit_block_traversal_collects_like_a_wildcard() {
        let one = bucket(json!({"ingress": [{"name": "abc"}]}));
        let two = bucket(json!({"ingress": [{"name": "abc"}, {"name": "de"}]}));

        for (vertex, count) in [(&one, 1), (&two, 2)] {
            for path in ["ingress.name", "ingress.*.name"] {
                let length = compile(&rule("length_equals", path, json!(count))).unwrap();
                assert!(length.evaluate(vertex), "{path} over {count} block(s)");
                let subset = compile(&rule("subset", path, json!(["abc"]))).unwrap();
                assert!(subset.evaluate(vertex), "{path} over {count} block(s)");
            }
        }

        // The single name is not measured as a string.
        let chars = compile(&rule("length_equals", "ingress.name", json!(3))).unwrap();
        assert!(!chars.evaluate(&one));
        let direct = compile(&rule("length_equals", "ingress.0.name", json!(3))).unwrap();
        assert!(direct.evaluate(&one));
    }

    #[test]
    fn run_partitions_vertices() {
        let mut def = rule("equals", "acl", json!("private"));
        def.resource_types = ResourceTypes::Only(vec!["aws_s3_bucket".into()]);
        let solver = compile(&def).unwrap();

        let graph = ResourceGraph::new(vec![
            bucket(json!({"acl": "private"})),
            bucket(json!({"acl": "public-read"})),
            Vertex::new("aws_instance", "web"),
            bucket(json!({})),
        ]);
        let results = solver.run(&graph);
        assert_eq!(results.passed, vec![0]);
        assert_eq!(results.failed, vec![1, 3]);
        assert_eq!(results.unknown, vec![2]);
    }

    #[test]
    fn run_reports_graph_indices() {
        let solver = compile(&rule("exists", "acl", json!(null))).unwrap();
        let graph = ResourceGraph::new(vec![
            bucket(json!({"acl": "private"})).with_index(7),
            bucket(json!({})).with_index(3),
        ]);
        let results = solver.run(&graph);
        assert_eq!(results.passed, vec![7]);
        assert_eq!(results.failed, vec![3]);
    }
}
