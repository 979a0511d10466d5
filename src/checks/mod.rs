pub mod loader;
pub mod policy;
pub mod record;

use std::collections::HashSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::graph::ResourceGraph;
use crate::solvers::registry::{self, AggregationOverrides, Operator};
use crate::solvers::{compile_with, Aggregation, RuleDefinition, Solver, Verdict};

pub use record::{CheckRecord, CheckResult, Severity};

/// Descriptive fields of a check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckMetadata {
    /// Unique check identifier (e.g., "CKV2_AWS_6").
    pub id: String,
    /// Human-readable check name.
    pub name: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub guideline: Option<String>,
}

/// A check as written in a check file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckDefinition {
    pub metadata: CheckMetadata,
    pub definition: RuleDefinition,
}

/// A check whose rule compiled into a solver.
#[derive(Debug)]
pub struct CompiledCheck {
    pub metadata: CheckMetadata,
    pub solver: Solver,
}

/// A check that could not be loaded or compiled. It is reported and left out
/// of evaluation; other checks are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileFailure {
    pub check_id: String,
    pub error: String,
}

/// Row of the `list-operators` output.
#[derive(Debug, Clone, Serialize)]
pub struct OperatorInfo {
    pub name: &'static str,
    pub negates: Option<&'static str>,
    pub aggregation: Aggregation,
    pub takes_value: bool,
}

/// The check engine runs every compiled check against a resource graph.
#[derive(Debug, Default)]
pub struct CheckEngine {
    checks: Vec<CompiledCheck>,
    failures: Vec<CompileFailure>,
}

impl CheckEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile check definitions. A check that fails to compile is recorded
    /// as a failure; the rest are still compiled.
    pub fn compile(definitions: Vec<CheckDefinition>, overrides: &AggregationOverrides) -> Self {
        let mut engine = Self::new();
        let mut seen = HashSet::new();

        for def in definitions {
            let id = def.metadata.id.clone();
            if !seen.insert(id.clone()) {
                tracing::warn!(check_id = %id, "duplicate check id, keeping the first definition");
                engine.failures.push(CompileFailure {
                    check_id: id,
                    error: "duplicate check id".into(),
                });
                continue;
            }

            match compile_with(&def.definition, overrides) {
                Ok(solver) => engine.checks.push(CompiledCheck {
                    metadata: def.metadata,
                    solver,
                }),
                Err(e) => {
                    tracing::warn!(check_id = %id, error = %e, "check failed to compile, skipping");
                    engine.failures.push(CompileFailure {
                        check_id: id,
                        error: e.to_string(),
                    });
                }
            }
        }

        engine
    }

    /// Record failures that happened before compilation (unreadable files).
    pub fn with_failures(mut self, failures: Vec<CompileFailure>) -> Self {
        self.failures.splice(0..0, failures);
        self
    }

    pub fn checks(&self) -> &[CompiledCheck] {
        &self.checks
    }

    pub fn failures(&self) -> &[CompileFailure] {
        &self.failures
    }

    /// Run all checks against the graph. Vertices outside a check's resource
    /// types produce no record.
    pub fn run(&self, graph: &ResourceGraph) -> Vec<CheckRecord> {
        let mut records = Vec::new();

        for check in &self.checks {
            let solver = &check.solver;
            let results: Vec<CheckRecord> = graph
                .vertices()
                .par_iter()
                .filter_map(|vertex| {
                    let outcome = solver.verdict(vertex);
                    let result = match outcome.verdict {
                        Verdict::Passed => CheckResult::Passed,
                        Verdict::Failed => CheckResult::Failed,
                        Verdict::Unknown => return None,
                    };
                    Some(CheckRecord {
                        check_id: check.metadata.id.clone(),
                        check_name: check.metadata.name.clone(),
                        severity: check.metadata.severity,
                        result,
                        resource: vertex.resource_id(),
                        vertex_index: vertex.index(),
                        evaluated_paths: outcome.evaluated_paths,
                        location: vertex.source.clone(),
                        guideline: check.metadata.guideline.clone(),
                    })
                })
                .collect();

            tracing::debug!(
                check_id = %check.metadata.id,
                operator = %solver.operator(),
                records = results.len(),
                "check evaluated"
            );
            records.extend(results);
        }

        records
    }

    /// Metadata for all compiled checks.
    pub fn list_checks(&self) -> Vec<CheckMetadata> {
        self.checks.iter().map(|c| c.metadata.clone()).collect()
    }
}

/// Describe every registered operator.
pub fn list_operators() -> Vec<OperatorInfo> {
    registry::operators()
        .map(|op: Operator| {
            let descriptor = op.descriptor();
            OperatorInfo {
                name: op.as_str(),
                negates: op.negates().map(|p| p.as_str()),
                aggregation: descriptor.aggregation,
                takes_value: !op.is_unary(),
            }
        })
        .collect()
}
