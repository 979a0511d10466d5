//! attrcheck, an attribute-predicate policy engine for scanned infrastructure.
//!
//! Checks are data: an operator name, an attribute path and an expected
//! value. They compile into solvers that are evaluated against every vertex
//! of a resource graph, producing a pass/fail record per resource.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//! use attrcheck::{check, CheckOptions};
//!
//! let options = CheckOptions {
//!     check_paths: vec![PathBuf::from("./checks")],
//!     ..CheckOptions::default()
//! };
//! let report = check(Path::new("./graph.json"), &options).unwrap();
//! println!("Pass: {}, Failed: {}", report.verdict.pass, report.summary.failed);
//! ```

pub mod checks;
pub mod config;
pub mod error;
pub mod graph;
pub mod output;
pub mod solvers;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use checks::policy::{Policy, PolicyVerdict};
use checks::{CheckEngine, CheckRecord, CheckResult, CompileFailure, Severity};
use config::Config;
use error::{CheckError, Result};
use graph::ResourceGraph;
use output::OutputFormat;

/// Options for a check invocation.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Path to config file (defaults to `.attrcheck.toml` next to the graph).
    pub config_path: Option<PathBuf>,
    /// Check files or directories; overrides `[checks] paths` when non-empty.
    pub check_paths: Vec<PathBuf>,
    /// CLI override for fail_on threshold.
    pub fail_on_override: Option<Severity>,
}

/// Record counts for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub compile_errors: usize,
    pub resources: usize,
}

/// Complete evaluation report.
#[derive(Debug, Serialize)]
pub struct Report {
    pub records: Vec<CheckRecord>,
    pub compile_failures: Vec<CompileFailure>,
    pub summary: Summary,
    pub verdict: PolicyVerdict,
    pub generated_at: DateTime<Utc>,
}

/// Run a complete check: load config and checks, compile, load the graph,
/// evaluate, apply policy.
pub fn check(graph_path: &Path, options: &CheckOptions) -> Result<Report> {
    let config_path = options.config_path.clone().unwrap_or_else(|| {
        graph_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(".attrcheck.toml")
    });
    let mut config = Config::load(&config_path)?;

    if let Some(fail_on) = options.fail_on_override {
        config.policy.fail_on = fail_on;
    }

    let check_paths = if options.check_paths.is_empty() {
        config.checks.paths.clone()
    } else {
        options.check_paths.clone()
    };
    if check_paths.is_empty() {
        return Err(CheckError::Config(
            "no check paths given (use --checks or [checks] paths)".into(),
        ));
    }

    let loaded = checks::loader::load_paths(&check_paths)?;
    let overrides = config.aggregation_overrides()?;
    let engine =
        CheckEngine::compile(loaded.definitions, &overrides).with_failures(loaded.failures);

    let graph = ResourceGraph::load(graph_path)?;
    Ok(evaluate(&graph, &engine, &config.policy))
}

/// Evaluate compiled checks against a graph and apply the policy.
pub fn evaluate(graph: &ResourceGraph, engine: &CheckEngine, policy: &Policy) -> Report {
    let raw = engine.run(graph);
    let verdict = policy.evaluate(&raw);
    let records = policy.apply(&raw);

    let count = |result: CheckResult| records.iter().filter(|r| r.result == result).count();
    let summary = Summary {
        passed: count(CheckResult::Passed),
        failed: count(CheckResult::Failed),
        skipped: count(CheckResult::Skipped),
        compile_errors: engine.failures().len(),
        resources: graph.len(),
    };

    tracing::info!(
        checks = engine.checks().len(),
        resources = summary.resources,
        passed = summary.passed,
        failed = summary.failed,
        skipped = summary.skipped,
        compile_errors = summary.compile_errors,
        "evaluation finished"
    );

    Report {
        records,
        compile_failures: engine.failures().to_vec(),
        summary,
        verdict,
        generated_at: Utc::now(),
    }
}

/// Render a report in the specified format.
pub fn render_report(report: &Report, format: OutputFormat) -> Result<String> {
    output::render(report, format)
}
