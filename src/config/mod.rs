use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::checks::policy::Policy;
use crate::error::{CheckError, Result};
use crate::solvers::{Aggregation, AggregationOverrides, Operator};

/// Where check definitions are loaded from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChecksConfig {
    /// Files or directories of check definitions.
    #[serde(default)]
    pub paths: Vec<PathBuf>,
}

/// Top-level configuration from `.attrcheck.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub policy: Policy,
    #[serde(default)]
    pub checks: ChecksConfig,
    /// Per-operator aggregation overrides, keyed by operator name.
    #[serde(default)]
    pub aggregation: BTreeMap<String, Aggregation>,
}

impl Config {
    /// Load config from a TOML file. Returns default if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.aggregation_overrides()?;
        Ok(config)
    }

    /// Resolve the `[aggregation]` table into typed overrides.
    pub fn aggregation_overrides(&self) -> Result<AggregationOverrides> {
        self.aggregation
            .iter()
            .map(|(name, aggregation)| {
                let operator: Operator = name.parse().map_err(|_| {
                    CheckError::Config(format!("unknown operator '{name}' in [aggregation]"))
                })?;
                Ok((operator, *aggregation))
            })
            .collect()
    }

    /// Generate a starter config file.
    pub fn starter_toml() -> &'static str {
        r#"# attrcheck configuration

[policy]
# Minimum severity of a failed check that fails the run
# (info, low, medium, high, critical).
fail_on = "high"

# Check IDs reported as skipped.
# skip_checks = ["CKV2_AWS_6"]

# Only report these check IDs (empty = all).
# run_checks = []

# Per-check severity overrides.
# [policy.overrides]
# "CKV2_AWS_6" = "info"

[checks]
# Files or directories of check definitions (yaml, json, toml).
paths = ["checks"]

# How multiple matches of a wildcard path combine, per operator
# (any, all, collection).
# [aggregation]
# equals = "all"
"#
    }
}
