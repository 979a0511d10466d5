use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{CheckRecord, CheckResult, Severity};

/// The final pass/fail decision after applying the
/// skip list and severity overrides to raw check records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyVerdict {
    pub pass: bool,
    pub total_failed: usize,
    pub effective_failed: usize,
    pub highest_severity: Option<Severity>,
    pub fail_threshold: Severity,
}

/// Policy configuration loaded from `.attrcheck.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    /// Minimum severity of a failed check that fails the run.
    #[serde(default = "default_fail_on")]
    pub fail_on: Severity,
    /// Check IDs whose records are reported as skipped.
    #[serde(default)]
    pub skip_checks: HashSet<String>,
    /// When non-empty, only these check IDs are reported.
    #[serde(default)]
    pub run_checks: HashSet<String>,
    /// Per-check severity overrides.
    #[serde(default)]
    pub overrides: HashMap<String, Severity>,
}

fn default_fail_on() -> Severity {
    Severity::High
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            fail_on: Severity::High,
            skip_checks: HashSet::new(),
            run_checks: HashSet::new(),
            overrides: HashMap::new(),
        }
    }
}

impl Policy {
    fn is_selected(&self, check_id: &str) -> bool {
        self.run_checks.is_empty() || self.run_checks.contains(check_id)
    }

    /// Evaluate records against this policy and produce a verdict.
    pub fn evaluate(&self, records: &[CheckRecord]) -> PolicyVerdict {
        let failed: Vec<&CheckRecord> = records
            .iter()
            .filter(|r| r.result == CheckResult::Failed)
            .collect();

        let effective: Vec<Severity> = failed
            .iter()
            .filter(|r| self.is_selected(&r.check_id) && !self.skip_checks.contains(&r.check_id))
            .map(|r| {
                self.overrides
                    .get(&r.check_id)
                    .copied()
                    .unwrap_or(r.severity)
            })
            .collect();

        let highest = effective.iter().copied().max();
        let fails = effective.iter().any(|&sev| sev >= self.fail_on);

        PolicyVerdict {
            pass: !fails,
            total_failed: failed.len(),
            effective_failed: effective.len(),
            highest_severity: highest,
            fail_threshold: self.fail_on,
        }
    }

    /// Filter records: drop unselected checks, mark skipped ones, apply overrides.
    pub fn apply(&self, records: &[CheckRecord]) -> Vec<CheckRecord> {
        records
            .iter()
            .filter(|r| self.is_selected(&r.check_id))
            .map(|r| {
                let mut r = r.clone();
                if self.skip_checks.contains(&r.check_id) {
                    r.result = CheckResult::Skipped;
                }
                if let Some(&override_sev) = self.overrides.get(&r.check_id) {
                    r.severity = override_sev;
                }
                r
            })
            .collect()
    }
}
