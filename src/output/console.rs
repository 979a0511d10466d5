use crate::checks::{CheckRecord, CheckResult, Severity};
use crate::Report;

/// Render a report as plain console text: failed checks first (most severe
/// on top), then compile failures, then the summary line.
pub fn render(report: &Report) -> String {
    let mut output = String::new();
    let s = &report.summary;

    output.push_str(&format!(
        "\n  Passed checks: {}, Failed checks: {}, Skipped checks: {}, Resources: {}\n\n",
        s.passed, s.failed, s.skipped, s.resources
    ));

    let mut failed: Vec<&CheckRecord> = report
        .records
        .iter()
        .filter(|r| r.result == CheckResult::Failed)
        .collect();
    failed.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.check_id.cmp(&b.check_id))
            .then_with(|| a.vertex_index.cmp(&b.vertex_index))
    });

    for record in &failed {
        let severity_tag = match record.severity {
            Severity::Critical => "[CRITICAL]",
            Severity::High => "[HIGH]    ",
            Severity::Medium => "[MEDIUM]  ",
            Severity::Low => "[LOW]     ",
            Severity::Info => "[INFO]    ",
        };

        let location = record
            .location
            .as_ref()
            .map(|l| match l.end_line {
                Some(end) => format!("{}:{}-{}", l.file.display(), l.line, end),
                None => format!("{}:{}", l.file.display(), l.line),
            })
            .unwrap_or_else(|| "-".into());

        output.push_str(&format!(
            "  {} {} {}\n",
            severity_tag, record.check_id, record.check_name
        ));
        output.push_str(&format!("           resource: {}\n", record.resource));
        output.push_str(&format!("           at {}\n", location));
        output.push_str(&format!(
            "           attribute: {}\n",
            record.evaluated_paths.join(", ")
        ));
        if let Some(guideline) = &record.guideline {
            output.push_str(&format!("           guide: {}\n", guideline));
        }
        output.push('\n');
    }

    if !report.compile_failures.is_empty() {
        output.push_str(&format!(
            "  {} check(s) could not be compiled:\n",
            report.compile_failures.len()
        ));
        for failure in &report.compile_failures {
            output.push_str(&format!("    {}: {}\n", failure.check_id, failure.error));
        }
        output.push('\n');
    }

    let verdict = &report.verdict;
    let status = if verdict.pass { "PASS" } else { "FAIL" };
    output.push_str(&format!(
        "  Result: {} (threshold: {}, highest: {})\n\n",
        status,
        verdict.fail_threshold,
        verdict
            .highest_severity
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none".into()),
    ));

    output
}
