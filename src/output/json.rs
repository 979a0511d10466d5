use crate::error::Result;
use crate::Report;

/// Render a report as pretty-printed JSON.
pub fn render(report: &Report) -> Result<String> {
    let json = serde_json::to_string_pretty(report)?;
    Ok(json)
}
