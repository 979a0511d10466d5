//! Loading check definitions from YAML, JSON and TOML files.
//!
//! A file holds either a single check (`metadata` + `definition`) or a list
//! of them under `checks`.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{CheckDefinition, CompileFailure};
use crate::error::{CheckError, Result};

const CHECK_EXTENSIONS: &[&str] = &["yaml", "yml", "json", "toml"];

/// Check definitions gathered from disk, plus the files that could not be read.
#[derive(Debug, Default)]
pub struct LoadedChecks {
    pub definitions: Vec<CheckDefinition>,
    pub failures: Vec<CompileFailure>,
}

fn is_check_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| CHECK_EXTENSIONS.contains(&e.to_lowercase().as_str()))
}

/// Parse check definitions from file content, picking the format from `path`.
pub fn parse_checks(path: &Path, content: &str) -> Result<Vec<CheckDefinition>> {
    let load_err = |message: String| CheckError::CheckLoad {
        path: path.display().to_string(),
        message,
    };

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    let doc: serde_json::Value = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(content)?,
        "json" => serde_json::from_str(content)?,
        "toml" => toml::from_str(content)?,
        other => return Err(load_err(format!("unsupported file type '{other}'"))),
    };

    let checks = match doc.get("checks") {
        Some(list) => serde_json::from_value::<Vec<CheckDefinition>>(list.clone()),
        None => serde_json::from_value::<CheckDefinition>(doc).map(|c| vec![c]),
    };
    checks.map_err(|e| load_err(e.to_string()))
}

/// Load every check under `root`, which may be a single file or a directory
/// walked recursively in file-name order.
///
/// A missing root is an error; an unreadable or malformed file is recorded
/// as a failure and loading continues.
pub fn load_path(root: &Path) -> Result<LoadedChecks> {
    if !root.exists() {
        return Err(CheckError::CheckLoad {
            path: root.display().to_string(),
            message: "path does not exist".into(),
        });
    }

    let files: Vec<PathBuf> = if root.is_file() {
        vec![root.to_path_buf()]
    } else {
        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_check_file(e.path()))
            .map(|e| e.into_path())
            .collect()
    };

    let mut loaded = LoadedChecks::default();
    for file in files {
        let parsed = std::fs::read_to_string(&file)
            .map_err(CheckError::from)
            .and_then(|content| parse_checks(&file, &content));
        match parsed {
            Ok(defs) => loaded.definitions.extend(defs),
            Err(e) => {
                tracing::warn!(
                    file = %file.display(),
                    error = %e,
                    "skipping unreadable check file"
                );
                loaded.failures.push(CompileFailure {
                    check_id: file.display().to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    tracing::debug!(
        root = %root.display(),
        checks = loaded.definitions.len(),
        failures = loaded.failures.len(),
        "loaded check definitions"
    );
    Ok(loaded)
}

/// Load checks from several roots, in order.
pub fn load_paths(roots: &[PathBuf]) -> Result<LoadedChecks> {
    let mut all = LoadedChecks::default();
    for root in roots {
        let loaded = load_path(root)?;
        all.definitions.extend(loaded.definitions);
        all.failures.extend(loaded.failures);
    }
    Ok(all)
}
