//! Dependency Check
//!
//! Compares the bare-module imports of a source file against the preview
//! project's `package.json`. Pure apart from reading the manifest.

use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use crate::models::{FindingKind, ValidationError};

/// Node built-ins that never need installing.
pub const NODE_BUILTINS: &[&str] = &[
    "fs",
    "path",
    "http",
    "https",
    "os",
    "util",
    "events",
    "stream",
    "buffer",
    "querystring",
    "url",
    "crypto",
];

fn import_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?:import|from)\s+['"]([^'"]+)['"]"#).ok())
        .as_ref()
}

/// Package name for an import specifier, or `None` for relative/absolute paths.
pub fn package_of(specifier: &str) -> Option<&str> {
    if specifier.is_empty() || specifier.starts_with('.') || specifier.starts_with('/') {
        return None;
    }
    if specifier.starts_with('@') {
        let mut slashes = specifier.match_indices('/');
        return match (slashes.next(), slashes.next()) {
            (Some(_), Some((second, _))) => Some(&specifier[..second]),
            _ => Some(specifier),
        };
    }
    specifier.split('/').next()
}

/// Distinct imported packages in first-appearance order.
pub fn extract_imports(source: &str) -> Vec<String> {
    let Some(re) = import_regex() else {
        return Vec::new();
    };
    let mut seen = HashSet::new();
    re.captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| package_of(m.as_str()))
        .filter(|pkg| seen.insert(pkg.to_string()))
        .map(str::to_string)
        .collect()
}

fn is_builtin(pkg: &str) -> bool {
    pkg.starts_with("node:") || NODE_BUILTINS.contains(&pkg)
}

/// Names from `dependencies` and `devDependencies`.
fn declared_packages(manifest: &serde_json::Value) -> HashSet<String> {
    ["dependencies", "devDependencies"]
        .iter()
        .filter_map(|key| manifest.get(*key).and_then(|v| v.as_object()))
        .flat_map(|deps| deps.keys().cloned())
        .collect()
}

/// Check `source` against `<project_root>/package.json`.
pub async fn check_dependencies(
    source: &str,
    filename: &str,
    project_root: &Path,
) -> Vec<ValidationError> {
    let manifest_path = project_root.join("package.json");
    let raw = match tokio::fs::read_to_string(&manifest_path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %manifest_path.display(), "No package.json, skipping dependency check");
            return Vec::new();
        }
        Err(e) => {
            return vec![ValidationError::error(
                FindingKind::Dependency,
                filename,
                format!("Failed to read package.json: {}", e),
            )];
        }
    };
    let manifest: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(manifest) => manifest,
        Err(e) => {
            return vec![ValidationError::error(
                FindingKind::Dependency,
                filename,
                format!("Failed to read package.json: {}", e),
            )];
        }
    };

    let declared = declared_packages(&manifest);
    extract_imports(source)
        .into_iter()
        .filter(|pkg| !is_builtin(pkg) && !declared.contains(pkg))
        .map(|pkg| {
            ValidationError::error(
                FindingKind::Dependency,
                filename,
                format!("Missing dependency: {}", pkg),
            )
            .with_suggestion(format!("Run: npm install {}", pkg))
        })
        .collect()
}
