//! Design File and Package Names
//!
//! Tool arguments that name a file or a package are parsed into these
//! newtypes during argument deserialization, so an executor never sees a
//! path outside `designs/` or a package spec that could be read as a flag.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// The only directory tools may write to, relative to the workspace root.
pub const DESIGNS_DIR: &str = "designs";

/// Required extension for design files.
pub const DESIGN_EXTENSION: &str = ".tsx";

/// Pattern advertised to the model in the tool schemas.
pub const FILENAME_PATTERN: &str = r"^[a-z0-9-]+\.tsx$";

/// Pattern advertised to the model for package names.
pub const PACKAGE_NAME_PATTERN: &str = r"^[a-z0-9@/._-]+$";

/// Check a design filename against the naming contract.
pub fn validate_filename(filename: &str) -> Result<(), String> {
    if filename.contains("..") {
        return Err("Path traversal is not allowed".to_string());
    }
    if filename.starts_with('/') || filename.starts_with('\\') {
        return Err("Absolute paths are not allowed".to_string());
    }
    let Some(stem) = filename.strip_suffix(DESIGN_EXTENSION) else {
        return Err("Only .tsx files are allowed".to_string());
    };
    let stem_ok = !stem.is_empty()
        && stem
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !stem_ok {
        return Err("Filename must be kebab-case with .tsx extension".to_string());
    }
    Ok(())
}

/// A validated design filename such as `pricing-table.tsx`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DesignFilename(String);

impl DesignFilename {
    pub fn parse(filename: impl Into<String>) -> Result<Self, String> {
        let filename = filename.into();
        validate_filename(&filename)?;
        Ok(Self(filename))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filename without the extension; used as the injection namespace and
    /// as the preview design name.
    pub fn stem(&self) -> &str {
        self.0
            .strip_suffix(DESIGN_EXTENSION)
            .unwrap_or(self.0.as_str())
    }

    /// `<workspace>/designs/<filename>`
    pub fn path_in(&self, workspace_root: &Path) -> PathBuf {
        workspace_root.join(DESIGNS_DIR).join(&self.0)
    }
}

impl TryFrom<String> for DesignFilename {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<DesignFilename> for String {
    fn from(value: DesignFilename) -> Self {
        value.0
    }
}

impl fmt::Display for DesignFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated npm package name (scoped names allowed).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageName(String);

impl PackageName {
    pub fn parse(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        let chars_ok = !name.is_empty()
            && name.chars().all(|c| {
                c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '@' | '/' | '.' | '_' | '-')
            });
        if !chars_ok || name.starts_with('-') || name.contains("..") {
            return Err(format!("Invalid package name: {}", name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PackageName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<PackageName> for String {
    fn from(value: PackageName) -> Self {
        value.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
