use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One registry entry: where a standard's transform artifacts and schema live.
///
/// Sub-paths are stored exactly as written in the descriptor file and are
/// relative to the artifact or schema repository configured for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformDescriptor {
    pub standard_name: String,
    pub standard_version: String,
    pub import_artifact: Option<String>,
    pub export_artifact: Option<String>,
    pub schema: Option<String>,
    /// Short name of the built-in display stylesheet for exported documents.
    pub default_stylesheet: Option<String>,
}

impl TransformDescriptor {
    pub fn new(standard_name: impl Into<String>, standard_version: impl Into<String>) -> Self {
        Self {
            standard_name: standard_name.into(),
            standard_version: standard_version.into(),
            import_artifact: None,
            export_artifact: None,
            schema: None,
            default_stylesheet: None,
        }
    }

    /// Exact, case-sensitive match on both name and version.
    pub fn matches(&self, standard_name: &str, standard_version: &str) -> bool {
        self.standard_name == standard_name && self.standard_version == standard_version
    }

    pub fn resolve_import_artifact_path(&self, repo_base: &Path) -> Option<PathBuf> {
        self.import_artifact
            .as_deref()
            .map(|sub| join_sub_path(repo_base, sub))
    }

    pub fn resolve_export_artifact_path(&self, repo_base: &Path) -> Option<PathBuf> {
        self.export_artifact
            .as_deref()
            .map(|sub| join_sub_path(repo_base, sub))
    }

    pub fn resolve_schema_path(&self, repo_base: &Path) -> Option<PathBuf> {
        self.schema.as_deref().map(|sub| join_sub_path(repo_base, sub))
    }
}

impl fmt::Display for TransformDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Standard '{}', version '{}'",
            self.standard_name, self.standard_version
        )
    }
}

/// `base + "/" + sub`, with no normalization and no existence check.
fn join_sub_path(base: &Path, sub: &str) -> PathBuf {
    PathBuf::from(format!("{}/{}", base.to_string_lossy(), sub))
}
