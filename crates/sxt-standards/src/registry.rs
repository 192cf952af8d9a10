#![deny(unsafe_code)]

use std::fmt;
use std::path::{Path, PathBuf};

use sxt_model::TransformDescriptor;

use crate::descriptor_xml::parse_descriptor_document;
use crate::error::StandardsError;

/// Raised when no descriptor matches a standard name and version.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no transform registered for standard '{standard_name}', version '{standard_version}'")]
pub struct TransformNotFound {
    pub standard_name: String,
    pub standard_version: String,
    /// `(name, version)` pairs that were registered at lookup time.
    pub available: Vec<(String, String)>,
}

/// Insertion-ordered set of transform descriptors.
///
/// Duplicate `(name, version)` pairs are kept as loaded; lookups return the
/// first one.
#[derive(Debug, Clone, Default)]
pub struct TransformRegistry {
    descriptors: Vec<TransformDescriptor>,
    source: Option<PathBuf>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, StandardsError> {
        let mut registry = Self::new();
        registry.reload(path)?;
        Ok(registry)
    }

    /// Replace all entries with the contents of `path`.
    ///
    /// Prior entries are dropped before reading, so a failed reload leaves
    /// the registry empty.
    pub fn reload(&mut self, path: &Path) -> Result<(), StandardsError> {
        self.descriptors.clear();
        self.source = None;

        let contents = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
        let descriptors = parse_descriptor_document(&contents, path)?;
        tracing::debug!(
            path = %path.display(),
            count = descriptors.len(),
            "loaded transform descriptors"
        );

        self.descriptors = descriptors;
        self.source = Some(path.to_path_buf());
        Ok(())
    }

    /// Linear scan on exact name and version; first match wins.
    pub fn lookup(
        &self,
        standard_name: &str,
        standard_version: &str,
    ) -> Result<&TransformDescriptor, TransformNotFound> {
        self.descriptors
            .iter()
            .find(|d| d.matches(standard_name, standard_version))
            .ok_or_else(|| TransformNotFound {
                standard_name: standard_name.to_string(),
                standard_version: standard_version.to_string(),
                available: self
                    .descriptors
                    .iter()
                    .map(|d| (d.standard_name.clone(), d.standard_version.clone()))
                    .collect(),
            })
    }

    pub fn insert(&mut self, descriptor: TransformDescriptor) {
        self.descriptors.push(descriptor);
    }

    /// Remove every entry equal to `descriptor`. Returns how many were removed.
    pub fn remove(&mut self, descriptor: &TransformDescriptor) -> usize {
        let before = self.descriptors.len();
        self.descriptors.retain(|d| d != descriptor);
        before - self.descriptors.len()
    }

    pub fn descriptors(&self) -> &[TransformDescriptor] {
        &self.descriptors
    }

    /// File the current entries were loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl fmt::Display for TransformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Currently-available transforms: ")?;
        for descriptor in &self.descriptors {
            writeln!(f, "{descriptor}")?;
        }
        Ok(())
    }
}
