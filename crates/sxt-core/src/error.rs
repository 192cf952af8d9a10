use std::path::{Path, PathBuf};

use thiserror::Error;

/// Problems reading a run configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration {path}: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },

    #[error("configuration {path} has no root element")]
    EmptyDocument { path: PathBuf },

    #[error("invalid value '{value}' for parameter '{name}': {message}")]
    InvalidValue {
        name: String,
        value: String,
        message: String,
    },
}

impl ConfigError {
    pub(crate) fn xml(path: &Path, source: impl Into<quick_xml::Error>) -> Self {
        ConfigError::Xml {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}
