use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to write log to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write log to standard output: {0}")]
    Stdout(#[source] std::io::Error),

    #[error("failed to build log document: {0}")]
    Xml(#[source] std::io::Error),

    #[error("log document is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}
