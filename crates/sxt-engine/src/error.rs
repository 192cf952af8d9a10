use thiserror::Error;

/// Failures of an external engine, as opposed to problems in the documents
/// it processes.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to run {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {}: {stderr}", describe_status(.status))]
    Failed {
        tool: String,
        status: Option<i32>,
        stderr: String,
    },
}

impl EngineError {
    pub(crate) fn launch(tool: &str, source: std::io::Error) -> Self {
        EngineError::Launch {
            tool: tool.to_string(),
            source,
        }
    }
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => "no status".to_string(),
    }
}
