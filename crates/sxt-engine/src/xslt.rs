use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::EngineError;

/// One stylesheet application: `source` through `stylesheet` into `output`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRequest {
    pub source: PathBuf,
    pub stylesheet: PathBuf,
    pub output: PathBuf,
    /// Named string parameters visible to the stylesheet as `$name`.
    pub parameters: BTreeMap<String, String>,
}

impl TransformRequest {
    pub fn new(
        source: impl Into<PathBuf>,
        stylesheet: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source: source.into(),
            stylesheet: stylesheet.into(),
            output: output.into(),
            parameters: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }
}

/// An XSLT 1.0 processor.
pub trait XsltEngine {
    /// Identity recorded in the run log.
    fn name(&self) -> String;

    fn transform(&self, request: &TransformRequest) -> Result<(), EngineError>;
}

/// Runs the libxslt `xsltproc` command-line tool.
#[derive(Debug, Clone)]
pub struct XsltProc {
    program: PathBuf,
}

impl Default for XsltProc {
    fn default() -> Self {
        Self {
            program: PathBuf::from("xsltproc"),
        }
    }
}

impl XsltProc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific executable instead of the one on `PATH`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Command-line arguments for `request`, in invocation order.
    pub fn arguments(request: &TransformRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(request.parameters.len() * 3 + 4);
        for (name, value) in &request.parameters {
            args.push("--stringparam".into());
            args.push(name.into());
            args.push(value.into());
        }
        args.push("-o".into());
        args.push(request.output.clone().into_os_string());
        args.push(request.stylesheet.clone().into_os_string());
        args.push(request.source.clone().into_os_string());
        args
    }
}

impl XsltEngine for XsltProc {
    fn name(&self) -> String {
        format!("xsltproc ({})", self.program.display())
    }

    fn transform(&self, request: &TransformRequest) -> Result<(), EngineError> {
        let tool = self.program.display().to_string();
        tracing::debug!(
            stylesheet = %request.stylesheet.display(),
            source = %request.source.display(),
            output = %request.output.display(),
            "running xsltproc"
        );

        let output = Command::new(&self.program)
            .args(Self::arguments(request))
            .output()
            .map_err(|e| EngineError::launch(&tool, e))?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            tracing::error!("xsltproc failed - stderr: {}", stderr);
            return Err(EngineError::Failed {
                tool,
                status: output.status.code(),
                stderr,
            });
        }
        if !stderr.is_empty() {
            // xsl:message output and recoverable warnings
            tracing::debug!("xsltproc stderr: {}", stderr);
        }
        Ok(())
    }
}
