//! Callback seam between a schema validator and whoever records its findings.

/// A single diagnostic reported by a schema validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub message: String,
    /// 1-based line, when the validator knows it.
    pub line: Option<u32>,
    /// 1-based column, when the validator knows it.
    pub column: Option<u32>,
}

impl ValidationIssue {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            column: None,
        }
    }

    pub fn at(mut self, line: u32, column: Option<u32>) -> Self {
        self.line = Some(line);
        self.column = column;
        self
    }
}

/// Receives validator diagnostics as they are found.
///
/// Validators keep going after `warning` and `error`; a `fatal_error` usually
/// means the document could not be read any further.
pub trait ValidationSink {
    fn warning(&mut self, issue: ValidationIssue);
    fn error(&mut self, issue: ValidationIssue);
    fn fatal_error(&mut self, issue: ValidationIssue);
}
