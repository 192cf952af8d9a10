use chrono::{DateTime, FixedOffset};
use sxt_model::{Origin, Scope, Severity, ValidationIssue};

/// Where in a validated document a diagnostic points.
///
/// Either coordinate may be unknown; unknown values are written as `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourcePosition {
    pub line: Option<u32>,
    pub column: Option<u32>,
}

/// One immutable log record.
///
/// Entries produced by schema validation carry a [`SourcePosition`]; all
/// others leave it empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    severity: Severity,
    origin: Origin,
    scope: Scope,
    message: String,
    timestamp: DateTime<FixedOffset>,
    position: Option<SourcePosition>,
}

impl LogEntry {
    pub fn new(
        severity: Severity,
        origin: Origin,
        scope: Scope,
        message: impl Into<String>,
        timestamp: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            severity,
            origin,
            scope,
            message: message.into(),
            timestamp,
            position: None,
        }
    }

    /// A validation diagnostic, always with [`Origin::XmlValidation`] and user scope.
    pub fn validation(
        severity: Severity,
        issue: ValidationIssue,
        timestamp: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            severity,
            origin: Origin::XmlValidation,
            scope: Scope::User,
            message: issue.message,
            timestamp,
            position: Some(SourcePosition {
                line: issue.line,
                column: issue.column,
            }),
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    pub fn position(&self) -> Option<SourcePosition> {
        self.position
    }

    pub fn is_validation(&self) -> bool {
        self.position.is_some()
    }
}
