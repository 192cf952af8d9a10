use sxt_model::{Severity, ValidationIssue, ValidationSink};

use crate::run_log::RunLog;

/// Records validator diagnostics into a [`RunLog`] and tracks the verdict.
///
/// Warnings are logged but leave the document valid; any error or fatal
/// error marks it invalid.
pub struct ValidationBridge<'a> {
    log: &'a mut RunLog,
    valid: bool,
}

impl<'a> ValidationBridge<'a> {
    pub fn new(log: &'a mut RunLog) -> Self {
        Self { log, valid: true }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

impl ValidationSink for ValidationBridge<'_> {
    fn warning(&mut self, issue: ValidationIssue) {
        self.log.validation(Severity::Warning, issue);
    }

    fn error(&mut self, issue: ValidationIssue) {
        self.valid = false;
        self.log.validation(Severity::Error, issue);
    }

    fn fatal_error(&mut self, issue: ValidationIssue) {
        self.valid = false;
        self.log.validation(Severity::FatalError, issue);
    }
}

#[cfg(test)]
mod tests {
    use sxt_model::LogLevel;

    use super::*;
    use crate::run_log::TimestampSource;

    #[test]
    fn warnings_keep_document_valid() {
        let mut log = RunLog::new(None, LogLevel::Info, TimestampSource::WallClock);
        let mut bridge = ValidationBridge::new(&mut log);
        bridge.warning(ValidationIssue::new("deprecated attribute").at(3, None));
        assert!(bridge.is_valid());
        assert_eq!(log.count(Severity::Warning), 1);
    }

    #[test]
    fn errors_mark_document_invalid() {
        let mut log = RunLog::new(None, LogLevel::Info, TimestampSource::WallClock);
        let mut bridge = ValidationBridge::new(&mut log);
        bridge.error(ValidationIssue::new("missing element").at(10, Some(4)));
        bridge.warning(ValidationIssue::new("later warning"));
        assert!(!bridge.is_valid());

        let entry = &log.entries()[0];
        assert_eq!(entry.severity(), Severity::Error);
        assert!(entry.is_validation());
        assert_eq!(entry.position().and_then(|p| p.line), Some(10));
    }

    #[test]
    fn fatal_errors_mark_document_invalid() {
        let mut log = RunLog::new(None, LogLevel::Info, TimestampSource::WallClock);
        let mut bridge = ValidationBridge::new(&mut log);
        bridge.fatal_error(ValidationIssue::new("premature end of data"));
        assert!(!bridge.is_valid());
        assert_eq!(log.count(Severity::FatalError), 1);
    }
}
