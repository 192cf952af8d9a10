use std::path::{Path, PathBuf};
use std::process::Command;

use sxt_model::{ValidationIssue, ValidationSink};

use crate::error::EngineError;

/// An XML Schema validator.
///
/// Implementations report each finding to `sink` and keep going past
/// warnings and errors. Whether the document is valid is for the sink to
/// decide; `Err` means the validator itself could not do its job.
pub trait SchemaValidator {
    /// Identity recorded in the run log.
    fn name(&self) -> String;

    fn validate(
        &self,
        xml: &Path,
        schema: &Path,
        sink: &mut dyn ValidationSink,
    ) -> Result<(), EngineError>;
}

/// Runs `xmllint --noout --schema`.
#[derive(Debug, Clone)]
pub struct Xmllint {
    program: PathBuf,
}

impl Default for Xmllint {
    fn default() -> Self {
        Self {
            program: PathBuf::from("xmllint"),
        }
    }
}

/// xmllint exit codes that describe the document rather than the tool.
const VERDICT_STATUSES: [i32; 4] = [0, 1, 3, 4];

impl Xmllint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl SchemaValidator for Xmllint {
    fn name(&self) -> String {
        format!("xmllint ({})", self.program.display())
    }

    fn validate(
        &self,
        xml: &Path,
        schema: &Path,
        sink: &mut dyn ValidationSink,
    ) -> Result<(), EngineError> {
        let tool = self.program.display().to_string();
        let output = Command::new(&self.program)
            .arg("--noout")
            .arg("--schema")
            .arg(schema)
            .arg(xml)
            .output()
            .map_err(|e| EngineError::launch(&tool, e))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        let status = output.status.code();
        if !status.is_some_and(|code| VERDICT_STATUSES.contains(&code)) {
            tracing::error!("xmllint failed - stderr: {}", stderr);
            return Err(EngineError::Failed {
                tool,
                status,
                stderr: stderr.trim().to_string(),
            });
        }

        let mut reported_error = false;
        for (kind, issue) in parse_xmllint_diagnostics(&stderr) {
            match kind {
                DiagnosticKind::Warning => sink.warning(issue),
                DiagnosticKind::Error => {
                    reported_error = true;
                    sink.error(issue);
                }
                DiagnosticKind::Fatal => {
                    reported_error = true;
                    sink.fatal_error(issue);
                }
            }
        }
        if status != Some(0) && !reported_error {
            sink.error(ValidationIssue::new(format!(
                "{} fails to validate against {}",
                xml.display(),
                schema.display()
            )));
        }
        Ok(())
    }
}

/// How a validator classified a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Warning,
    Error,
    Fatal,
}

/// Extract diagnostics from xmllint's stderr.
///
/// Recognized lines look like
/// `doc.xml:12: element Foo: Schemas validity error : Element 'Foo': ...`
/// or `doc.xml:5: parser error : Opening and ending tag mismatch ...`.
/// Parser errors are fatal. Source excerpts, caret markers and the final
/// `validates` / `fails to validate` summary are skipped. xmllint does not
/// report columns.
pub fn parse_xmllint_diagnostics(stderr: &str) -> Vec<(DiagnosticKind, ValidationIssue)> {
    stderr.lines().filter_map(parse_diagnostic_line).collect()
}

fn parse_diagnostic_line(line: &str) -> Option<(DiagnosticKind, ValidationIssue)> {
    let (head, message) = line.split_once(" : ")?;
    let (line_number, kind_text) = split_location(head)?;

    let kind_text = kind_text.trim_end();
    let kind = if kind_text.ends_with("warning") {
        DiagnosticKind::Warning
    } else if kind_text.ends_with("parser error") {
        DiagnosticKind::Fatal
    } else if kind_text.ends_with("error") {
        DiagnosticKind::Error
    } else {
        return None;
    };

    Some((
        kind,
        ValidationIssue::new(message.trim()).at(line_number, None),
    ))
}

/// Split `<file>:<line>: <rest>` at the first `:<digits>: ` after the file name.
fn split_location(head: &str) -> Option<(u32, &str)> {
    let bytes = head.as_bytes();
    let mut search_from = 0;
    while let Some(offset) = head[search_from..].find(':') {
        let colon = search_from + offset;
        let digits_start = colon + 1;
        let digits_len = bytes[digits_start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        let digits_end = digits_start + digits_len;
        if digits_len > 0 && head[digits_end..].starts_with(": ") {
            let line_number = head[digits_start..digits_end].parse().ok()?;
            return Some((line_number, &head[digits_end + 2..]));
        }
        search_from = digits_start;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_schema_validity_errors() {
        let stderr = "\
out/odm.xml:12: element ItemData: Schemas validity error : Element '{http://www.cdisc.org/ns/odm/v1.3}ItemData': This element is not expected.
out/odm.xml:40: element Study: Schemas validity warning : Skipping import of schema
out/odm.xml fails to validate
";
        let diagnostics = parse_xmllint_diagnostics(stderr);
        assert_eq!(diagnostics.len(), 2);

        let (kind, issue) = &diagnostics[0];
        assert_eq!(*kind, DiagnosticKind::Error);
        assert_eq!(issue.line, Some(12));
        assert_eq!(issue.column, None);
        assert!(issue.message.ends_with("This element is not expected."));

        assert_eq!(diagnostics[1].0, DiagnosticKind::Warning);
        assert_eq!(diagnostics[1].1.line, Some(40));
    }

    #[test]
    fn parser_errors_are_fatal_and_excerpts_skipped() {
        let stderr = "\
in.xml:5: parser error : Opening and ending tag mismatch: a line 1 and b
</b>
    ^
";
        let diagnostics = parse_xmllint_diagnostics(stderr);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].0, DiagnosticKind::Fatal);
        assert_eq!(diagnostics[0].1.line, Some(5));
        assert_eq!(
            diagnostics[0].1.message,
            "Opening and ending tag mismatch: a line 1 and b"
        );
    }

    #[test]
    fn windows_drive_letters_do_not_confuse_location() {
        let diagnostics = parse_xmllint_diagnostics(
            r"C:\data\odm.xml:7: element A: Schemas validity error : Missing child element(s).",
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].1.line, Some(7));
    }

    #[test]
    fn summary_lines_are_ignored() {
        assert!(parse_xmllint_diagnostics("odm.xml validates\n").is_empty());
    }

    #[test]
    fn missing_program_is_a_launch_error() {
        struct Discard;
        impl ValidationSink for Discard {
            fn warning(&mut self, _: ValidationIssue) {}
            fn error(&mut self, _: ValidationIssue) {}
            fn fatal_error(&mut self, _: ValidationIssue) {}
        }

        let validator = Xmllint::with_program("/nonexistent/bin/xmllint-sxt-test");
        let result = validator.validate(Path::new("a.xml"), Path::new("a.xsd"), &mut Discard);
        assert!(matches!(result, Err(EngineError::Launch { .. })));
    }
}
