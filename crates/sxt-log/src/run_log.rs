use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Local};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use sxt_model::{LogLevel, Origin, Scope, Severity, ValidationIssue, format_schema_datetime};

use crate::entry::LogEntry;
use crate::error::LogError;
use crate::system::SystemMetadata;

const ROOT_ELEMENT: &str = "TABLE";
const ENTRY_ELEMENT: &str = "XMLTransformLog";
const UNKNOWN_POSITION: &str = "-1";

/// Where entry timestamps come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampSource {
    /// Local wall-clock time at entry creation.
    #[default]
    WallClock,
    /// The same instant for every entry, for reproducible log documents.
    Fixed(DateTime<FixedOffset>),
}

impl TimestampSource {
    pub fn now(&self) -> DateTime<FixedOffset> {
        match self {
            TimestampSource::WallClock => Local::now().fixed_offset(),
            TimestampSource::Fixed(value) => *value,
        }
    }
}

/// Append-only log of one run.
#[derive(Debug, Clone)]
pub struct RunLog {
    entries: Vec<LogEntry>,
    level: LogLevel,
    path: Option<PathBuf>,
    timestamps: TimestampSource,
}

impl RunLog {
    /// `path` of `None` sends the document to standard output.
    pub fn new(path: Option<PathBuf>, level: LogLevel, timestamps: TimestampSource) -> Self {
        Self {
            entries: Vec::new(),
            level,
            path,
            timestamps,
        }
    }

    /// Append an entry. Order of insertion is preserved regardless of severity.
    pub fn add(&mut self, entry: LogEntry) {
        mirror_to_tracing(&entry);
        self.entries.push(entry);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.transformer_entry(Severity::Info, message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.transformer_entry(Severity::Warning, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.transformer_entry(Severity::Error, message.into());
    }

    pub fn fatal_error(&mut self, message: impl Into<String>) {
        self.transformer_entry(Severity::FatalError, message.into());
    }

    /// Record a `name: value` pair as an Info entry.
    pub fn parameter(&mut self, name: &str, value: &str, scope: Scope) {
        let entry = LogEntry::new(
            Severity::Info,
            Origin::TransformParameter,
            scope,
            format!("{name}: {value}"),
            self.timestamps.now(),
        );
        self.add(entry);
    }

    pub fn validation(&mut self, severity: Severity, issue: ValidationIssue) {
        let entry = LogEntry::validation(severity, issue, self.timestamps.now());
        self.add(entry);
    }

    /// Record every property of `metadata` as a system-scope parameter.
    pub fn system_metadata(&mut self, metadata: &dyn SystemMetadata) {
        for (name, value) in metadata.properties() {
            self.parameter(&name, &value, Scope::System);
        }
    }

    fn transformer_entry(&mut self, severity: Severity, message: String) {
        let entry = LogEntry::new(
            severity,
            Origin::Transformer,
            Scope::User,
            message,
            self.timestamps.now(),
        );
        self.add(entry);
    }

    /// Every entry, in insertion order, ignoring the threshold.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries that pass the threshold, in insertion order.
    pub fn retained(&self) -> impl Iterator<Item = &LogEntry> + '_ {
        let level = self.level;
        self.entries.iter().filter(move |e| level.admits(e.severity()))
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries
            .iter()
            .filter(|e| e.severity() == severity)
            .count()
    }

    /// True if any Error or FatalError entry was recorded.
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|e| e.severity().is_error())
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: Option<PathBuf>) {
        self.path = path;
    }

    pub fn timestamps(&self) -> TimestampSource {
        self.timestamps
    }

    /// Build the log document from the retained entries.
    pub fn serialize(&self) -> Result<String, LogError> {
        let mut xml = Writer::new_with_indent(Vec::new(), b' ', 2);
        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(LogError::Xml)?;
        xml.write_event(Event::Start(BytesStart::new(ROOT_ELEMENT)))
            .map_err(LogError::Xml)?;
        for entry in self.retained() {
            write_entry(&mut xml, entry)?;
        }
        xml.write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))
            .map_err(LogError::Xml)?;
        Ok(String::from_utf8(xml.into_inner())?)
    }

    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        let document = self.serialize().map_err(io::Error::other)?;
        out.write_all(document.as_bytes())?;
        out.write_all(b"\n")?;
        out.flush()
    }

    /// Write to the configured path, or to standard output when none is set.
    pub fn write(&self) -> Result<(), LogError> {
        match &self.path {
            Some(path) => {
                let file = File::create(path).map_err(|source| LogError::Io {
                    path: path.clone(),
                    source,
                })?;
                self.write_to(BufWriter::new(file))
                    .map_err(|source| LogError::Io {
                        path: path.clone(),
                        source,
                    })
            }
            None => {
                let stdout = io::stdout();
                self.write_to(stdout.lock()).map_err(LogError::Stdout)
            }
        }
    }
}

fn write_entry<W: Write>(xml: &mut Writer<W>, entry: &LogEntry) -> Result<(), LogError> {
    xml.write_event(Event::Start(BytesStart::new(ENTRY_ELEMENT)))
        .map_err(LogError::Xml)?;
    write_text_element(xml, "Timestamp", &format_schema_datetime(&entry.timestamp()))?;
    write_text_element(xml, "Scope", entry.scope().as_str())?;
    write_text_element(xml, "Origin", entry.origin().as_str())?;
    write_text_element(xml, "Severity", entry.severity().as_str())?;
    write_text_element(xml, "Message", entry.message())?;
    if let Some(position) = entry.position() {
        write_text_element(xml, "LineNumber", &position_text(position.line))?;
        write_text_element(xml, "ColumnNumber", &position_text(position.column))?;
    }
    xml.write_event(Event::End(BytesEnd::new(ENTRY_ELEMENT)))
        .map_err(LogError::Xml)?;
    Ok(())
}

fn write_text_element<W: Write>(
    xml: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), LogError> {
    xml.write_event(Event::Start(BytesStart::new(name)))
        .map_err(LogError::Xml)?;
    xml.write_event(Event::Text(BytesText::new(text)))
        .map_err(LogError::Xml)?;
    xml.write_event(Event::End(BytesEnd::new(name)))
        .map_err(LogError::Xml)?;
    Ok(())
}

fn position_text(value: Option<u32>) -> String {
    value.map_or_else(|| UNKNOWN_POSITION.to_string(), |v| v.to_string())
}

fn mirror_to_tracing(entry: &LogEntry) {
    match entry.severity() {
        Severity::Info => tracing::debug!(origin = %entry.origin(), "{}", entry.message()),
        Severity::Warning => tracing::warn!(origin = %entry.origin(), "{}", entry.message()),
        Severity::Error | Severity::FatalError => {
            tracing::error!(
                origin = %entry.origin(),
                severity = %entry.severity(),
                "{}",
                entry.message()
            )
        }
    }
}
