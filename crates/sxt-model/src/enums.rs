//! Type-safe enumerations for transformation runs.
//!
//! The string forms returned by `as_str` are the ones written into the run
//! log document and read back from configuration files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which way a run converts data.
///
/// - **Import**: standard XML in, cube XML out
/// - **Export**: cube XML in, standard XML out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Standard XML to cube XML.
    Import,
    /// Cube XML to standard XML.
    #[default]
    Export,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Import => "IMPORT",
            Direction::Export => "EXPORT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "IMPORT" => Ok(Direction::Import),
            "EXPORT" => Ok(Direction::Export),
            _ => Err(format!("Unknown transform direction: {s}")),
        }
    }
}

/// Severity of a single log entry.
///
/// Ranks are ordered Info(0) < Warning(1) < Error(2) < FatalError(3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
    FatalError,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::FatalError => "FATAL ERROR",
        }
    }

    pub const fn rank(&self) -> u8 {
        match self {
            Severity::Info => 0,
            Severity::Warning => 1,
            Severity::Error => 2,
            Severity::FatalError => 3,
        }
    }

    /// Returns true for Error and FatalError.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error | Severity::FatalError)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INFO" => Ok(Severity::Info),
            "WARNING" => Ok(Severity::Warning),
            "ERROR" => Ok(Severity::Error),
            "FATAL ERROR" | "FATALERROR" | "FATAL_ERROR" => Ok(Severity::FatalError),
            _ => Err(format!("Unknown severity: {s}")),
        }
    }
}

/// Minimum severity a run log retains when it is serialized.
///
/// `None` (rank 4) sits above every severity, so nothing is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LogLevel {
    Info,
    #[default]
    Warning,
    Error,
    FatalError,
    None,
}

impl LogLevel {
    /// Highest valid rank.
    pub const MAX_RANK: u8 = 4;

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::FatalError => "FATAL ERROR",
            LogLevel::None => "NONE",
        }
    }

    pub const fn rank(&self) -> u8 {
        match self {
            LogLevel::Info => 0,
            LogLevel::Warning => 1,
            LogLevel::Error => 2,
            LogLevel::FatalError => 3,
            LogLevel::None => 4,
        }
    }

    pub fn from_rank(rank: i64) -> Option<Self> {
        match rank {
            0 => Some(LogLevel::Info),
            1 => Some(LogLevel::Warning),
            2 => Some(LogLevel::Error),
            3 => Some(LogLevel::FatalError),
            4 => Some(LogLevel::None),
            _ => None,
        }
    }

    /// Entries are kept when their rank is at or above the threshold rank.
    pub fn admits(&self, severity: Severity) -> bool {
        severity.rank() >= self.rank()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    /// Accepts severity names (case-insensitive), `NONE`, or a numeric rank.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(rank) = trimmed.parse::<i64>() {
            return LogLevel::from_rank(rank).ok_or_else(|| format!("Log level out of range: {s}"));
        }
        if trimmed.eq_ignore_ascii_case("NONE") {
            return Ok(LogLevel::None);
        }
        let severity = Severity::from_str(trimmed)?;
        Ok(match severity {
            Severity::Info => LogLevel::Info,
            Severity::Warning => LogLevel::Warning,
            Severity::Error => LogLevel::Error,
            Severity::FatalError => LogLevel::FatalError,
        })
    }
}

/// Audience of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Scope {
    #[default]
    User,
    System,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::User => "USER",
            Scope::System => "SYSTEM",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Component that produced a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    /// Schema validation diagnostics.
    XmlValidation,
    /// The orchestrator itself.
    Transformer,
    /// Run parameter and system metadata dump.
    TransformParameter,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::XmlValidation => "XML VALIDATION",
            Origin::Transformer => "XML TRANSFORMER",
            Origin::TransformParameter => "XML TRANSFORMER PARAMETER",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ranks_are_ordered() {
        assert!(Severity::Info.rank() < Severity::Warning.rank());
        assert!(Severity::Warning.rank() < Severity::Error.rank());
        assert!(Severity::Error.rank() < Severity::FatalError.rank());
    }

    #[test]
    fn threshold_keeps_entries_at_or_above() {
        assert!(LogLevel::Warning.admits(Severity::Warning));
        assert!(LogLevel::Warning.admits(Severity::FatalError));
        assert!(!LogLevel::Warning.admits(Severity::Info));
        assert!(LogLevel::Info.admits(Severity::Info));
        assert!(!LogLevel::None.admits(Severity::FatalError));
    }

    #[test]
    fn log_level_parses_names_and_ranks() {
        assert_eq!("info".parse::<LogLevel>(), Ok(LogLevel::Info));
        assert_eq!("Fatal Error".parse::<LogLevel>(), Ok(LogLevel::FatalError));
        assert_eq!("none".parse::<LogLevel>(), Ok(LogLevel::None));
        assert_eq!("2".parse::<LogLevel>(), Ok(LogLevel::Error));
        assert!("7".parse::<LogLevel>().is_err());
        assert!("-1".parse::<LogLevel>().is_err());
        assert!("chatty".parse::<LogLevel>().is_err());
    }

    #[test]
    fn direction_parse_is_case_insensitive() {
        assert_eq!("import".parse::<Direction>(), Ok(Direction::Import));
        assert_eq!(" EXPORT ".parse::<Direction>(), Ok(Direction::Export));
        assert!("sideways".parse::<Direction>().is_err());
        assert_eq!(Direction::default(), Direction::Export);
    }

    #[test]
    fn display_strings_match_log_vocabulary() {
        assert_eq!(Severity::FatalError.to_string(), "FATAL ERROR");
        assert_eq!(Origin::TransformParameter.to_string(), "XML TRANSFORMER PARAMETER");
        assert_eq!(Scope::System.to_string(), "SYSTEM");
    }
}
