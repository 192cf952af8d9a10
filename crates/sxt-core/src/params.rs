//! Parameters of one transformation run.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use sxt_model::{Direction, LogLevel};

use crate::config::load_config_params;
use crate::error::ConfigError;

pub const DEFAULT_OUTPUT_ENCODING: &str = "UTF-8";
pub const DEFAULT_TIMESTAMP_OVERRIDE: &str = "2008-05-24T16:31:25-04:00";
pub const DEFAULT_HEADER_COMMENT_TEXT: &str =
    "Produced from cube data by the Standard XML Transformer";

/// Requested log threshold as configured.
///
/// An unrecognized value is kept so the run can report it before falling
/// back to [`LogLevel::Warning`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLevelSetting {
    Valid(LogLevel),
    Invalid(String),
}

impl LogLevelSetting {
    pub fn parse(raw: &str) -> Self {
        LogLevel::from_str(raw).map_or_else(|_| Self::Invalid(raw.to_string()), Self::Valid)
    }

    /// Threshold actually applied: the configured level, or Warning if invalid.
    pub fn effective(&self) -> LogLevel {
        match self {
            Self::Valid(level) => *level,
            Self::Invalid(_) => LogLevel::Warning,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

impl Default for LogLevelSetting {
    fn default() -> Self {
        Self::Valid(LogLevel::default())
    }
}

impl fmt::Display for LogLevelSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid(level) => write!(f, "{level}"),
            Self::Invalid(raw) => write!(f, "{raw}"),
        }
    }
}

/// Flat configuration of one run.
///
/// Which of `cube_xml_path` and `standard_xml_path` is read and which is
/// written depends on `direction`; see [`input_path`](Self::input_path) and
/// [`output_path`](Self::output_path). Unset paths are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionParams {
    pub direction: Direction,
    pub cube_xml_path: Option<PathBuf>,
    pub standard_xml_path: Option<PathBuf>,
    pub standard_name: String,
    pub standard_version: String,
    /// Descriptor file listing the available transforms.
    pub registry_path: Option<PathBuf>,
    pub schema_base_path: Option<PathBuf>,
    pub xsl_base_path: Option<PathBuf>,
    /// `None` writes the log to standard output.
    pub log_file_path: Option<PathBuf>,
    pub log_level: LogLevelSetting,
    pub header_comment_text: String,
    pub output_encoding: String,
    pub creating_display_stylesheet: bool,
    pub custom_stylesheet_path: Option<PathBuf>,
    pub output_stylesheet_name: Option<String>,
    pub validating_standard_xml: bool,
    pub validating_xml_only: bool,
    pub fail_on_validation_error: bool,
    pub overriding_creation_date: bool,
    pub creation_date_override_value: String,
    pub overriding_log_timestamp_date: bool,
    pub log_timestamp_date_override_value: String,
    pub creating_folders_for_output: bool,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            direction: Direction::Export,
            cube_xml_path: None,
            standard_xml_path: None,
            standard_name: String::new(),
            standard_version: String::new(),
            registry_path: None,
            schema_base_path: None,
            xsl_base_path: None,
            log_file_path: None,
            log_level: LogLevelSetting::default(),
            header_comment_text: DEFAULT_HEADER_COMMENT_TEXT.to_string(),
            output_encoding: DEFAULT_OUTPUT_ENCODING.to_string(),
            creating_display_stylesheet: false,
            custom_stylesheet_path: None,
            output_stylesheet_name: None,
            validating_standard_xml: true,
            validating_xml_only: false,
            fail_on_validation_error: false,
            overriding_creation_date: false,
            creation_date_override_value: DEFAULT_TIMESTAMP_OVERRIDE.to_string(),
            overriding_log_timestamp_date: false,
            log_timestamp_date_override_value: DEFAULT_TIMESTAMP_OVERRIDE.to_string(),
            creating_folders_for_output: true,
        }
    }
}

impl ExecutionParams {
    /// Defaults overlaid with the `Param` entries of a configuration file.
    pub fn from_config_file(path: &Path) -> Result<Self, ConfigError> {
        let mut params = Self::default();
        for (name, value) in load_config_params(path)? {
            params.apply(&name, &value)?;
        }
        tracing::debug!(path = %path.display(), direction = %params.direction, "loaded run configuration");
        Ok(params)
    }

    /// Like [`from_config_file`](Self::from_config_file), then resolve
    /// relative paths against `workspace_root`.
    pub fn from_config_file_in(path: &Path, workspace_root: &Path) -> Result<Self, ConfigError> {
        let mut params = Self::from_config_file(path)?;
        params.adjust_paths(workspace_root);
        Ok(params)
    }

    /// Set one parameter by its configuration name. Unknown names are ignored.
    pub fn apply(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        match name {
            "importOrExport" => {
                self.direction = value.parse().map_err(|message| ConfigError::InvalidValue {
                    name: name.to_string(),
                    value: value.to_string(),
                    message,
                })?;
            }
            "cubeXMLPath" | "sasXMLPath" => self.cube_xml_path = path_value(value),
            "standardXMLPath" => self.standard_xml_path = path_value(value),
            "standardName" => self.standard_name = value.trim().to_string(),
            "standardVersion" => self.standard_version = value.trim().to_string(),
            "availableTransformsFilePath" => self.registry_path = path_value(value),
            "schemaBasePath" => self.schema_base_path = path_value(value),
            "xslBasePath" => self.xsl_base_path = path_value(value),
            "logFilePath" => self.log_file_path = path_value(value),
            "logLevel" => self.log_level = LogLevelSetting::parse(value),
            "headerCommentText" => self.header_comment_text = value.to_string(),
            "outputEncoding" => self.output_encoding = value.to_string(),
            "creatingDisplayStylesheet" => self.creating_display_stylesheet = flag(value),
            "customStylesheetPath" => self.custom_stylesheet_path = path_value(value),
            "outputStylesheetName" => {
                self.output_stylesheet_name = Some(value.trim())
                    .filter(|v| !v.is_empty())
                    .map(str::to_string);
            }
            "validatingStandardXML" => self.validating_standard_xml = flag(value),
            "validatingXMLOnly" => self.validating_xml_only = flag(value),
            "failOnValidationError" => self.fail_on_validation_error = flag(value),
            "overridingCreationDate" => self.overriding_creation_date = flag(value),
            "creationDateOverrideValue" => self.creation_date_override_value = value.to_string(),
            "overridingLogTimestampDate" => self.overriding_log_timestamp_date = flag(value),
            "logTimestampDateOverrideValue" => {
                self.log_timestamp_date_override_value = value.to_string();
            }
            "creatingFoldersForOutput" => self.creating_folders_for_output = flag(value),
            _ => tracing::trace!(name, "ignoring unknown configuration parameter"),
        }
        Ok(())
    }

    /// Resolve path fields against `workspace_root`.
    ///
    /// Nothing changes unless the root is an existing directory. Absolute
    /// paths are left as they are. Returns whether the paths were adjusted.
    pub fn adjust_paths(&mut self, workspace_root: &Path) -> bool {
        if !workspace_root.is_dir() {
            tracing::debug!(root = %workspace_root.display(), "workspace root is not a directory; paths left as configured");
            return false;
        }
        for field in [
            &mut self.cube_xml_path,
            &mut self.standard_xml_path,
            &mut self.xsl_base_path,
            &mut self.schema_base_path,
            &mut self.custom_stylesheet_path,
            &mut self.log_file_path,
            &mut self.registry_path,
        ] {
            if let Some(path) = field.as_mut() {
                *path = workspace_root.join(&*path);
            }
        }
        true
    }

    /// Document the transform reads.
    pub fn input_path(&self) -> Option<&Path> {
        match self.direction {
            Direction::Import => self.standard_xml_path.as_deref(),
            Direction::Export => self.cube_xml_path.as_deref(),
        }
    }

    /// Document the transform writes.
    pub fn output_path(&self) -> Option<&Path> {
        match self.direction {
            Direction::Import => self.cube_xml_path.as_deref(),
            Direction::Export => self.standard_xml_path.as_deref(),
        }
    }

    /// Header comment text, XML-escaped for use as a stylesheet parameter.
    pub fn escaped_header_comment_text(&self) -> String {
        quick_xml::escape::escape(self.header_comment_text.as_str()).into_owned()
    }

    /// Labelled values recorded at the start of every run log.
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Import Or Export", self.direction.to_string()),
            ("Standards XML Path", display_path(self.standard_xml_path.as_deref())),
            ("Cube XML Path", display_path(self.cube_xml_path.as_deref())),
            ("Fail on Validation Error", self.fail_on_validation_error.to_string()),
            ("Standard Name", self.standard_name.clone()),
            ("Standard Version", self.standard_version.clone()),
            ("Available Transforms File", display_path(self.registry_path.as_deref())),
            ("Schema Repository Location", display_path(self.schema_base_path.as_deref())),
            ("XSL Repository Location", display_path(self.xsl_base_path.as_deref())),
            ("Output Encoding", self.output_encoding.clone()),
            ("Log File Location", display_path(self.log_file_path.as_deref())),
            ("Log Level", self.log_level.to_string()),
            ("Header Comment Text", self.escaped_header_comment_text()),
            ("Is Validating XML", self.validating_standard_xml.to_string()),
            ("Validating XML Only", self.validating_xml_only.to_string()),
            ("Creating Display Stylesheet", self.creating_display_stylesheet.to_string()),
            ("Custom Stylesheet", display_path(self.custom_stylesheet_path.as_deref())),
            (
                "Custom Stylesheet Output Shortname",
                self.output_stylesheet_name.clone().unwrap_or_default(),
            ),
            ("Creating Output Folders", self.creating_folders_for_output.to_string()),
        ]
    }
}

fn flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

fn path_value(value: &str) -> Option<PathBuf> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}

fn display_path(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let params = ExecutionParams::default();
        assert_eq!(params.direction, Direction::Export);
        assert!(params.validating_standard_xml);
        assert!(!params.fail_on_validation_error);
        assert!(params.creating_folders_for_output);
        assert_eq!(params.output_encoding, "UTF-8");
        assert_eq!(params.log_level.effective(), LogLevel::Warning);
        assert_eq!(params.creation_date_override_value, "2008-05-24T16:31:25-04:00");
    }

    #[test]
    fn flags_are_true_only_for_true() {
        let mut params = ExecutionParams::default();
        params.apply("failOnValidationError", "TRUE").unwrap();
        assert!(params.fail_on_validation_error);
        params.apply("validatingStandardXML", "yes").unwrap();
        assert!(!params.validating_standard_xml);
    }

    #[test]
    fn direction_swaps_path_roles() {
        let mut params = ExecutionParams::default();
        params.apply("cubeXMLPath", "cube.xml").unwrap();
        params.apply("standardXMLPath", "odm.xml").unwrap();
        assert_eq!(params.input_path(), Some(Path::new("cube.xml")));
        assert_eq!(params.output_path(), Some(Path::new("odm.xml")));

        params.apply("importOrExport", "import").unwrap();
        assert_eq!(params.input_path(), Some(Path::new("odm.xml")));
        assert_eq!(params.output_path(), Some(Path::new("cube.xml")));
    }

    #[test]
    fn unknown_direction_is_rejected() {
        let mut params = ExecutionParams::default();
        let err = params.apply("importOrExport", "SIDEWAYS").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn invalid_log_level_is_kept() {
        let mut params = ExecutionParams::default();
        params.apply("logLevel", "9").unwrap();
        assert_eq!(params.log_level, LogLevelSetting::Invalid("9".to_string()));
        assert_eq!(params.log_level.effective(), LogLevel::Warning);
        params.apply("logLevel", "0").unwrap();
        assert_eq!(params.log_level, LogLevelSetting::Valid(LogLevel::Info));
    }

    #[test]
    fn empty_paths_are_unset_and_names_trimmed() {
        let mut params = ExecutionParams::default();
        params.apply("logFilePath", "  ").unwrap();
        params.apply("standardName", " ODM ").unwrap();
        params.apply("outputStylesheetName", "").unwrap();
        assert!(params.log_file_path.is_none());
        assert_eq!(params.standard_name, "ODM");
        assert!(params.output_stylesheet_name.is_none());
    }

    #[test]
    fn header_text_is_escaped() {
        let mut params = ExecutionParams::default();
        params.apply("headerCommentText", "a < b & \"c\"").unwrap();
        assert_eq!(params.escaped_header_comment_text(), "a &lt; b &amp; &quot;c&quot;");
    }
}
