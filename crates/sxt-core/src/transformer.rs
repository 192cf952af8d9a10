//! Run orchestration shared by the import and export pipelines.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use sxt_engine::{SchemaValidator, TransformRequest, XsltEngine, XsltProc, Xmllint};
use sxt_log::{
    LogError, ProcessMetadata, RunLog, SystemMetadata, TimestampSource, ValidationBridge,
};
use sxt_model::{
    Direction, LogLevel, Scope, Severity, TransformDescriptor, format_schema_datetime,
    parse_schema_datetime,
};
use sxt_standards::{StandardsError, TransformNotFound, TransformRegistry};

use crate::params::{ExecutionParams, LogLevelSetting};
use crate::state::RunState;
use crate::stylesheet::absolute_display;
use crate::{exporter, importer};

const PARAM_CREATION_TIMESTAMP: &str = "timestamp.creation";
const PARAM_HEADER_COMMENT: &str = "header.comment.text";
const PARAM_OUTPUT_ENCODING: &str = "output.encoding";

/// External collaborators of a run.
pub struct Services {
    pub xslt: Box<dyn XsltEngine>,
    pub validator: Box<dyn SchemaValidator>,
    pub system: Box<dyn SystemMetadata>,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            xslt: Box::new(XsltProc::new()),
            validator: Box::new(Xmllint::new()),
            system: Box::new(ProcessMetadata),
        }
    }
}

/// Drives one import or export run.
///
/// The registry is loaded on construction. A load failure is kept and
/// reported in the run log; every lookup then fails with
/// [`TransformNotFound`].
pub struct Transformer {
    params: ExecutionParams,
    registry: TransformRegistry,
    registry_error: Option<StandardsError>,
    services: Services,
}

impl Transformer {
    /// Transformer using `xsltproc`, `xmllint` and the process environment.
    pub fn new(params: ExecutionParams) -> Self {
        Self::with_services(params, Services::default())
    }

    pub fn with_services(params: ExecutionParams, services: Services) -> Self {
        let (registry, registry_error) = match params.registry_path.as_deref() {
            Some(path) => match TransformRegistry::load(path) {
                Ok(registry) => (registry, None),
                Err(error) => {
                    tracing::warn!("failed to load transform registry: {error}");
                    (TransformRegistry::new(), Some(error))
                }
            },
            None => (TransformRegistry::new(), None),
        };
        Self {
            params,
            registry,
            registry_error,
            services,
        }
    }

    pub fn direction(&self) -> Direction {
        self.params.direction
    }

    pub fn params(&self) -> &ExecutionParams {
        &self.params
    }

    pub fn registry(&self) -> &TransformRegistry {
        &self.registry
    }

    /// Run to completion and write the log.
    ///
    /// Every failure except an unknown standard ends up in the log; the log
    /// is written before `TransformNotFound` is returned.
    pub fn exec(self) -> Result<RunReport, TransformNotFound> {
        let Transformer {
            params,
            registry,
            registry_error,
            services,
        } = self;
        let direction = params.direction;
        tracing::info!(
            %direction,
            standard = %params.standard_name,
            version = %params.standard_version,
            "starting run"
        );

        let mut run = Run::start(params, &registry, &services);
        if let Some(error) = registry_error {
            run.log
                .error(format!("Failed to load the available transforms: {error}"));
        }

        let outcome = match direction {
            Direction::Import => importer::run(&mut run),
            Direction::Export => exporter::run(&mut run),
        };
        run.write_log();

        match outcome {
            Ok(()) => {
                let report = run.into_report(direction);
                tracing::info!(
                    state = %report.final_state,
                    errors = report.error_count(),
                    "run finished"
                );
                Ok(report)
            }
            Err(not_found) => {
                tracing::error!("{not_found}");
                Err(not_found)
            }
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct RunReport {
    pub direction: Direction,
    pub final_state: RunState,
    /// Every state entered, in order.
    pub states: Vec<RunState>,
    pub params_valid: bool,
    /// The transform ran and the engine reported success.
    pub transformed: bool,
    /// Schema verdict, when validation ran to completion.
    pub validation: Option<bool>,
    /// Display stylesheet written next to the output, if any.
    pub stylesheet: Option<PathBuf>,
    /// Parameters after in-run corrections.
    pub params: ExecutionParams,
    pub log: RunLog,
    /// Set when the log document could not be written.
    pub log_error: Option<LogError>,
}

impl RunReport {
    pub fn error_count(&self) -> usize {
        self.log.count(Severity::Error) + self.log.count(Severity::FatalError)
    }

    pub fn has_errors(&self) -> bool {
        self.log.has_errors()
    }

    pub fn visited(&self, state: RunState) -> bool {
        self.states.contains(&state)
    }
}

/// Mutable state of a run in progress.
pub(crate) struct Run<'a> {
    pub(crate) params: ExecutionParams,
    pub(crate) log: RunLog,
    registry: &'a TransformRegistry,
    services: &'a Services,
    states: Vec<RunState>,
    pub(crate) params_valid: bool,
    pub(crate) transformed: bool,
    pub(crate) validation: Option<bool>,
    pub(crate) stylesheet: Option<PathBuf>,
    log_error: Option<LogError>,
}

impl<'a> Run<'a> {
    fn start(
        params: ExecutionParams,
        registry: &'a TransformRegistry,
        services: &'a Services,
    ) -> Self {
        let (timestamps, timestamp_error) = if params.overriding_log_timestamp_date {
            match parse_schema_datetime(&params.log_timestamp_date_override_value) {
                Ok(value) => (TimestampSource::Fixed(value), None),
                Err(error) => (TimestampSource::WallClock, Some(error)),
            }
        } else {
            (TimestampSource::WallClock, None)
        };

        let mut log = RunLog::new(
            params.log_file_path.clone(),
            params.log_level.effective(),
            timestamps,
        );
        if let Some(error) = timestamp_error {
            log.error(format!(
                "Invalid log timestamp override: {error}. Using the current time instead."
            ));
        }

        Self {
            params,
            log,
            registry,
            services,
            states: vec![RunState::Created, RunState::LogInitialized],
            params_valid: false,
            transformed: false,
            validation: None,
            stylesheet: None,
            log_error: None,
        }
    }

    pub(crate) fn enter(&mut self, state: RunState) {
        tracing::trace!(%state, "entering state");
        self.states.push(state);
    }

    /// Create the log and output folders.
    ///
    /// Returns false only when the output folder is missing and could not be
    /// created. A log folder that cannot be created sends the log to
    /// standard output instead.
    pub(crate) fn ensure_folders(&mut self) -> bool {
        if !self.params.creating_folders_for_output {
            self.enter(RunState::FoldersEnsured);
            return true;
        }

        if let Some(folder) = self.params.log_file_path.as_deref().and_then(parent_folder) {
            if !folder.is_dir() && fs::create_dir_all(&folder).is_err() {
                self.log.warning(format!(
                    "Folder '{}' does not exist and could not be created. The log will be redirected to standard output.",
                    absolute_display(&folder)
                ));
                self.params.log_file_path = None;
                self.log.set_path(None);
            }
        }

        if !self.params.validating_xml_only {
            if let Some(folder) = self.params.output_path().and_then(parent_folder) {
                if !folder.is_dir() && fs::create_dir_all(&folder).is_err() {
                    self.log.fatal_error(format!(
                        "Folder '{}' does not exist and could not be created.",
                        absolute_display(&folder)
                    ));
                    return false;
                }
            }
        }

        self.enter(RunState::FoldersEnsured);
        true
    }

    /// Opening entries: start marker, engine identities, parameters and
    /// host metadata.
    pub(crate) fn log_run_header(&mut self) {
        self.log.info("Transform starting.");
        let xslt = self.services.xslt.name();
        let validator = self.services.validator.name();
        self.log.parameter("XSLT Engine", &xslt, Scope::System);
        self.log.parameter("Schema Validator", &validator, Scope::System);
        for (label, value) in self.params.describe() {
            self.log.parameter(label, &value, Scope::User);
        }
        self.log.system_metadata(self.services.system.as_ref());
    }

    /// Check every parameter and record each problem as a fatal error.
    ///
    /// All checks run even after the first failure. An invalid log level is
    /// not fatal: it is reset to Warning.
    pub(crate) fn validate_params(&mut self) -> bool {
        let mut valid = true;
        let validate_only = self.params.validating_xml_only;

        if validate_only {
            valid &= self.require_file(
                self.params.standard_xml_path.clone(),
                "The XML file to validate was not specified.",
                "Specified XML file to validate",
            );
        } else {
            valid &= self.require_file(
                self.params.input_path().map(Path::to_path_buf),
                "The input file path was not specified.",
                "Specified input file",
            );

            match self.params.output_path().map(Path::to_path_buf) {
                None => {
                    self.log.fatal_error("The output path was not specified.");
                    valid = false;
                }
                Some(output) => {
                    if let Some(folder) = parent_folder(&output) {
                        if !folder.is_dir() {
                            self.log.fatal_error(format!(
                                "Specified output folder '{}' does not exist.",
                                absolute_display(&folder)
                            ));
                            valid = false;
                        }
                    }
                }
            }
        }

        if let LogLevelSetting::Invalid(raw) = &self.params.log_level {
            self.log.warning(format!(
                "Invalid log level requested: '{raw}'. Resetting to '{}' (Warning and higher).",
                LogLevel::Warning
            ));
            self.params.log_level = LogLevelSetting::Valid(LogLevel::Warning);
            self.log.set_level(LogLevel::Warning);
        }

        valid &= self.require_file(
            self.params.registry_path.clone(),
            "The available transforms file path was not specified.",
            "Supplied available transforms file",
        );

        valid &= self.require_folder(
            self.params.schema_base_path.clone(),
            "The xml schema repository path was not specified.",
            "Supplied xml schema repository folder",
        );

        if !validate_only {
            valid &= self.require_folder(
                self.params.xsl_base_path.clone(),
                "The xsl-repository path was not specified.",
                "Supplied xsl-repository folder",
            );
        }

        if !validate_only
            && self.params.direction == Direction::Export
            && self.params.creating_display_stylesheet
        {
            self.check_custom_stylesheet();
        }

        self.params_valid = valid;
        if valid {
            self.enter(RunState::ParamsValidated);
        } else {
            tracing::warn!("run parameters failed validation");
        }
        valid
    }

    fn check_custom_stylesheet(&mut self) {
        match self.params.custom_stylesheet_path.clone() {
            None => {
                let default = self
                    .descriptor()
                    .ok()
                    .and_then(|d| d.default_stylesheet.clone());
                if let Some(default) = default {
                    self.log.info(format!(
                        "Custom display stylesheet path not specified. Using built-in default stylesheet {default}."
                    ));
                }
            }
            Some(custom) if !custom.is_file() => {
                self.log.warning(format!(
                    "No file exists at supplied custom display stylesheet path '{}'. Using default display stylesheet instead.",
                    absolute_display(&custom)
                ));
                self.params.custom_stylesheet_path = None;
            }
            Some(_) => {}
        }
    }

    fn require_file(&mut self, path: Option<PathBuf>, unset: &str, subject: &str) -> bool {
        match path {
            None => {
                self.log.fatal_error(unset);
                false
            }
            Some(path) if !path.exists() => {
                self.log.fatal_error(format!(
                    "{subject} '{}' does not exist.",
                    absolute_display(&path)
                ));
                false
            }
            Some(_) => true,
        }
    }

    fn require_folder(&mut self, path: Option<PathBuf>, unset: &str, subject: &str) -> bool {
        match path {
            None => {
                self.log.fatal_error(unset);
                false
            }
            Some(path) if !path.is_dir() => {
                self.log.fatal_error(format!(
                    "{subject} '{}' does not exist.",
                    absolute_display(&path)
                ));
                false
            }
            Some(_) => true,
        }
    }

    /// Registry entry for the configured standard and version.
    pub(crate) fn descriptor(&self) -> Result<TransformDescriptor, TransformNotFound> {
        self.registry
            .lookup(&self.params.standard_name, &self.params.standard_version)
            .cloned()
    }

    /// Transform artifact for the run's direction, if registered and present.
    pub(crate) fn artifact_path(&mut self, descriptor: &TransformDescriptor) -> Option<PathBuf> {
        let base = self.params.xsl_base_path.clone()?;
        let (kind, path) = match self.params.direction {
            Direction::Import => ("import", descriptor.resolve_import_artifact_path(&base)),
            Direction::Export => ("export", descriptor.resolve_export_artifact_path(&base)),
        };
        let Some(path) = path else {
            self.log
                .error(format!("No {kind} transform is registered for {descriptor}."));
            return None;
        };
        if !path.is_file() {
            self.log.error(format!(
                "Transform file '{}' does not exist.",
                absolute_display(&path)
            ));
            return None;
        }
        Some(path)
    }

    /// Schema registered for the standard, if registered and present.
    pub(crate) fn schema_path(&mut self, descriptor: &TransformDescriptor) -> Option<PathBuf> {
        let base = self.params.schema_base_path.clone()?;
        let Some(path) = descriptor.resolve_schema_path(&base) else {
            self.log
                .error(format!("No schema is registered for {descriptor}."));
            return None;
        };
        if !path.is_file() {
            self.log.error(format!(
                "Schema file '{}' does not exist.",
                absolute_display(&path)
            ));
            return None;
        }
        Some(path)
    }

    /// Whether a schema validation pass belongs in this run.
    pub(crate) fn validating(&self) -> bool {
        self.params.validating_standard_xml || self.params.validating_xml_only
    }

    /// Apply `artifact` to `source`, writing `result`.
    ///
    /// The creation timestamp, escaped header comment and output encoding
    /// are always passed; `extra` adds direction-specific parameters. Engine
    /// failures are logged, never returned.
    pub(crate) fn run_transform(
        &mut self,
        source: &Path,
        artifact: &Path,
        result: &Path,
        extra: BTreeMap<String, String>,
    ) -> bool {
        let creation = if self.params.overriding_creation_date {
            self.params.creation_date_override_value.clone()
        } else {
            format_schema_datetime(&Local::now())
        };
        let encoding = if self.params.output_encoding.trim().is_empty() {
            crate::params::DEFAULT_OUTPUT_ENCODING.to_string()
        } else {
            self.params.output_encoding.clone()
        };

        let mut request = TransformRequest::new(source, artifact, result)
            .with_parameter(PARAM_CREATION_TIMESTAMP, creation)
            .with_parameter(PARAM_HEADER_COMMENT, self.params.escaped_header_comment_text())
            .with_parameter(PARAM_OUTPUT_ENCODING, encoding);
        request.parameters.extend(extra);

        let started = Instant::now();
        match self.services.xslt.transform(&request) {
            Ok(()) => {
                self.log.info("Transform complete.");
                self.log.info(format!(
                    "Transform time: {} ms.",
                    started.elapsed().as_millis()
                ));
                self.transformed = true;
                self.enter(RunState::Transformed);
                true
            }
            Err(error) => {
                self.log.error(format!("Transform failed: {error}"));
                false
            }
        }
    }

    /// Validate `xml` against `schema`, logging each diagnostic.
    ///
    /// Returns the verdict, or `None` when the validator could not run.
    pub(crate) fn validate_against_schema(&mut self, xml: &Path, schema: &Path) -> Option<bool> {
        self.log
            .parameter("XML File to Validate", &xml.display().to_string(), Scope::User);
        self.log.parameter(
            "Schema being validated against",
            &schema.display().to_string(),
            Scope::User,
        );

        if !xml.is_file() {
            self.log.error(format!(
                "XML file to validate '{}' does not exist.",
                absolute_display(xml)
            ));
            return None;
        }

        let services = self.services;
        let mut bridge = ValidationBridge::new(&mut self.log);
        let outcome = services.validator.validate(xml, schema, &mut bridge);
        let valid = bridge.is_valid();

        if let Err(error) = outcome {
            self.log.error(format!("Schema validation could not be completed: {error}"));
            return None;
        }
        if valid {
            self.log.info("The document validated successfully");
        } else {
            self.log.warning("Document validation failed");
        }
        self.validation = Some(valid);
        Some(valid)
    }

    /// Write the log document, best effort.
    ///
    /// A log file that cannot be written sends the document to standard
    /// output; the original error is kept in the report.
    fn write_log(&mut self) {
        if let Err(error) = self.log.write() {
            tracing::error!("failed to write run log: {error}");
            if matches!(error, LogError::Io { .. }) {
                self.log.set_path(None);
                if let Err(fallback) = self.log.write() {
                    tracing::error!("failed to write run log to standard output: {fallback}");
                }
            }
            self.log_error = Some(error);
        }
        self.enter(RunState::LogWritten);
    }

    fn into_report(self, direction: Direction) -> RunReport {
        RunReport {
            direction,
            final_state: self.states.last().copied().unwrap_or(RunState::Created),
            states: self.states,
            params_valid: self.params_valid,
            transformed: self.transformed,
            validation: self.validation,
            stylesheet: self.stylesheet,
            params: self.params,
            log: self.log,
            log_error: self.log_error,
        }
    }
}

/// Parent folder of `path`, or `None` for a bare file name.
fn parent_folder(path: &Path) -> Option<PathBuf> {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
}
