//! Display stylesheets shipped next to exported documents.
//!
//! Built-in stylesheets are compiled into the binary and looked up by the
//! lower-cased short name a descriptor registers as its default.

use std::fs;
use std::path::{Path, PathBuf};

use sxt_log::RunLog;
use sxt_model::TransformDescriptor;

use crate::params::ExecutionParams;

/// CDISC ODM 1.3.1 display stylesheet.
pub const ODM_1_3_1: &str = include_str!("../assets/stylesheets/odm1-3-1.xsl");

/// CDISC Define-XML 1.0 (CRT-DDS) display stylesheet.
pub const DEFINE_1_0_0: &str = include_str!("../assets/stylesheets/define1-0-0.xsl");

const BUILTIN_STYLESHEETS: &[(&str, &str)] = &[
    ("odm1-3-1.xsl", ODM_1_3_1),
    ("define1-0-0.xsl", DEFINE_1_0_0),
];

/// Contents of the built-in stylesheet `name`, ignoring case.
pub fn builtin_stylesheet(name: &str) -> Option<&'static str> {
    let key = name.trim().to_lowercase();
    BUILTIN_STYLESHEETS
        .iter()
        .find(|(builtin, _)| *builtin == key)
        .map(|(_, contents)| *contents)
}

pub fn builtin_stylesheet_names() -> impl Iterator<Item = &'static str> {
    BUILTIN_STYLESHEETS.iter().map(|(name, _)| *name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StylesheetSource {
    Builtin {
        name: String,
        contents: &'static str,
    },
    Custom(PathBuf),
}

/// Where a display stylesheet comes from and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylesheetPlan {
    pub source: StylesheetSource,
    /// File name referenced from the exported document.
    pub name: String,
    pub destination: PathBuf,
}

/// Decide which stylesheet to ship and under what name.
///
/// A custom stylesheet wins when one is configured and exists; otherwise the
/// descriptor's built-in default is used. When no output name is configured,
/// the source file name is used and written back into `params`.
pub fn plan_display_stylesheet(
    params: &mut ExecutionParams,
    descriptor: &TransformDescriptor,
    log: &mut RunLog,
) -> Option<StylesheetPlan> {
    let output_folder = params
        .standard_xml_path
        .as_deref()
        .and_then(Path::parent)
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    let (source, source_name) = match params.custom_stylesheet_path.as_deref() {
        Some(custom) => {
            if !custom.is_file() {
                log.warning(format!(
                    "No file exists at supplied custom display stylesheet path '{}'. No display stylesheet will be created.",
                    absolute_display(custom)
                ));
                return None;
            }
            let file_name = custom.file_name()?.to_string_lossy().into_owned();
            (StylesheetSource::Custom(custom.to_path_buf()), file_name)
        }
        None => {
            let Some(default_name) = descriptor.default_stylesheet.as_deref() else {
                log.warning(format!(
                    "No default display stylesheet is registered for {descriptor}."
                ));
                return None;
            };
            let name = default_name.trim().to_lowercase();
            let Some(contents) = builtin_stylesheet(&name) else {
                log.error(format!(
                    "Built-in display stylesheet '{name}' is not available."
                ));
                return None;
            };
            (
                StylesheetSource::Builtin {
                    name: name.clone(),
                    contents,
                },
                name,
            )
        }
    };

    let name = match params.output_stylesheet_name.as_deref() {
        Some(configured) => configured.to_string(),
        None => {
            params.output_stylesheet_name = Some(source_name.clone());
            source_name
        }
    };

    Some(StylesheetPlan {
        destination: output_folder.join(&name),
        source,
        name,
    })
}

/// Write the planned stylesheet. Returns whether a file was written.
pub fn materialize_stylesheet(plan: &StylesheetPlan, log: &mut RunLog) -> bool {
    let result = match &plan.source {
        StylesheetSource::Builtin { contents, .. } => fs::write(&plan.destination, contents),
        StylesheetSource::Custom(source) => {
            if paths_equivalent(source, &plan.destination) {
                log.warning("The stylesheet source and destination are the same.");
                return false;
            }
            fs::copy(source, &plan.destination).map(|_| ())
        }
    };

    match result {
        Ok(()) => {
            tracing::debug!(destination = %plan.destination.display(), "wrote display stylesheet");
            true
        }
        Err(error) => {
            log.error(format!(
                "Failed to write display stylesheet '{}': {error}",
                absolute_display(&plan.destination)
            ));
            false
        }
    }
}

/// True when both paths name the same file.
///
/// Existing paths are compared after canonicalization; otherwise the
/// absolute forms are compared. Comparison ignores case on Windows.
pub fn paths_equivalent(a: &Path, b: &Path) -> bool {
    let resolve = |p: &Path| {
        fs::canonicalize(p)
            .or_else(|_| std::path::absolute(p))
            .unwrap_or_else(|_| p.to_path_buf())
    };
    let (a, b) = (resolve(a), resolve(b));
    if cfg!(windows) {
        a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
    } else {
        a == b
    }
}

/// Absolute form of `path` for log messages.
pub(crate) fn absolute_display(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use sxt_log::TimestampSource;
    use sxt_model::{LogLevel, Severity};
    use tempfile::TempDir;

    use super::*;

    fn log() -> RunLog {
        RunLog::new(None, LogLevel::Info, TimestampSource::WallClock)
    }

    fn export_params(dir: &TempDir) -> ExecutionParams {
        ExecutionParams {
            standard_xml_path: Some(dir.path().join("out").join("odm.xml")),
            creating_display_stylesheet: true,
            ..ExecutionParams::default()
        }
    }

    fn odm_descriptor() -> TransformDescriptor {
        TransformDescriptor {
            default_stylesheet: Some("ODM1-3-1.xsl".to_string()),
            ..TransformDescriptor::new("ODM", "1.3.1")
        }
    }

    #[test]
    fn builtin_lookup_ignores_case() {
        assert!(builtin_stylesheet("ODM1-3-1.XSL").is_some());
        assert!(builtin_stylesheet("define1-0-0.xsl").is_some());
        assert!(builtin_stylesheet("unknown.xsl").is_none());
        assert_eq!(builtin_stylesheet_names().count(), 2);
    }

    #[test]
    fn default_plan_uses_lowercased_name() {
        let dir = TempDir::new().unwrap();
        let mut params = export_params(&dir);
        let mut log = log();

        let plan = plan_display_stylesheet(&mut params, &odm_descriptor(), &mut log).unwrap();

        assert_eq!(plan.name, "odm1-3-1.xsl");
        assert_eq!(plan.destination, dir.path().join("out").join("odm1-3-1.xsl"));
        assert_eq!(params.output_stylesheet_name.as_deref(), Some("odm1-3-1.xsl"));
        assert!(matches!(plan.source, StylesheetSource::Builtin { .. }));
    }

    #[test]
    fn configured_output_name_is_kept() {
        let dir = TempDir::new().unwrap();
        let mut params = ExecutionParams {
            output_stylesheet_name: Some("view.xsl".to_string()),
            ..export_params(&dir)
        };

        let plan = plan_display_stylesheet(&mut params, &odm_descriptor(), &mut log()).unwrap();

        assert_eq!(plan.name, "view.xsl");
        assert!(plan.destination.ends_with("view.xsl"));
    }

    #[test]
    fn unknown_builtin_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut params = export_params(&dir);
        let descriptor = TransformDescriptor {
            default_stylesheet: Some("nope.xsl".to_string()),
            ..TransformDescriptor::new("X", "1")
        };
        let mut log = log();

        assert!(plan_display_stylesheet(&mut params, &descriptor, &mut log).is_none());
        assert_eq!(log.count(Severity::Error), 1);
    }

    #[test]
    fn custom_stylesheet_is_copied() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("out")).unwrap();
        let custom = dir.path().join("mine.xsl");
        fs::write(&custom, "<xsl:stylesheet/>").unwrap();
        let mut params = ExecutionParams {
            custom_stylesheet_path: Some(custom),
            ..export_params(&dir)
        };
        let mut log = log();

        let plan = plan_display_stylesheet(&mut params, &odm_descriptor(), &mut log).unwrap();
        assert!(materialize_stylesheet(&plan, &mut log));

        let copied = fs::read_to_string(dir.path().join("out").join("mine.xsl")).unwrap();
        assert_eq!(copied, "<xsl:stylesheet/>");
    }

    #[test]
    fn same_source_and_destination_is_a_warning() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        fs::create_dir_all(&out).unwrap();
        let custom = out.join("mine.xsl");
        fs::write(&custom, "x").unwrap();
        let mut params = ExecutionParams {
            custom_stylesheet_path: Some(custom),
            ..export_params(&dir)
        };
        let mut log = log();

        let plan = plan_display_stylesheet(&mut params, &odm_descriptor(), &mut log).unwrap();
        assert!(!materialize_stylesheet(&plan, &mut log));
        assert_eq!(log.count(Severity::Warning), 1);
        assert_eq!(
            log.entries()[0].message(),
            "The stylesheet source and destination are the same."
        );
    }

    #[test]
    fn equivalence_sees_through_relative_segments() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.xsl");
        fs::write(&file, "x").unwrap();
        let roundabout = dir.path().join("sub").join("..").join("a.xsl");
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        assert!(paths_equivalent(&file, &roundabout));
        assert!(!paths_equivalent(&file, &dir.path().join("b.xsl")));
    }
}
