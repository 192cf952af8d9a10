use std::fs;
use std::path::{Path, PathBuf};

use sxt_cli::commands::{RunOptions, RunOutcome, list_transforms, run_transform};
use sxt_cli::summary::{render_run_summary, summary_goes_to_stderr};
use sxt_core::RunState;
use tempfile::TempDir;

const REGISTRY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<AvailableTransforms>
  <Transform>
    <StandardName>ODM</StandardName>
    <StandardVersion>1.3.1</StandardVersion>
    <ImportXSL>odm/1.3.1/import/odm_to_cube.xsl</ImportXSL>
    <ExportXSL>odm/1.3.1/export/cube_to_odm.xsl</ExportXSL>
    <Schema>odm/1.3.1/ODM1-3-1.xsd</Schema>
    <DefaultStylesheet>ODM1-3-1.xsl</DefaultStylesheet>
  </Transform>
  <Transform>
    <StandardName>DEFINE</StandardName>
    <StandardVersion>1.0.0</StandardVersion>
    <ExportXSL>define/1.0.0/export/cube_to_define.xsl</ExportXSL>
  </Transform>
</AvailableTransforms>
"#;

fn write(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    path
}

fn config(params: &[(&str, &str)]) -> String {
    let mut xml = String::from("<StandardXMLTransformerParams>\n");
    for (name, value) in params {
        xml.push_str(&format!("  <Param name=\"{name}\" value=\"{value}\"/>\n"));
    }
    xml.push_str("</StandardXMLTransformerParams>\n");
    xml
}

#[test]
fn transforms_as_json() {
    let dir = TempDir::new().unwrap();
    let registry = write(dir.path(), "transforms.xml", REGISTRY);

    let output = list_transforms(&registry, true).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["standard_name"], "ODM");
    assert_eq!(entries[1]["standard_version"], "1.0.0");
    assert!(entries[1]["import_artifact"].is_null());
}

#[test]
fn transforms_as_table() {
    let dir = TempDir::new().unwrap();
    let registry = write(dir.path(), "transforms.xml", REGISTRY);

    let output = list_transforms(&registry, false).unwrap();

    assert!(output.contains("ODM"));
    assert!(output.contains("DEFINE"));
    assert!(output.contains("1.3.1"));
}

#[test]
fn missing_registry_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(list_transforms(&dir.path().join("absent.xml"), false).is_err());
}

#[test]
fn missing_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let options = RunOptions {
        config: dir.path().join("absent.xml"),
        ..RunOptions::default()
    };
    let error = run_transform(&options).unwrap_err();
    assert!(format!("{error:#}").contains("absent.xml"));
}

#[test]
fn invalid_parameters_complete_with_errors() {
    let dir = TempDir::new().unwrap();
    let config = write(
        dir.path(),
        "params.xml",
        &config(&[
            ("importOrExport", "EXPORT"),
            ("standardName", "ODM"),
            ("standardVersion", "1.3.1"),
            ("logFilePath", "logs/run.xml"),
        ]),
    );
    let options = RunOptions {
        config,
        workspace_root: Some(dir.path().to_path_buf()),
        ..RunOptions::default()
    };

    let RunOutcome::Completed(report) = run_transform(&options).unwrap() else {
        panic!("expected a completed run");
    };

    assert!(report.has_errors());
    assert!(!report.params_valid);
    assert!(!report.transformed);
    assert_eq!(report.final_state, RunState::LogWritten);
    assert!(dir.path().join("logs/run.xml").is_file());
    assert!(!summary_goes_to_stderr(&report));
    assert!(render_run_summary(&report).contains("run.xml"));
}

#[test]
fn summary_leaves_stdout_to_a_console_log() {
    let dir = TempDir::new().unwrap();
    let config = write(
        dir.path(),
        "params.xml",
        &config(&[("importOrExport", "EXPORT"), ("standardName", "ODM")]),
    );
    let options = RunOptions {
        config,
        ..RunOptions::default()
    };

    let RunOutcome::Completed(report) = run_transform(&options).unwrap() else {
        panic!("expected a completed run");
    };

    assert!(report.log.path().is_none());
    assert!(summary_goes_to_stderr(&report));
    assert!(render_run_summary(&report).contains("Run log: standard output"));
}

#[test]
fn unknown_standard_is_not_found() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "transforms.xml", REGISTRY);
    write(root, "data/odm.xml", "<ODM/>");
    fs::create_dir_all(root.join("schema")).unwrap();
    fs::create_dir_all(root.join("xsl")).unwrap();
    fs::create_dir_all(root.join("out")).unwrap();
    let config = write(
        root,
        "params.xml",
        &config(&[
            ("importOrExport", "IMPORT"),
            ("standardXMLPath", "data/odm.xml"),
            ("cubeXMLPath", "out/cube.xml"),
            ("standardName", "SDTM"),
            ("standardVersion", "3.4"),
            ("availableTransformsFilePath", "transforms.xml"),
            ("schemaBasePath", "schema"),
            ("xslBasePath", "xsl"),
            ("logFilePath", "logs/run.xml"),
        ]),
    );
    let options = RunOptions {
        config,
        workspace_root: Some(root.to_path_buf()),
        ..RunOptions::default()
    };

    let RunOutcome::NotFound(error) = run_transform(&options).unwrap() else {
        panic!("expected a failed lookup");
    };

    assert_eq!(error.standard_name, "SDTM");
    assert_eq!(error.standard_version, "3.4");
    assert_eq!(error.available.len(), 2);
    assert!(root.join("logs/run.xml").is_file());
}
