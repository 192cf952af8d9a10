use std::fs;
use std::path::{Path, PathBuf};

use sxt_model::TransformDescriptor;
use sxt_standards::{StandardsError, TransformRegistry};
use tempfile::TempDir;

const DESCRIPTORS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<AvailableTransforms>
  <Transform>
    <StandardName>ODM</StandardName>
    <StandardVersion>1.3.1</StandardVersion>
    <ImportXSL>odm/1.3.1/import/odm_to_cube.xsl</ImportXSL>
    <ExportXSL>odm/1.3.1/export/cube_to_odm.xsl</ExportXSL>
    <Schema>odm/1.3.1/ODM1-3-1.xsd</Schema>
    <DefaultStylesheet>odm1-3-1.xsl</DefaultStylesheet>
  </Transform>
  <Transform>
    <StandardName>CRTDDS</StandardName>
    <StandardVersion>1.0</StandardVersion>
    <ImportXSL>crtdds/1.0/import/define_to_cube.xsl</ImportXSL>
    <ExportXSL>crtdds/1.0/export/cube_to_define.xsl</ExportXSL>
    <Schema>crtdds/1.0/define1-0-0.xsd</Schema>
    <DefaultStylesheet>define1-0-0.xsl</DefaultStylesheet>
  </Transform>
</AvailableTransforms>
"#;

fn write_registry(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn lookup_after_load_returns_matching_descriptor() {
    let dir = TempDir::new().unwrap();
    let path = write_registry(&dir, "transforms.xml", DESCRIPTORS);

    let registry = TransformRegistry::load(&path).unwrap();

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.source(), Some(path.as_path()));
    let odm = registry.lookup("ODM", "1.3.1").unwrap();
    assert_eq!(odm.standard_name, "ODM");
    assert_eq!(odm.standard_version, "1.3.1");
    assert_eq!(odm.schema.as_deref(), Some("odm/1.3.1/ODM1-3-1.xsd"));

    let crtdds = registry.lookup("CRTDDS", "1.0").unwrap();
    assert_eq!(crtdds.default_stylesheet.as_deref(), Some("define1-0-0.xsl"));
}

#[test]
fn lookup_of_absent_pair_is_not_found() {
    let dir = TempDir::new().unwrap();
    let path = write_registry(&dir, "transforms.xml", DESCRIPTORS);
    let registry = TransformRegistry::load(&path).unwrap();

    let err = registry.lookup("FOO", "9.9").unwrap_err();
    assert_eq!(err.standard_name, "FOO");
    assert_eq!(err.standard_version, "9.9");
    assert_eq!(
        err.available,
        vec![
            ("ODM".to_string(), "1.3.1".to_string()),
            ("CRTDDS".to_string(), "1.0".to_string()),
        ]
    );
    assert!(registry.lookup("odm", "1.3.1").is_err());
    assert!(registry.lookup("ODM", "1.3").is_err());
}

#[test]
fn empty_registry_never_matches() {
    let registry = TransformRegistry::new();
    assert!(registry.is_empty());
    assert!(registry.lookup("ODM", "1.3.1").is_err());
}

#[test]
fn duplicate_pairs_resolve_to_first_entry() {
    let dir = TempDir::new().unwrap();
    let path = write_registry(
        &dir,
        "dupes.xml",
        "<AvailableTransforms>\
           <Transform><StandardName>ODM</StandardName><StandardVersion>1.3.1</StandardVersion>\
             <Schema>first.xsd</Schema></Transform>\
           <Transform><StandardName>ODM</StandardName><StandardVersion>1.3.1</StandardVersion>\
             <Schema>second.xsd</Schema></Transform>\
         </AvailableTransforms>",
    );

    let registry = TransformRegistry::load(&path).unwrap();

    assert_eq!(registry.len(), 2);
    let found = registry.lookup("ODM", "1.3.1").unwrap();
    assert_eq!(found.schema.as_deref(), Some("first.xsd"));
}

#[test]
fn reload_replaces_previous_entries() {
    let dir = TempDir::new().unwrap();
    let first = write_registry(&dir, "first.xml", DESCRIPTORS);
    let second = write_registry(
        &dir,
        "second.xml",
        "<AvailableTransforms><Transform><StandardName>SDTM</StandardName>\
         <StandardVersion>3.4</StandardVersion></Transform></AvailableTransforms>",
    );

    let mut registry = TransformRegistry::load(&first).unwrap();
    registry.reload(&second).unwrap();

    assert_eq!(registry.len(), 1);
    assert!(registry.lookup("ODM", "1.3.1").is_err());
    assert!(registry.lookup("SDTM", "3.4").is_ok());
}

#[test]
fn failed_reload_leaves_registry_empty() {
    let dir = TempDir::new().unwrap();
    let good = write_registry(&dir, "good.xml", DESCRIPTORS);
    let mut registry = TransformRegistry::load(&good).unwrap();

    let result = registry.reload(&dir.path().join("missing.xml"));

    assert!(matches!(result, Err(StandardsError::Io { .. })));
    assert!(registry.is_empty());
    assert!(registry.source().is_none());
}

#[test]
fn malformed_descriptor_file_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_registry(&dir, "broken.xml", "<AvailableTransforms><Transform></Oops>");

    let err = TransformRegistry::load(&path).unwrap_err();
    assert!(matches!(err, StandardsError::Xml { .. }));
    assert!(err.to_string().contains("broken.xml"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn insert_and_remove_adjust_entries() {
    let mut registry = TransformRegistry::new();
    let descriptor = TransformDescriptor::new("ODM", "1.3.1");
    registry.insert(descriptor.clone());
    registry.insert(TransformDescriptor::new("ODM", "1.3.2"));

    assert_eq!(registry.remove(&descriptor), 1);
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.descriptors()[0].standard_version, "1.3.2");
}

#[test]
fn resolves_artifact_paths_against_repository_base() {
    let dir = TempDir::new().unwrap();
    let path = write_registry(&dir, "transforms.xml", DESCRIPTORS);
    let registry = TransformRegistry::load(&path).unwrap();
    let odm = registry.lookup("ODM", "1.3.1").unwrap();

    let base = Path::new("/opt/xsl");
    assert_eq!(
        odm.resolve_import_artifact_path(base).unwrap(),
        PathBuf::from("/opt/xsl/odm/1.3.1/import/odm_to_cube.xsl")
    );
    assert_eq!(
        odm.resolve_export_artifact_path(base).unwrap(),
        PathBuf::from("/opt/xsl/odm/1.3.1/export/cube_to_odm.xsl")
    );
}

#[test]
fn display_lists_every_descriptor() {
    let mut registry = TransformRegistry::new();
    registry.insert(TransformDescriptor::new("ODM", "1.3.1"));
    let text = registry.to_string();
    assert!(text.starts_with("Currently-available transforms:"));
    assert!(text.contains("Standard 'ODM', version '1.3.1'"));
}
