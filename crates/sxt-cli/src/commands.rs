use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use sxt_core::{ExecutionParams, RunReport, Services, TransformNotFound, Transformer};
use sxt_engine::{Xmllint, XsltProc};
use sxt_log::ProcessMetadata;
use sxt_standards::TransformRegistry;

use crate::summary::{apply_table_style, dim_cell, header_cell};

/// Inputs of `sxt run`.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config: PathBuf,
    /// Folder relative configuration paths are resolved against.
    pub workspace_root: Option<PathBuf>,
    pub xsltproc: Option<PathBuf>,
    pub xmllint: Option<PathBuf>,
}

#[derive(Debug)]
pub enum RunOutcome {
    /// The run finished; its log may still hold errors.
    Completed(Box<RunReport>),
    NotFound(TransformNotFound),
}

/// Load the configuration and drive one run with the external engines.
///
/// # Errors
///
/// Returns an error when the configuration file cannot be read or holds an
/// invalid value.
pub fn run_transform(options: &RunOptions) -> Result<RunOutcome> {
    let params = match options.workspace_root.as_deref() {
        Some(root) => ExecutionParams::from_config_file_in(&options.config, root),
        None => ExecutionParams::from_config_file(&options.config),
    }
    .with_context(|| format!("load configuration {}", options.config.display()))?;

    let services = Services {
        xslt: Box::new(
            options
                .xsltproc
                .as_ref()
                .map_or_else(XsltProc::new, XsltProc::with_program),
        ),
        validator: Box::new(
            options
                .xmllint
                .as_ref()
                .map_or_else(Xmllint::new, Xmllint::with_program),
        ),
        system: Box::new(ProcessMetadata),
    };

    let outcome = match Transformer::with_services(params, services).exec() {
        Ok(report) => RunOutcome::Completed(Box::new(report)),
        Err(not_found) => RunOutcome::NotFound(not_found),
    };
    Ok(outcome)
}

/// Render the registry at `registry` as a table, or as JSON.
///
/// # Errors
///
/// Returns an error when the registry cannot be loaded.
pub fn list_transforms(registry: &Path, json: bool) -> Result<String> {
    let registry = TransformRegistry::load(registry)
        .with_context(|| format!("load transform registry {}", registry.display()))?;

    if json {
        return serde_json::to_string_pretty(registry.descriptors())
            .context("serialize transform registry");
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Standard"),
        header_cell("Version"),
        header_cell("Import"),
        header_cell("Export"),
        header_cell("Schema"),
        header_cell("Stylesheet"),
    ]);
    apply_table_style(&mut table);
    let optional = |value: Option<&str>| value.map_or_else(|| dim_cell("-"), Cell::new);
    for descriptor in registry.descriptors() {
        table.add_row(vec![
            Cell::new(&descriptor.standard_name),
            Cell::new(&descriptor.standard_version),
            optional(descriptor.import_artifact.as_deref()),
            optional(descriptor.export_artifact.as_deref()),
            optional(descriptor.schema.as_deref()),
            optional(descriptor.default_stylesheet.as_deref()),
        ]);
    }
    Ok(table.to_string())
}
