use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use sxt_core::{RunReport, TransformNotFound};
use sxt_model::Severity;

/// Print the outcome of a completed run.
///
/// When the run log document went to standard output, the summary goes to
/// standard error so stdout stays a single XML document.
pub fn print_run_summary(report: &RunReport) {
    if let Some(error) = &report.log_error {
        eprintln!("warning: run log not written to file: {error}");
    }
    let summary = render_run_summary(report);
    if summary_goes_to_stderr(report) {
        eprintln!("{summary}");
    } else {
        println!("{summary}");
    }
}

pub fn summary_goes_to_stderr(report: &RunReport) -> bool {
    report.log.path().is_none()
}

/// Summary lines and table for a completed run.
pub fn render_run_summary(report: &RunReport) -> String {
    let params = &report.params;
    let mut lines = vec![format!(
        "{} {} {}",
        report.direction, params.standard_name, params.standard_version
    )];
    if let Some(input) = params.input_path() {
        lines.push(format!("Input: {}", input.display()));
    }
    if let Some(output) = params.output_path() {
        lines.push(format!("Output: {}", output.display()));
    }
    if let Some(stylesheet) = &report.stylesheet {
        lines.push(format!("Stylesheet: {}", stylesheet.display()));
    }
    match report.log.path() {
        Some(path) => lines.push(format!("Run log: {}", path.display())),
        None => lines.push("Run log: standard output".to_string()),
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Final state"),
        header_cell("Parameters"),
        header_cell("Transformed"),
        header_cell("Validation"),
        header_cell("Errors"),
        header_cell("Warnings"),
    ]);
    apply_table_style(&mut table);
    for index in 4..6 {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    let errors = report.error_count();
    let warnings = report.log.count(Severity::Warning);
    table.add_row(vec![
        Cell::new(report.final_state).add_attribute(Attribute::Bold),
        flag_cell(report.params_valid, "valid", "invalid"),
        flag_cell(report.transformed, "yes", "no"),
        match report.validation {
            Some(valid) => flag_cell(valid, "passed", "failed"),
            None => dim_cell("-"),
        },
        count_cell(errors, Color::Red),
        count_cell(warnings, Color::Yellow),
    ]);
    lines.push(table.to_string());
    lines.join("\n")
}

/// Explain a failed registry lookup on stderr.
pub fn print_not_found(error: &TransformNotFound) {
    eprintln!("error: {error}");
    if error.available.is_empty() {
        eprintln!("No transforms are registered.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Standard"), header_cell("Version")]);
    apply_table_style(&mut table);
    for (name, version) in &error.available {
        table.add_row(vec![Cell::new(name), Cell::new(version)]);
    }
    eprintln!("Available transforms:\n{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn flag_cell(value: bool, yes: &str, no: &str) -> Cell {
    if value {
        Cell::new(yes).fg(Color::Green)
    } else {
        Cell::new(no).fg(Color::Red)
    }
}
