//! Standard XML in, cube XML out.
//!
//! The input document is validated before the transform. With
//! `fail_on_validation_error` set, a document that does not pass is not
//! transformed.

use std::collections::BTreeMap;

use sxt_standards::TransformNotFound;

use crate::state::RunState;
use crate::transformer::Run;

pub(crate) fn run(run: &mut Run<'_>) -> Result<(), TransformNotFound> {
    if !run.ensure_folders() {
        return Ok(());
    }
    run.log_run_header();
    if !run.validate_params() {
        return Ok(());
    }

    let descriptor = run.descriptor()?;
    let Some(input) = run.params.standard_xml_path.clone() else {
        return Ok(());
    };

    let mut input_valid = true;
    if run.validating() {
        if let Some(schema) = run.schema_path(&descriptor) {
            input_valid = run.validate_against_schema(&input, &schema) == Some(true);
            run.enter(RunState::PreValidated);
        }
    }

    if run.params.validating_xml_only {
        return Ok(());
    }
    if !input_valid && run.params.fail_on_validation_error {
        run.log
            .warning("The transform was skipped because the input document failed validation.");
        return Ok(());
    }

    let Some(artifact) = run.artifact_path(&descriptor) else {
        return Ok(());
    };
    let Some(output) = run.params.cube_xml_path.clone() else {
        return Ok(());
    };
    run.run_transform(&input, &artifact, &output, BTreeMap::new());
    Ok(())
}
