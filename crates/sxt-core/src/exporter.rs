//! Cube XML in, standard XML out.
//!
//! The output is validated after the transform; a failed validation is
//! reported but the output is kept. A display stylesheet can be shipped
//! next to the output and referenced from it.

use std::collections::BTreeMap;

use sxt_standards::TransformNotFound;

use crate::state::RunState;
use crate::stylesheet::{materialize_stylesheet, plan_display_stylesheet};
use crate::transformer::Run;

const PARAM_STYLESHEET_CREATION: &str = "stylesheetref.creation";
const PARAM_STYLESHEET_NAME: &str = "stylesheetref.name";

pub(crate) fn run(run: &mut Run<'_>) -> Result<(), TransformNotFound> {
    if !run.ensure_folders() {
        return Ok(());
    }
    run.log_run_header();
    if !run.validate_params() {
        return Ok(());
    }

    let descriptor = run.descriptor()?;
    let Some(output) = run.params.standard_xml_path.clone() else {
        return Ok(());
    };

    let mut stylesheet = None;
    if !run.params.validating_xml_only {
        if run.params.creating_display_stylesheet {
            stylesheet = plan_display_stylesheet(&mut run.params, &descriptor, &mut run.log);
        }

        let mut extra = BTreeMap::new();
        if let Some(plan) = &stylesheet {
            extra.insert(PARAM_STYLESHEET_CREATION.to_string(), "true".to_string());
            extra.insert(PARAM_STYLESHEET_NAME.to_string(), plan.name.clone());
        }

        let artifact = run.artifact_path(&descriptor);
        let input = run.params.cube_xml_path.clone();
        if let (Some(artifact), Some(input)) = (artifact, input) {
            run.run_transform(&input, &artifact, &output, extra);
        }
    }

    if run.validating() && !run.params.validating_xml_only && !run.transformed {
        run.log
            .warning("Output validation was skipped because the transform did not complete.");
    } else if run.validating() {
        if let Some(schema) = run.schema_path(&descriptor) {
            run.validate_against_schema(&output, &schema);
            run.enter(RunState::PostValidated);
        }
    }

    if let Some(plan) = stylesheet {
        if materialize_stylesheet(&plan, &mut run.log) {
            run.stylesheet = Some(plan.destination);
            run.enter(RunState::StylesheetMaterialized);
        }
    }
    Ok(())
}
