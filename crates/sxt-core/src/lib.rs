//! Orchestration of standard XML import and export runs.
//!
//! A run is described by [`ExecutionParams`] and driven by a [`Transformer`],
//! which loads the transform registry, validates its parameters, calls the
//! XSLT engine and schema validator, optionally materializes a display
//! stylesheet, and always finishes by writing the run log.
//!
//! ```no_run
//! use sxt_core::{ExecutionParams, Transformer};
//!
//! let params = ExecutionParams::from_config_file("export.xml".as_ref())?;
//! let report = Transformer::new(params).exec()?;
//! println!("{} ({} errors)", report.final_state, report.error_count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
mod exporter;
mod importer;
pub mod params;
pub mod state;
pub mod stylesheet;
pub mod transformer;

pub use config::{load_config_params, parse_config_params};
pub use error::ConfigError;
pub use params::{ExecutionParams, LogLevelSetting};
pub use state::RunState;
pub use sxt_standards::TransformNotFound;
pub use transformer::{RunReport, Services, Transformer};
