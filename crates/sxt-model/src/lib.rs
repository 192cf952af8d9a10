//! Shared vocabulary for standard XML transformation runs.
//!
//! Every other `sxt-*` crate speaks in terms of these types: the transform
//! direction, log severities and thresholds, registry descriptors, the
//! schema-validation callback seam, and the schema date-time encoding used
//! in logs and transform parameters.

pub mod datetime;
pub mod descriptor;
pub mod enums;
pub mod error;
pub mod validation;

pub use datetime::{format_schema_datetime, parse_schema_datetime};
pub use descriptor::TransformDescriptor;
pub use enums::{Direction, LogLevel, Origin, Scope, Severity};
pub use error::DateTimeError;
pub use validation::{ValidationIssue, ValidationSink};
