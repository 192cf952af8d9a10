//! Seams to the external XSLT and XML Schema engines.
//!
//! The orchestrator only talks to [`XsltEngine`] and [`SchemaValidator`].
//! [`XsltProc`] and [`Xmllint`] drive the libxslt/libxml2 command-line tools.

#![deny(unsafe_code)]

pub mod error;
pub mod schema;
pub mod xslt;

pub use error::EngineError;
pub use schema::{DiagnosticKind, SchemaValidator, Xmllint, parse_xmllint_diagnostics};
pub use xslt::{TransformRequest, XsltEngine, XsltProc};
