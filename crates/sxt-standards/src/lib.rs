#![deny(unsafe_code)]

pub mod descriptor_xml;
pub mod error;
pub mod registry;

pub use crate::descriptor_xml::parse_descriptor_document;
pub use crate::error::StandardsError;
pub use crate::registry::{TransformNotFound, TransformRegistry};
