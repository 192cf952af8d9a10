//! CLI library components for the standard XML transformer.

pub mod commands;
pub mod logging;
pub mod summary;
