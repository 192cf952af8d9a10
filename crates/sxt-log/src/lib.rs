//! Run log for standard XML transformations.
//!
//! A [`RunLog`] collects timestamped entries for one run and is written once,
//! as an XML document, when the run ends. Only entries at or above the
//! configured [`LogLevel`](sxt_model::LogLevel) are written; the full
//! sequence stays available in memory.

pub mod bridge;
pub mod entry;
pub mod error;
pub mod run_log;
pub mod system;

pub use bridge::ValidationBridge;
pub use entry::{LogEntry, SourcePosition};
pub use error::LogError;
pub use run_log::{RunLog, TimestampSource};
pub use system::{ProcessMetadata, StaticMetadata, SystemMetadata};
