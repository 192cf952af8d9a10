use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateTimeError {
    #[error("date-time '{value}' has no timezone offset")]
    MissingOffset { value: String },

    #[error("invalid schema date-time '{value}': {message}")]
    Invalid { value: String, message: String },
}
