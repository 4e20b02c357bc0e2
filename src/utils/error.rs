//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! Note that the tracing core deliberately has very few failure modes:
//! orphan returns and clock anomalies are recovered, not reported.

use thiserror::Error;

/// Errors raised at the tracer boundary for events that break the input contract
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraceError {
    #[error("Event has no routine identifier")]
    MissingRoutine,

    #[error("Unknown event kind: {0}")]
    UnknownEventKind(String),
}

/// Errors that can occur while reading an event log
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed on line {line}: {source}")]
    JsonError {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid event on line {line}: {reason}")]
    InvalidFormat { line: usize, reason: String },

    #[error("Failed to read event log: {0}")]
    ReadFailed(#[from] std::io::Error),
}

/// Errors that can occur while producing report output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write report: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
