//! Event log parsing.
//!
//! This module handles:
//! - Reading recorded event logs from disk
//! - Parsing JSON-lines and whitespace-separated events
//! - Reporting malformed lines with their line number

pub mod event_log;

// Re-export main functions
pub use event_log::{parse_event_log, read_event_log};
