//! Configuration and constants for the profiler and CLI.

/// Current JSON report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Default number of routines listed in a text report
pub const DEFAULT_TOP_NODES: usize = 20;

/// Upper bound accepted for `--top`
pub const MAX_TOP_NODES: usize = 1000;

/// Microseconds per second, for clock conversions
pub const MICROS_PER_SEC: u64 = 1_000_000;

// Accepted spellings of event kinds in event logs
pub const CALL_EVENT_NAMES: &[&str] = &["call"];
pub const RETURN_EVENT_NAMES: &[&str] = &["return"];
pub const NATIVE_CALL_EVENT_NAMES: &[&str] = &["c_call", "native_call"];
pub const NATIVE_RETURN_EVENT_NAMES: &[&str] = &["c_return", "native_return"];
