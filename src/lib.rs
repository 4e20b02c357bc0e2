//! DiyProf
//!
//! Event-driven call-graph profiler core. Feed it call and return events
//! and it reports, per routine, how often it ran, how long it took with
//! and without its callees, and who called whom.
//!
//! This crate provides the core implementation for the
//! `diy-prof` CLI tool.
//!
//! ## Getting Started
//!
//! ```ignore
//! use diy_prof::tracer::{EventKind, Tracer, TracerConfig};
//!
//! let mut tracer = Tracer::new(TracerConfig::new());
//! tracer.trace(|t| {
//!     t.record(EventKind::Call, "main", 0)?;
//!     t.record(EventKind::Return, "main", 10)
//! })?;
//! let (nodes, edges) = tracer.result();
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod tracer;
pub mod utils;
