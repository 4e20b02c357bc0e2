//! Report rendering for call graphs.
//!
//! This module formats a finished call graph for display:
//! - Ranked routine tables
//! - Caller -> callee edge listings
//! - Versioned JSON

pub mod report;

// Re-export main functions
pub use report::{profile_to_string, render_edges, render_table, write_report, GraphProfile};
