//! Aggregation of completed calls into a call graph and its metrics.
//!
//! This module turns completed calls into:
//! - Per-routine statistics (count, total time, self time)
//! - Caller -> callee invocation counts
//! - Rankings and summaries by a chosen metric

pub mod call_graph;
pub mod metrics;

// Re-export main types and functions
pub use call_graph::{CallGraph, EdgeMap, NodeMap, NodeStats};
pub use metrics::{rank_nodes, summarize, GraphSummary, Metric, RankedNode};
