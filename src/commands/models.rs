use crate::aggregator::Metric;
use crate::utils::config::DEFAULT_TOP_NODES;
use std::path::PathBuf;

/// Arguments for the report command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ReportArgs {
    /// Event log to replay
    pub events_path: PathBuf,

    /// Metric routines are ranked by
    pub metric: Metric,

    /// Number of routines to list
    pub top_nodes: usize,

    /// Include native (c_call / c_return) events
    pub include_native: bool,

    /// Also list caller -> callee edges
    pub show_edges: bool,

    /// Print JSON instead of a table
    pub json: bool,
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            events_path: PathBuf::from("events.log"),
            metric: Metric::Count,
            top_nodes: DEFAULT_TOP_NODES,
            include_native: false,
            show_edges: false,
            json: false,
        }
    }
}
