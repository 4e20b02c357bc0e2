//! Metric selection, node ranking and graph summary statistics.
//!
//! Rankings are presentation-neutral: each entry carries its metric value
//! and a relative intensity a renderer can map to size or shading.

use super::call_graph::{CallGraph, NodeStats};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which statistic to rank routines by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Number of completed calls
    #[default]
    Count,

    /// Time spent in the routine alone
    SelfTime,

    /// Time spent in the routine and its callees
    TotalTime,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Count, Metric::SelfTime, Metric::TotalTime];

    /// Read this metric from a node
    pub fn value(self, stats: &NodeStats) -> i64 {
        match self {
            Metric::Count => count_value(stats),
            Metric::SelfTime => self_time_value(stats),
            Metric::TotalTime => total_time_value(stats),
        }
    }

    /// Short column label
    pub fn label(self) -> &'static str {
        match self {
            Metric::Count => "count",
            Metric::SelfTime => "self time",
            Metric::TotalTime => "total time",
        }
    }

    /// Sentence describing the unit of [`Metric::value`]
    pub fn units(self) -> &'static str {
        match self {
            Metric::Count => "number of times method is called",
            Metric::SelfTime => "total time spent by the method alone in microseconds",
            Metric::TotalTime => {
                "total time spent by the method and subsequent other methods calls in microseconds"
            }
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn count_value(stats: &NodeStats) -> i64 {
    i64::try_from(stats.call_count).unwrap_or(i64::MAX)
}

fn self_time_value(stats: &NodeStats) -> i64 {
    stats.self_time
}

fn total_time_value(stats: &NodeStats) -> i64 {
    i64::try_from(stats.total_time).unwrap_or(i64::MAX)
}

/// One routine in a ranking
#[derive(Debug, Clone, PartialEq)]
pub struct RankedNode<'a> {
    pub routine_id: &'a str,
    pub stats: NodeStats,

    /// Value of the ranking metric
    pub value: i64,

    /// Position of `value` among the distinct values, in `(0, 1]`
    pub intensity: f64,
}

/// Rank all routines by a metric, highest first
///
/// **Public** - main entry point for report building
///
/// Ties are ordered by routine id. Equal values share the same intensity.
pub fn rank_nodes(graph: &CallGraph, metric: Metric) -> Vec<RankedNode<'_>> {
    let mut ranked: Vec<RankedNode<'_>> = graph
        .nodes()
        .iter()
        .map(|(routine_id, stats)| RankedNode {
            routine_id: routine_id.as_str(),
            stats: *stats,
            value: metric.value(stats),
            intensity: 0.0,
        })
        .collect();

    ranked.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.routine_id.cmp(b.routine_id)));

    let mut distinct: Vec<i64> = ranked.iter().map(|node| node.value).collect();
    distinct.sort_unstable();
    distinct.dedup();

    let levels = distinct.len() as f64;
    for node in &mut ranked {
        // `distinct` holds every value, so the search always succeeds
        let position = distinct.binary_search(&node.value).unwrap_or(0);
        node.intensity = (position + 1) as f64 / levels;
    }

    debug!("Ranked {} routines by {} ({} distinct values)", ranked.len(), metric, distinct.len());

    ranked
}

/// Summary statistics for a call graph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphSummary {
    /// Number of distinct routines
    pub routine_count: usize,

    /// Number of distinct caller -> callee pairs
    pub edge_count: usize,

    /// Completed calls across all routines
    pub total_calls: u64,

    /// Sum of self times, i.e. the traced time that was attributed
    pub attributed_time: i64,

    /// Routine with the largest self time
    pub hottest_self: Option<(String, i64)>,
}

impl GraphSummary {
    /// Get human-readable summary
    ///
    /// **Public** - for logging and report headers
    pub fn summary(&self) -> String {
        let hottest = match &self.hottest_self {
            Some((name, time)) => format!("{} ({}us)", name, time),
            None => "-".to_string(),
        };
        format!(
            "Routines: {} | Edges: {} | Calls: {} | Attributed: {}us | Hottest: {}",
            self.routine_count, self.edge_count, self.total_calls, self.attributed_time, hottest
        )
    }
}

/// Calculate summary statistics for a graph
pub fn summarize(graph: &CallGraph) -> GraphSummary {
    if graph.is_empty() {
        return GraphSummary::default();
    }

    let nodes = graph.nodes();
    let hottest_self = nodes
        .iter()
        .max_by(|(a_id, a), (b_id, b)| a.self_time.cmp(&b.self_time).then_with(|| b_id.cmp(a_id)))
        .map(|(id, stats)| (id.clone(), stats.self_time));

    GraphSummary {
        routine_count: nodes.len(),
        edge_count: graph.edge_total(),
        total_calls: nodes.values().map(|stats| stats.call_count).sum(),
        attributed_time: nodes.values().map(|stats| stats.self_time).sum(),
        hottest_self,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracer::CompletedCall;

    fn sample_graph() -> CallGraph {
        let mut graph = CallGraph::new();
        for (routine_id, elapsed, caller_id) in [
            ("b", 4, Some("a")),
            ("c", 1, Some("a")),
            ("c", 1, Some("a")),
            ("a", 10, None),
        ] {
            graph.fold(CompletedCall { routine_id, elapsed, caller_id });
        }
        graph
    }

    #[test]
    fn test_metric_values() {
        let stats = NodeStats { call_count: 3, total_time: 9, self_time: 2 };
        assert_eq!(Metric::Count.value(&stats), 3);
        assert_eq!(Metric::SelfTime.value(&stats), 2);
        assert_eq!(Metric::TotalTime.value(&stats), 9);
    }

    #[test]
    fn test_rank_by_total_time() {
        let graph = sample_graph();
        let ranked = rank_nodes(&graph, Metric::TotalTime);

        let order: Vec<&str> = ranked.iter().map(|n| n.routine_id).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert_eq!(ranked[0].value, 10);
        assert_eq!(ranked[0].intensity, 1.0);
    }

    #[test]
    fn test_rank_ties_share_intensity() {
        let graph = sample_graph();
        // counts: a=1, b=1, c=2
        let ranked = rank_nodes(&graph, Metric::Count);

        assert_eq!(ranked[0].routine_id, "c");
        assert_eq!(ranked[0].intensity, 1.0);
        assert_eq!(ranked[1].routine_id, "a");
        assert_eq!(ranked[2].routine_id, "b");
        assert_eq!(ranked[1].intensity, 0.5);
        assert_eq!(ranked[2].intensity, 0.5);
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&sample_graph());

        assert_eq!(summary.routine_count, 3);
        assert_eq!(summary.edge_count, 2);
        assert_eq!(summary.total_calls, 4);
        // a: 10 - 4 - 1 - 1 = 4, b: 4, c: 2
        assert_eq!(summary.attributed_time, 10);
        assert_eq!(summary.hottest_self, Some(("a".to_string(), 4)));
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&CallGraph::new());
        assert_eq!(summary, GraphSummary::default());
        assert!(summary.summary().contains("Hottest: -"));
    }
}
