//! Text and JSON renderings of a call graph.
//!
//! Reports are returned as strings or written to any `Write`; nothing here
//! touches the filesystem.

use crate::aggregator::call_graph::{CallGraph, NodeStats};
use crate::aggregator::metrics::{Metric, RankedNode};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;

/// Width of the intensity bar, in characters
const BAR_WIDTH: usize = 20;

/// Versioned JSON form of a call graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphProfile {
    /// Schema version for compatibility checking
    pub version: String,

    /// Metric the report was requested with
    pub metric: Metric,

    /// Timestamp when the report was generated (RFC 3339)
    pub generated_at: String,

    /// Routine id -> statistics
    pub nodes: BTreeMap<String, NodeStats>,

    /// Caller id -> (callee id -> count)
    pub edges: BTreeMap<String, BTreeMap<String, u64>>,
}

impl GraphProfile {
    /// Snapshot a call graph with sorted keys
    pub fn from_graph(graph: &CallGraph, metric: Metric) -> Self {
        let (nodes, edges) = graph.result();

        Self {
            version: SCHEMA_VERSION.to_string(),
            metric,
            generated_at: chrono::Utc::now().to_rfc3339(),
            nodes: nodes.iter().map(|(id, stats)| (id.clone(), *stats)).collect(),
            edges: edges
                .iter()
                .map(|(caller, callees)| {
                    let callees = callees.iter().map(|(callee, count)| (callee.clone(), *count)).collect();
                    (caller.clone(), callees)
                })
                .collect(),
        }
    }
}

/// Serialize a call graph as pretty JSON
///
/// **Public** - used by `report --json`
///
/// # Errors
/// * `OutputError::SerializationFailed` - JSON serialization error
pub fn profile_to_string(graph: &CallGraph, metric: Metric) -> Result<String, OutputError> {
    let profile = GraphProfile::from_graph(graph, metric);
    let json = serde_json::to_string_pretty(&profile)?;

    debug!("Serialized profile ({} bytes)", json.len());

    Ok(json)
}

/// Render ranked routines as a table
///
/// **Public** - main text report
///
/// # Arguments
/// * `ranked` - Output of `rank_nodes`, already sorted
/// * `metric` - Metric the ranking was built with
/// * `max_lines` - Maximum number of routines to list
pub fn render_table(ranked: &[RankedNode<'_>], metric: Metric, max_lines: usize) -> String {
    let mut lines = Vec::new();

    lines.push(format!("  Ranked by {}: {}", metric, metric.units()));
    lines.push(format!("  +{}+{}+{}+{}+{}+", "-".repeat(34), "-".repeat(10), "-".repeat(14), "-".repeat(14), "-".repeat(BAR_WIDTH + 2)));
    lines.push(format!(
        "  | {:<32} | {:>8} | {:>12} | {:>12} | {:<width$} |",
        "Routine", "Calls", "Total (us)", "Self (us)", "Heat", width = BAR_WIDTH
    ));
    lines.push(format!("  +{}+{}+{}+{}+{}+", "=".repeat(34), "=".repeat(10), "=".repeat(14), "=".repeat(14), "=".repeat(BAR_WIDTH + 2)));

    for node in ranked.iter().take(max_lines) {
        let bar_len = ((node.intensity * BAR_WIDTH as f64).round() as usize).clamp(1, BAR_WIDTH);

        lines.push(format!(
            "  | {:<32} | {:>8} | {:>12} | {:>12} | {:<width$} |",
            truncate_name(node.routine_id, 32),
            node.stats.call_count,
            node.stats.total_time,
            node.stats.self_time,
            "#".repeat(bar_len),
            width = BAR_WIDTH
        ));
    }

    lines.push(format!("  +{}+{}+{}+{}+{}+", "-".repeat(34), "-".repeat(10), "-".repeat(14), "-".repeat(14), "-".repeat(BAR_WIDTH + 2)));

    if ranked.len() > max_lines {
        lines.push(format!("   (Showing top {} of {} routines)", max_lines, ranked.len()));
    }

    lines.join("\n")
}

/// Render caller -> callee edges, most frequent first
pub fn render_edges(graph: &CallGraph, max_lines: usize) -> String {
    let mut edges: Vec<(&str, &str, u64)> = graph
        .edges()
        .iter()
        .flat_map(|(caller, callees)| {
            callees
                .iter()
                .map(move |(callee, count)| (caller.as_str(), callee.as_str(), *count))
        })
        .collect();

    edges.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| (a.0, a.1).cmp(&(b.0, b.1))));

    let mut lines = vec!["  Calls between routines".to_string()];
    for (caller, callee, count) in edges.iter().take(max_lines) {
        lines.push(format!("    {} -> {}  x{}", caller, callee, count));
    }

    if edges.is_empty() {
        lines.push("    (none)".to_string());
    } else if edges.len() > max_lines {
        lines.push(format!("   (Showing top {} of {} edges)", max_lines, edges.len()));
    }

    lines.join("\n")
}

/// Write a rendered report followed by a newline
pub fn write_report<W: Write>(writer: &mut W, report: &str) -> Result<(), OutputError> {
    writeln!(writer, "{}", report)?;
    writer.flush()?;
    Ok(())
}

/// **Private** - keep the table aligned for long routine names
fn truncate_name(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    let tail: String = {
        let chars: Vec<char> = name.chars().collect();
        chars[chars.len() - (max_chars - 3)..].iter().collect()
    };
    format!("...{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::metrics::rank_nodes;
    use crate::tracer::CompletedCall;

    fn sample_graph() -> CallGraph {
        let mut graph = CallGraph::new();
        graph.fold(CompletedCall { routine_id: "b", elapsed: 4, caller_id: Some("a") });
        graph.fold(CompletedCall { routine_id: "a", elapsed: 10, caller_id: None });
        graph
    }

    #[test]
    fn test_render_table_lists_routines() {
        let graph = sample_graph();
        let ranked = rank_nodes(&graph, Metric::SelfTime);
        let table = render_table(&ranked, Metric::SelfTime, 10);

        assert!(table.contains("Ranked by self time"));
        let a_pos = table.find("| a ").unwrap();
        let b_pos = table.find("| b ").unwrap();
        assert!(a_pos < b_pos, "a (self 6) should be listed before b (self 4)");
        assert!(!table.contains("Showing top"));
    }

    #[test]
    fn test_render_table_truncates_listing() {
        let graph = sample_graph();
        let ranked = rank_nodes(&graph, Metric::Count);
        let table = render_table(&ranked, Metric::Count, 1);

        assert!(table.contains("(Showing top 1 of 2 routines)"));
    }

    #[test]
    fn test_render_edges() {
        let text = render_edges(&sample_graph(), 10);
        assert!(text.contains("a -> b  x1"));

        let empty = render_edges(&CallGraph::new(), 10);
        assert!(empty.contains("(none)"));
    }

    #[test]
    fn test_profile_to_string_is_sorted_json() {
        let json = profile_to_string(&sample_graph(), Metric::TotalTime).unwrap();
        let profile: GraphProfile = serde_json::from_str(&json).unwrap();

        assert_eq!(profile.version, SCHEMA_VERSION);
        assert_eq!(profile.metric, Metric::TotalTime);
        assert_eq!(profile.nodes["a"].self_time, 6);
        assert_eq!(profile.edges["a"]["b"], 1);
        assert!(json.contains("\"total_time\""));
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("short", 10), "short");
        assert_eq!(truncate_name("Module::very_long_name", 10), "...ng_name");
    }

    #[test]
    fn test_write_report_appends_newline() {
        let mut buf = Vec::new();
        write_report(&mut buf, "hello").unwrap();
        assert_eq!(buf, b"hello\n");
    }
}
