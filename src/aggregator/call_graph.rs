//! The call graph: per-routine statistics and caller -> callee counts.
//!
//! Self time is built by subtraction. Every completed call adds its elapsed
//! time to its own node, then removes the same amount from its caller's
//! self time. A caller that has not returned yet gets a placeholder node
//! which absorbs these corrections until its own completion lands.

use crate::tracer::{CompletedCall, CompletionSink};
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Node table: routine id -> statistics
pub type NodeMap = HashMap<String, NodeStats>;

/// Edge table: caller id -> (callee id -> invocation count)
pub type EdgeMap = HashMap<String, HashMap<String, u64>>;

/// Aggregated statistics for one routine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStats {
    /// Completed calls
    pub call_count: u64,

    /// Microseconds inside the routine and its callees
    pub total_time: u64,

    /// Microseconds inside the routine itself
    ///
    /// Signed: a caller still on the stack may be corrected below zero
    /// before its own elapsed time is added.
    pub self_time: i64,
}

/// Running call graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallGraph {
    nodes: NodeMap,
    edges: EdgeMap,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one completed call into the graph
    ///
    /// **Public** - aggregation step, also reachable through [`CompletionSink`]
    pub fn fold(&mut self, call: CompletedCall<'_>) {
        let elapsed = call.elapsed;
        let signed = i64::try_from(elapsed).unwrap_or(i64::MAX);

        let node = self.nodes.entry(call.routine_id.to_string()).or_default();
        node.total_time = node.total_time.saturating_add(elapsed);
        node.self_time = node.self_time.saturating_add(signed);
        node.call_count += 1;

        let Some(caller_id) = call.caller_id else {
            return;
        };

        *self
            .edges
            .entry(caller_id.to_string())
            .or_default()
            .entry(call.routine_id.to_string())
            .or_insert(0) += 1;

        let caller = self.nodes.entry(caller_id.to_string()).or_default();
        caller.self_time = caller.self_time.saturating_sub(signed);

        trace!(
            "{} -> {} took {}us (caller self now {}us)",
            caller_id,
            call.routine_id,
            elapsed,
            caller.self_time
        );
    }

    /// Current `(nodes, edges)` pair
    ///
    /// Only final once event delivery has stopped.
    pub fn result(&self) -> (&NodeMap, &EdgeMap) {
        (&self.nodes, &self.edges)
    }

    pub fn nodes(&self) -> &NodeMap {
        &self.nodes
    }

    pub fn edges(&self) -> &EdgeMap {
        &self.edges
    }

    pub fn node(&self, routine_id: &str) -> Option<&NodeStats> {
        self.nodes.get(routine_id)
    }

    /// Times `callee` was invoked directly from `caller` (0 if never)
    pub fn edge_count(&self, caller: &str, callee: &str) -> u64 {
        self.edges
            .get(caller)
            .and_then(|callees| callees.get(callee))
            .copied()
            .unwrap_or(0)
    }

    /// Direct callees of `caller`, with counts
    pub fn callees(&self, caller: &str) -> Option<&HashMap<String, u64>> {
        self.edges.get(caller)
    }

    /// Direct callers of `callee`, with counts, sorted by caller id
    pub fn callers(&self, callee: &str) -> Vec<(&str, u64)> {
        let mut callers: Vec<(&str, u64)> = self
            .edges
            .iter()
            .filter_map(|(caller, callees)| {
                callees.get(callee).map(|count| (caller.as_str(), *count))
            })
            .collect();
        callers.sort_unstable();
        callers
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct caller -> callee pairs
    pub fn edge_total(&self) -> usize {
        self.edges.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Take ownership of the `(nodes, edges)` pair
    pub fn into_parts(self) -> (NodeMap, EdgeMap) {
        (self.nodes, self.edges)
    }
}

impl CompletionSink for CallGraph {
    fn complete(&mut self, call: CompletedCall<'_>) {
        self.fold(call);
    }
}
