//! Event recording: the tracer lifecycle, the pairing stack and clocks.
//!
//! A [`Tracer`] owns one [`Recorder`] and one [`CallGraph`]. Events come in
//! through explicit method calls, so any number of tracers can run side by
//! side without shared state. Typical use:
//!
//! ```ignore
//! let mut tracer = Tracer::new(TracerConfig::new());
//! tracer.enable();
//! tracer.record(EventKind::Call, "main", 0)?;
//! tracer.record(EventKind::Return, "main", 10)?;
//! tracer.disable();
//! let (nodes, edges) = tracer.result();
//! ```

pub mod clock;
pub mod events;
pub mod recorder;

pub use clock::{Clock, Stopwatch};
pub use events::{CompletedCall, EventKind, PendingFrame, TraceEvent};
pub use recorder::{CompletionSink, Recorder};

use crate::aggregator::call_graph::{CallGraph, EdgeMap, NodeMap};
use crate::utils::error::TraceError;
use log::{debug, trace, warn};

/// Tracer configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TracerConfig {
    /// Record native (foreign) call/return events as well
    pub include_native: bool,
}

impl TracerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_native_calls(mut self, include: bool) -> Self {
        self.include_native = include;
        self
    }
}

/// Counters describing what the tracer dropped or could not finish
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceDiagnostics {
    /// Returns that arrived with an empty stack
    pub orphan_returns: u64,

    /// Returns timestamped before their call
    pub clock_anomalies: u64,

    /// Native events skipped because the config excludes them
    pub filtered_events: u64,

    /// Events delivered while the tracer was disabled
    pub ignored_while_disabled: u64,

    /// Calls still waiting for a return
    pub unfinished_frames: usize,
}

/// Recorder and call graph behind an enable/disable lifecycle
#[derive(Debug, Clone, Default)]
pub struct Tracer {
    config: TracerConfig,
    recorder: Recorder,
    graph: CallGraph,
    enabled: bool,
    filtered_events: u64,
    ignored_while_disabled: u64,
}

impl Tracer {
    pub fn new(config: TracerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> TracerConfig {
        self.config
    }

    /// Start accepting events
    pub fn enable(&mut self) {
        debug!("Tracer enabled (native calls: {})", self.config.include_native);
        self.enabled = true;
    }

    /// Stop accepting events
    pub fn disable(&mut self) {
        self.enabled = false;

        let depth = self.recorder.depth();
        if depth > 0 {
            warn!("Tracer disabled with {} call(s) still pending", depth);
        }
        debug!(
            "Tracer disabled: {} routines, {} edges",
            self.graph.node_count(),
            self.graph.edge_total()
        );
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record one event
    ///
    /// **Public** - main entry point for instrumentation sources
    ///
    /// # Errors
    /// * `TraceError::MissingRoutine` - empty routine identifier; nothing is recorded
    pub fn record(&mut self, kind: EventKind, routine_id: &str, timestamp: u64) -> Result<(), TraceError> {
        if routine_id.is_empty() {
            return Err(TraceError::MissingRoutine);
        }

        if !self.enabled {
            self.ignored_while_disabled += 1;
            trace!("Tracer disabled, dropping {} of {}", kind, routine_id);
            return Ok(());
        }

        if kind.is_native() && !self.config.include_native {
            self.filtered_events += 1;
            return Ok(());
        }

        self.recorder.record(kind, routine_id, timestamp, &mut self.graph);
        Ok(())
    }

    pub fn record_event(&mut self, event: &TraceEvent) -> Result<(), TraceError> {
        self.record(event.kind, &event.routine_id, event.timestamp)
    }

    /// Record a sequence of events in order
    ///
    /// Stops at the first invalid event. Events before it stay recorded.
    ///
    /// # Returns
    /// Number of events consumed
    pub fn feed<'a, I>(&mut self, events: I) -> Result<usize, TraceError>
    where
        I: IntoIterator<Item = &'a TraceEvent>,
    {
        let mut consumed = 0;
        for event in events {
            self.record_event(event)?;
            consumed += 1;
        }
        Ok(consumed)
    }

    /// Enable, run `body`, disable
    ///
    /// Event delivery is stopped before this returns, so the graph can be
    /// read right away.
    pub fn trace<T>(&mut self, body: impl FnOnce(&mut Self) -> T) -> T {
        self.enable();
        let value = body(self);
        self.disable();
        value
    }

    /// `(nodes, edges)` collected so far
    pub fn result(&self) -> (&NodeMap, &EdgeMap) {
        self.graph.result()
    }

    pub fn graph(&self) -> &CallGraph {
        &self.graph
    }

    pub fn into_graph(self) -> CallGraph {
        self.graph
    }

    pub fn diagnostics(&self) -> TraceDiagnostics {
        TraceDiagnostics {
            orphan_returns: self.recorder.orphan_returns(),
            clock_anomalies: self.recorder.clock_anomalies(),
            filtered_events: self.filtered_events,
            ignored_while_disabled: self.ignored_while_disabled,
            unfinished_frames: self.recorder.depth(),
        }
    }
}
