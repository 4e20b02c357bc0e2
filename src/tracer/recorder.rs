//! Pairs call and return events through an explicit stack.
//!
//! The recorder knows nothing about aggregation: every completed call is
//! handed to a [`CompletionSink`]. Pairing is strictly LIFO, so recursion
//! works without looking at routine identities.

use super::events::{CompletedCall, EventKind, PendingFrame};
use log::{debug, trace};

/// Receives every call the recorder completes
pub trait CompletionSink {
    fn complete(&mut self, call: CompletedCall<'_>);
}

/// Call stack plus diagnostic counters for one event stream
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    stack: Vec<PendingFrame>,
    orphan_returns: u64,
    clock_anomalies: u64,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one timed event
    ///
    /// **Public** - main entry point for event pairing
    ///
    /// # Arguments
    /// * `kind` - Call-class events push, return-class events pop
    /// * `routine_id` - Routine the event belongs to
    /// * `timestamp` - Microseconds, non-decreasing along the stream
    /// * `sink` - Receives the completed call when a return pairs up
    ///
    /// A return with nothing on the stack is dropped and only counted.
    /// A return earlier than its call yields an elapsed time of zero.
    pub fn record<S: CompletionSink + ?Sized>(
        &mut self,
        kind: EventKind,
        routine_id: &str,
        timestamp: u64,
        sink: &mut S,
    ) {
        if kind.is_call() {
            self.stack.push(PendingFrame {
                routine_id: routine_id.to_string(),
                started_at: timestamp,
            });
            return;
        }

        let Some(frame) = self.stack.pop() else {
            self.orphan_returns += 1;
            trace!("Ignoring orphan {} of {} at {}", kind, routine_id, timestamp);
            return;
        };

        if frame.routine_id != routine_id {
            trace!(
                "Return of {} paired with pending call of {}",
                routine_id,
                frame.routine_id
            );
        }

        let elapsed = match timestamp.checked_sub(frame.started_at) {
            Some(elapsed) => elapsed,
            None => {
                self.clock_anomalies += 1;
                debug!(
                    "Clock went backwards for {}: started at {}, returned at {}",
                    frame.routine_id, frame.started_at, timestamp
                );
                0
            }
        };

        let caller_id = self.stack.last().map(|parent| parent.routine_id.as_str());

        sink.complete(CompletedCall {
            routine_id: &frame.routine_id,
            elapsed,
            caller_id,
        });
    }

    /// Number of calls still waiting for a return
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Frames still waiting for a return, outermost first
    pub fn pending(&self) -> &[PendingFrame] {
        &self.stack
    }

    pub fn orphan_returns(&self) -> u64 {
        self.orphan_returns
    }

    pub fn clock_anomalies(&self) -> u64 {
        self.clock_anomalies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Collects completed calls as owned tuples
    #[derive(Default)]
    struct Collected(Vec<(String, u64, Option<String>)>);

    impl CompletionSink for Collected {
        fn complete(&mut self, call: CompletedCall<'_>) {
            self.0.push((
                call.routine_id.to_string(),
                call.elapsed,
                call.caller_id.map(str::to_string),
            ));
        }
    }

    #[test]
    fn test_call_only_pushes() {
        let mut recorder = Recorder::new();
        let mut sink = Collected::default();

        recorder.record(EventKind::Call, "main", 0, &mut sink);
        recorder.record(EventKind::NativeCall, "puts", 3, &mut sink);

        assert_eq!(recorder.depth(), 2);
        assert_eq!(recorder.pending()[1].routine_id, "puts");
        assert_eq!(recorder.pending()[1].started_at, 3);
        assert!(sink.0.is_empty());
    }

    #[test]
    fn test_nested_pairs_report_caller() {
        let mut recorder = Recorder::new();
        let mut sink = Collected::default();

        recorder.record(EventKind::Call, "a", 0, &mut sink);
        recorder.record(EventKind::Call, "b", 1, &mut sink);
        recorder.record(EventKind::Return, "b", 5, &mut sink);
        recorder.record(EventKind::Return, "a", 10, &mut sink);

        assert_eq!(
            sink.0,
            vec![
                ("b".to_string(), 4, Some("a".to_string())),
                ("a".to_string(), 10, None),
            ]
        );
        assert_eq!(recorder.depth(), 0);
    }

    #[test]
    fn test_orphan_return_is_counted_not_forwarded() {
        let mut recorder = Recorder::new();
        let mut sink = Collected::default();

        recorder.record(EventKind::Return, "x", 0, &mut sink);
        recorder.record(EventKind::NativeReturn, "y", 1, &mut sink);

        assert!(sink.0.is_empty());
        assert_eq!(recorder.orphan_returns(), 2);
    }

    #[test]
    fn test_backwards_clock_clamps_to_zero() {
        let mut recorder = Recorder::new();
        let mut sink = Collected::default();

        recorder.record(EventKind::Call, "a", 10, &mut sink);
        recorder.record(EventKind::Return, "a", 4, &mut sink);

        assert_eq!(sink.0, vec![("a".to_string(), 0, None)]);
        assert_eq!(recorder.clock_anomalies(), 1);
    }

    #[test]
    fn test_pairing_ignores_return_identity() {
        let mut recorder = Recorder::new();
        let mut sink = Collected::default();

        recorder.record(EventKind::Call, "a", 0, &mut sink);
        recorder.record(EventKind::Return, "not_a", 2, &mut sink);

        assert_eq!(sink.0, vec![("a".to_string(), 2, None)]);
    }
}
