//! Event and frame types shared by the recorder and the aggregator.
//!
//! A call moves through two distinct values during its lifetime:
//! a [`PendingFrame`] while it sits on the stack, and a [`CompletedCall`]
//! once its return has been observed.

use crate::utils::config::{
    CALL_EVENT_NAMES, NATIVE_CALL_EVENT_NAMES, NATIVE_RETURN_EVENT_NAMES, RETURN_EVENT_NAMES,
};
use crate::utils::error::TraceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of an instrumentation event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Entry into an interpreted routine
    Call,

    /// Exit from an interpreted routine
    Return,

    /// Entry into a native (foreign) routine
    #[serde(rename = "c_call", alias = "native_call")]
    NativeCall,

    /// Exit from a native (foreign) routine
    #[serde(rename = "c_return", alias = "native_return")]
    NativeReturn,
}

impl EventKind {
    /// True for `Call` and `NativeCall`
    pub fn is_call(self) -> bool {
        matches!(self, EventKind::Call | EventKind::NativeCall)
    }

    /// True for `Return` and `NativeReturn`
    pub fn is_return(self) -> bool {
        !self.is_call()
    }

    /// True for events emitted around native routines
    pub fn is_native(self) -> bool {
        matches!(self, EventKind::NativeCall | EventKind::NativeReturn)
    }

    /// Name used in event logs
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Call => "call",
            EventKind::Return => "return",
            EventKind::NativeCall => "c_call",
            EventKind::NativeReturn => "c_return",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let name = name.as_str();

        if CALL_EVENT_NAMES.contains(&name) {
            Ok(EventKind::Call)
        } else if RETURN_EVENT_NAMES.contains(&name) {
            Ok(EventKind::Return)
        } else if NATIVE_CALL_EVENT_NAMES.contains(&name) {
            Ok(EventKind::NativeCall)
        } else if NATIVE_RETURN_EVENT_NAMES.contains(&name) {
            Ok(EventKind::NativeReturn)
        } else {
            Err(TraceError::UnknownEventKind(s.to_string()))
        }
    }
}

/// One timed event as delivered by an instrumentation source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Event kind
    #[serde(rename = "event")]
    pub kind: EventKind,

    /// Routine identifier, identical for a call and its matching return
    #[serde(rename = "routine")]
    pub routine_id: String,

    /// Timestamp in microseconds
    #[serde(rename = "time")]
    pub timestamp: u64,
}

impl TraceEvent {
    pub fn new(kind: EventKind, routine_id: impl Into<String>, timestamp: u64) -> Self {
        Self {
            kind,
            routine_id: routine_id.into(),
            timestamp,
        }
    }

    pub fn call(routine_id: impl Into<String>, timestamp: u64) -> Self {
        Self::new(EventKind::Call, routine_id, timestamp)
    }

    pub fn ret(routine_id: impl Into<String>, timestamp: u64) -> Self {
        Self::new(EventKind::Return, routine_id, timestamp)
    }
}

/// An invocation still waiting for its return
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFrame {
    pub routine_id: String,
    pub started_at: u64,
}

/// A finished invocation, ready to be folded into the call graph
///
/// Borrows its identifiers from the recorder so that no allocation
/// happens between popping a frame and aggregating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedCall<'a> {
    pub routine_id: &'a str,
    pub elapsed: u64,
    /// Routine on top of the stack once this one was popped, if any
    pub caller_id: Option<&'a str>,
}
