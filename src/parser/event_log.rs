//! Event log parser.
//!
//! An event log holds one event per line, in chronological order. Two line
//! formats are accepted and may be mixed:
//!
//! ```text
//! # comment
//! {"event": "call", "routine": "main", "time": 0}
//! return main 12
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use crate::tracer::{EventKind, TraceEvent};
use crate::utils::error::ParseError;
use log::debug;
use std::path::Path;

/// Parse an event log held in memory
///
/// **Public** - main entry point for parsing
///
/// # Errors
/// * `ParseError::JsonError` - a line starting with `{` is not a valid event object
/// * `ParseError::InvalidFormat` - wrong field count, unknown event kind, bad timestamp
pub fn parse_event_log(input: &str) -> Result<Vec<TraceEvent>, ParseError> {
    let mut events = Vec::new();

    for (index, raw_line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let event = if line.starts_with('{') {
            parse_json_line(line, line_no)?
        } else {
            parse_text_line(line, line_no)?
        };
        events.push(event);
    }

    debug!("Parsed {} events", events.len());

    Ok(events)
}

/// Read and parse an event log file
pub fn read_event_log(path: impl AsRef<Path>) -> Result<Vec<TraceEvent>, ParseError> {
    let path = path.as_ref();

    debug!("Reading event log from: {}", path.display());

    let contents = std::fs::read_to_string(path)?;
    parse_event_log(&contents)
}

/// **Private** - one JSON object per line
fn parse_json_line(line: &str, line_no: usize) -> Result<TraceEvent, ParseError> {
    let event: TraceEvent = serde_json::from_str(line)
        .map_err(|source| ParseError::JsonError { line: line_no, source })?;

    if event.routine_id.is_empty() {
        return Err(invalid(line_no, "empty routine identifier"));
    }

    Ok(event)
}

/// **Private** - `<event> <routine> <time>`
fn parse_text_line(line: &str, line_no: usize) -> Result<TraceEvent, ParseError> {
    let fields: Vec<&str> = line.split_whitespace().collect();

    let [kind, routine_id, timestamp] = fields.as_slice() else {
        return Err(invalid(
            line_no,
            format!("expected `<event> <routine> <time>`, found {} field(s)", fields.len()),
        ));
    };

    let kind: EventKind = kind
        .parse()
        .map_err(|e| invalid(line_no, format!("{}", e)))?;

    let timestamp: u64 = timestamp
        .parse()
        .map_err(|_| invalid(line_no, format!("invalid timestamp `{}`", timestamp)))?;

    Ok(TraceEvent::new(kind, *routine_id, timestamp))
}

fn invalid(line: usize, reason: impl Into<String>) -> ParseError {
    ParseError::InvalidFormat {
        line,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_lines() {
        let events = parse_event_log("call main 0\nreturn main 7\n").unwrap();
        assert_eq!(
            events,
            vec![TraceEvent::call("main", 0), TraceEvent::ret("main", 7)]
        );
    }

    #[test]
    fn test_parse_mixed_with_comments() {
        let input = r#"
# recorded by hand
{"event": "call", "routine": "main", "time": 0}

c_call puts 2
{"event": "c_return", "routine": "puts", "time": 3}
return main 9
"#;
        let events = parse_event_log(input).unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(events[1].kind, EventKind::NativeCall);
        assert_eq!(events[2].kind, EventKind::NativeReturn);
    }

    #[test]
    fn test_unknown_event_kind_reports_line() {
        let err = parse_event_log("call a 0\nline a 1\n").unwrap_err();
        match err {
            ParseError::InvalidFormat { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("line"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wrong_field_count() {
        let err = parse_event_log("call a\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat { line: 1, .. }));
    }

    #[test]
    fn test_negative_timestamp_rejected() {
        let err = parse_event_log("call a -3\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat { line: 1, .. }));
    }

    #[test]
    fn test_bad_json_line() {
        let err = parse_event_log(r#"{"event": "call", "routine": "a"}"#).unwrap_err();
        assert!(matches!(err, ParseError::JsonError { line: 1, .. }));
    }

    #[test]
    fn test_empty_routine_in_json_rejected() {
        let err = parse_event_log(r#"{"event": "call", "routine": "", "time": 1}"#).unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat { line: 1, .. }));
    }
}
