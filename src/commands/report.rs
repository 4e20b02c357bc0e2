//! Report command implementation.
//!
//! The report command:
//! 1. Reads the event log
//! 2. Replays it through a tracer
//! 3. Ranks routines by the chosen metric
//! 4. Renders a table (or JSON) for stdout

use super::models::ReportArgs;
use crate::aggregator::{rank_nodes, summarize};
use crate::output::{profile_to_string, render_edges, render_table, write_report};
use crate::parser::read_event_log;
use crate::tracer::{Tracer, TracerConfig};
use crate::utils::config::MAX_TOP_NODES;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// Execute the report command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Event log cannot be read or parsed
/// * An event violates the tracer's input contract
/// * Stdout cannot be written
pub fn execute_report(args: ReportArgs) -> Result<()> {
    let report = build_report(&args)?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write_report(&mut handle, &report).context("Failed to write report")?;

    Ok(())
}

/// Build the report text without printing it
///
/// **Public** - used by `execute_report` and tests
pub fn build_report(args: &ReportArgs) -> Result<String> {
    let start_time = Instant::now();

    info!("Building report from: {}", args.events_path.display());

    // Step 1: Read events
    info!("Step 1/3: Reading event log...");
    let events = read_event_log(&args.events_path)
        .with_context(|| format!("Failed to read event log {}", args.events_path.display()))?;

    // Step 2: Replay
    info!("Step 2/3: Replaying {} events...", events.len());
    let config = TracerConfig::new().with_native_calls(args.include_native);
    let mut tracer = Tracer::new(config);
    tracer
        .trace(|t| t.feed(&events))
        .context("Event log violates the tracer input contract")?;

    let diagnostics = tracer.diagnostics();
    debug!("Trace diagnostics: {:?}", diagnostics);
    if diagnostics.orphan_returns > 0 {
        warn!("Ignored {} return(s) without a matching call", diagnostics.orphan_returns);
    }
    if diagnostics.clock_anomalies > 0 {
        warn!("Clamped {} negative duration(s) to zero", diagnostics.clock_anomalies);
    }

    let graph = tracer.into_graph();
    info!("Graph: {}", summarize(&graph).summary());

    // Step 3: Render
    info!("Step 3/3: Rendering report by {}...", args.metric);
    let report = if args.json {
        profile_to_string(&graph, args.metric).context("Failed to serialize profile")?
    } else {
        let ranked = rank_nodes(&graph, args.metric);
        let mut text = render_table(&ranked, args.metric, args.top_nodes);
        if args.show_edges {
            text.push_str("\n\n");
            text.push_str(&render_edges(&graph, args.top_nodes));
        }
        text
    };

    info!("Report built in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(report)
}

/// Validate report arguments
///
/// **Public** - can be called before execute_report for early validation
pub fn validate_args(args: &ReportArgs) -> Result<()> {
    if args.events_path.as_os_str().is_empty() {
        anyhow::bail!("Event log path cannot be empty");
    }

    if !args.events_path.is_file() {
        anyhow::bail!("Event log not found: {}", args.events_path.display());
    }

    if args.top_nodes == 0 {
        anyhow::bail!("top must be greater than 0");
    }

    if args.top_nodes > MAX_TOP_NODES {
        anyhow::bail!("top is too large (max {})", MAX_TOP_NODES);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn event_log(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_validate_args_valid() {
        let log = event_log("call a 0\nreturn a 1\n");
        let args = ReportArgs {
            events_path: log.path().to_path_buf(),
            ..Default::default()
        };

        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let args = ReportArgs {
            events_path: dir.path().join("nope.log"),
            ..Default::default()
        };

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_empty_path() {
        let args = ReportArgs {
            events_path: Default::default(),
            ..Default::default()
        };

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_top_bounds() {
        let log = event_log("call a 0\n");
        let zero = ReportArgs {
            events_path: log.path().to_path_buf(),
            top_nodes: 0,
            ..Default::default()
        };
        let huge = ReportArgs {
            events_path: log.path().to_path_buf(),
            top_nodes: MAX_TOP_NODES + 1,
            ..Default::default()
        };

        assert!(validate_args(&zero).is_err());
        assert!(validate_args(&huge).is_err());
    }

    #[test]
    fn test_build_report_with_edges() {
        let log = event_log("call a 0\ncall b 1\nreturn b 5\nreturn a 10\n");
        let args = ReportArgs {
            events_path: log.path().to_path_buf(),
            show_edges: true,
            ..Default::default()
        };

        let report = build_report(&args).unwrap();
        assert!(report.contains("Ranked by count"));
        assert!(report.contains("a -> b  x1"));
    }

    #[test]
    fn test_build_report_bad_log() {
        let log = event_log("call a zero\n");
        let args = ReportArgs {
            events_path: log.path().to_path_buf(),
            ..Default::default()
        };

        assert!(build_report(&args).is_err());
    }
}
