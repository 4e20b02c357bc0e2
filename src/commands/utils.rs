use crate::aggregator::Metric;
use crate::utils::config::SCHEMA_VERSION;

/// Display event log and report schema information
pub fn display_schema(show_details: bool) {
    println!("DiyProf Event Log & Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Event log (one event per line, '#' starts a comment):");
        println!("  <event> <routine> <time>");
        println!("  {{\"event\": <event>, \"routine\": <routine>, \"time\": <time>}}");
        println!("    event: string          - call | return | c_call | c_return");
        println!("    routine: string        - Routine identifier (same for call and return)");
        println!("    time: number           - Microseconds, non-decreasing");
        println!();
        println!("JSON report:");
        println!("  version: string          - Schema version (e.g., '1.0.0')");
        println!("  metric: string           - count | self_time | total_time");
        println!("  generated_at: string     - RFC 3339 timestamp");
        println!("  nodes: object            - Routine -> statistics");
        println!("    call_count: number     - Completed calls");
        println!("    total_time: number     - Microseconds including callees");
        println!("    self_time: number      - Microseconds excluding callees");
        println!("  edges: object            - Caller -> (callee -> call count)");
        println!();
        println!("Metrics:");
        for metric in Metric::ALL {
            println!("  {:<12} - {}", metric.label(), metric.units());
        }
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("DiyProf v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("An event-driven call-graph profiler: call counts, total time and self time.");
}
