//! Output formatting utilities.
//!
//! Console output (styled per-probe lines, headers, summaries), the
//! report file writer, and JSON output for machine consumption.

use crate::prober::ProbeResult;
use crate::scanner::ScanReport;
use crate::types::AddressRange;
use console::style;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

/// Format a single probe outcome as a console line.
pub fn format_probe_line(result: &ProbeResult) -> String {
    if let Some(cause) = &result.error {
        format!(
            "{} {} ({})",
            result.addr,
            style("probe failed").yellow(),
            cause
        )
    } else if result.is_reachable() {
        let rtt = result
            .rtt_ms
            .map(|ms| format!(" [{}ms]", ms))
            .unwrap_or_default();
        format!("{} {}{}", result.addr, style("is responsive").green(), rtt)
    } else {
        format!(
            "{} {}",
            result.addr,
            style("is not responsive").dim()
        )
    }
}

/// Print a header before the sweep begins.
pub fn print_sweep_header(range: &AddressRange, timeout: Duration, concurrency: usize) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("vlansweep").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "{} Range: {} ({} hosts)",
        style("•").dim(),
        style(range).white().bold(),
        range.host_count()
    );
    println!(
        "{} Timeout: {}ms, concurrency: {}",
        style("•").dim(),
        timeout.as_millis(),
        concurrency
    );
    println!();
}

/// Print the post-sweep summary naming the output file.
pub fn print_summary(report: &ScanReport, output_path: &Path) {
    println!();
    if report.partial {
        println!(
            "{} deadline reached, report is partial ({} addresses probed)",
            style("Note:").yellow().bold(),
            report.probed
        );
    }
    println!(
        "Sweep complete: {} of {} addresses responsive in {:.2}s",
        style(report.reachable_count).green().bold(),
        report.probed,
        report.duration_ms as f64 / 1000.0
    );
    println!(
        "Responsive IPs saved to: {}",
        style(output_path.display()).white().bold()
    );
}

/// Print the full report as pretty JSON.
pub fn print_json(report: &ScanReport) -> io::Result<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    println!("{}", json);
    Ok(())
}

/// Write the report file: header line, then one reachable address per
/// line in enumeration order.
pub fn write_report(path: &Path, report: &ScanReport) -> io::Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);

    writeln!(out, "Responsive IPs in VLAN range {}:", report.range)?;
    for addr in report.reachable() {
        writeln!(out, "{}", addr)?;
    }

    out.flush()
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}
