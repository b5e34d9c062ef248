//! Command-line interface.
//!
//! Single-purpose invocation: `vlansweep <RANGE>` sweeps the range and
//! writes the responsive addresses to a file.

use crate::error::{CliError, CliResult};
use crate::output;
use crate::prober::IcmpProber;
use crate::scanner::{run_sweep, SweepConfig};
use crate::types::AddressRange;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Sweep a CIDR range for responsive hosts via ICMP echo.
///
/// Each host address in the range is probed exactly once; the
/// responsive subset is written to the output file in address order.
#[derive(Parser, Debug)]
#[command(name = "vlansweep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sweep a CIDR range for responsive hosts", long_about = None)]
pub struct Cli {
    /// Range to sweep, in CIDR notation
    ///
    /// Examples:
    ///   192.168.1.0/24     IPv4 block
    ///   10.0.0.7/32        Single host
    ///   2001:db8::/120     IPv6 block
    #[arg(value_name = "RANGE")]
    pub range: String,

    /// File to save the list of responsive IPs
    #[arg(short, long, default_value = "responsive_ips.txt", value_name = "PATH")]
    pub output: PathBuf,

    /// Reply timeout per probe in milliseconds
    #[arg(short, long, default_value = "1000")]
    pub timeout: u64,

    /// Maximum number of in-flight probes (1 = sequential sweep)
    #[arg(short, long, default_value = "32")]
    pub concurrency: usize,

    /// Stop issuing probes after this many seconds and report partial results
    #[arg(long, value_name = "SECS")]
    pub max_duration: Option<u64>,

    /// Console output format for the final report
    #[arg(short = 'f', long, value_enum, default_value = "plain")]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format for the final report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Plain,
    /// JSON structured output
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Plain
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl Cli {
    /// Execute the sweep.
    pub async fn execute(&self) -> CliResult<()> {
        // Precondition: the range must parse. This is the one failure
        // that stops the sweep before it starts.
        let range = AddressRange::parse(&self.range)?;
        debug!(%range, hosts = range.host_count() as u64, "parsed range");

        let live_output = !self.quiet && self.format == OutputFormat::Plain;

        if !is_root() && live_output {
            output::print_warning(
                "ICMP sockets may require root/sudo or CAP_NET_RAW; probes can fail without them.",
            );
        }

        let timeout = Duration::from_millis(self.timeout);
        let prober = IcmpProber::new(timeout)?;

        if live_output {
            output::print_sweep_header(&range, timeout, self.concurrency);
        }

        let mut config = SweepConfig::new(range).with_concurrency(self.concurrency);
        if let Some(secs) = self.max_duration {
            config = config.with_max_duration(Duration::from_secs(secs));
        }
        if !live_output {
            config = config.with_quiet();
        }

        let report = run_sweep(Arc::new(prober), config).await;

        report
            .write_to_file(&self.output)
            .map_err(|source| CliError::ReportWrite {
                path: self.output.display().to_string(),
                source,
            })?;

        match self.format {
            OutputFormat::Plain => {
                if !self.quiet {
                    output::print_summary(&report, &self.output);
                }
            }
            OutputFormat::Json => {
                output::print_json(&report).map_err(crate::error::SweepError::from)?;
            }
        }

        Ok(())
    }
}

/// Check if running with root/admin privileges.
fn is_root() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}
