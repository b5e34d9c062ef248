//! # vlansweep - ICMP Liveness Sweeper for CIDR Ranges
//!
//! vlansweep probes every host address in a CIDR-specified range for
//! reachability via ICMP echo and records the responsive addresses to
//! a file.
//!
//! ## Features
//!
//! - **CIDR Targeting**: IPv4 and IPv6 ranges, normalized to the network boundary
//! - **Subnet Semantics**: network/broadcast addresses excluded where reserved
//! - **Bounded Concurrency**: async probing with a configurable in-flight limit
//! - **Deterministic Reports**: results always in enumeration order
//! - **Error Transparency**: unexecutable probes are recorded, never dropped
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use vlansweep::prober::IcmpProber;
//! use vlansweep::scanner::{run_sweep, SweepConfig};
//! use vlansweep::types::AddressRange;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let range = AddressRange::parse("192.168.1.0/24").unwrap();
//!     let prober = IcmpProber::new(Duration::from_secs(1)).unwrap();
//!
//!     let report = run_sweep(Arc::new(prober), SweepConfig::new(range)).await;
//!
//!     for addr in report.reachable() {
//!         println!("{} is responsive", addr);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - CIDR range parsing and host enumeration
//! - [`prober`] - the `Prober` trait and the ICMP implementation
//! - [`scanner`] - sweep orchestration and the `ScanReport`
//! - [`output`] - console and report-file formatting
//! - [`error`] - error types
//! - [`cli`] - command-line interface

pub mod cli;
pub mod error;
pub mod output;
pub mod prober;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, SweepError};
pub use prober::{IcmpProber, ProbeResult, ProbeStatus, Prober};
pub use scanner::{run_sweep, ScanReport, SweepConfig};
pub use types::{AddressRange, HostIter};
