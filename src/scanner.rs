//! Sweep orchestration.
//!
//! Drives a [`Prober`] over every host address of an [`AddressRange`]
//! and collects one [`ProbeResult`] per address, managing concurrent
//! probe tasks on the tokio runtime.

use crate::output;
use crate::prober::{ProbeResult, Prober};
use crate::types::AddressRange;
use chrono::{DateTime, Utc};
use futures::future;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::info;

/// Configuration for a sweep.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Range to sweep.
    pub range: AddressRange,
    /// Maximum number of in-flight probes; 1 gives a strictly
    /// sequential sweep.
    pub concurrency: usize,
    /// Optional whole-sweep deadline. Once it elapses no new probes
    /// are issued and the report is marked partial.
    pub max_duration: Option<Duration>,
    /// Suppress live console output.
    pub quiet: bool,
}

impl SweepConfig {
    /// Create a sweep configuration with defaults.
    pub fn new(range: AddressRange) -> Self {
        Self {
            range,
            concurrency: 32,
            max_duration: None,
            quiet: false,
        }
    }

    /// Set the number of concurrent probes.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set a whole-sweep deadline.
    pub fn with_max_duration(mut self, max_duration: Duration) -> Self {
        self.max_duration = Some(max_duration);
        self
    }

    /// Suppress live console output.
    pub fn with_quiet(mut self) -> Self {
        self.quiet = true;
        self
    }
}

/// Complete, ordered outcome of sweeping a range.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// The swept range, normalized.
    pub range: String,
    /// When the sweep started.
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration of the sweep.
    pub duration_ms: u64,
    /// Number of addresses actually probed.
    pub probed: usize,
    /// Number of addresses that answered.
    pub reachable_count: usize,
    /// True when a deadline cut the sweep short of the full range.
    pub partial: bool,
    /// One result per probed address, in enumeration order.
    pub results: Vec<ProbeResult>,
}

impl ScanReport {
    /// The reachable subset, preserving enumeration order.
    pub fn reachable(&self) -> impl Iterator<Item = IpAddr> + '_ {
        self.results
            .iter()
            .filter(|r| r.is_reachable())
            .map(|r| r.addr)
    }

    /// Write the report file: a header line naming the range, then one
    /// reachable address per line in enumeration order.
    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        output::write_report(path, self)
    }
}

/// Execute a complete sweep of the configured range.
///
/// Every enumerated address is probed exactly once. A probe that could
/// not be executed is recorded on its result and the sweep continues;
/// nothing short of the deadline stops the loop.
pub async fn run_sweep(prober: Arc<dyn Prober>, config: SweepConfig) -> ScanReport {
    let started_at = Utc::now();
    let start = Instant::now();
    let total = config.range.host_count();

    info!(range = %config.range, hosts = total as u64, "starting sweep");

    // Live progress; probe lines are printed through the bar so they
    // don't tear it.
    let progress = if config.quiet {
        None
    } else {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );
        Some(pb)
    };

    // Semaphore bounds the in-flight probes; each probe still runs on
    // its own timeout, independent of the others.
    let semaphore = Arc::new(Semaphore::new(config.concurrency));
    let deadline = config.max_duration.map(|d| start + d);

    let mut indexed: Vec<(usize, ProbeResult)> = stream::iter(config.range.hosts().enumerate())
        .take_while(|_| future::ready(deadline.map_or(true, |d| Instant::now() < d)))
        .map(|(index, addr)| {
            let prober = Arc::clone(&prober);
            let sem = Arc::clone(&semaphore);
            let progress = progress.clone();

            async move {
                let _permit = sem.acquire().await.expect("semaphore closed");

                // Permits queue behind in-flight probes, so the
                // deadline may have passed by the time one is granted;
                // nothing new is issued once it has.
                if deadline.map_or(false, |d| Instant::now() >= d) {
                    return None;
                }

                let result = prober.probe(addr).await;

                if let Some(pb) = &progress {
                    pb.println(output::format_probe_line(&result));
                    pb.inc(1);
                }

                Some((index, result))
            }
        })
        .buffer_unordered(1000) // semaphore controls actual concurrency
        .filter_map(future::ready)
        .collect()
        .await;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    // Completion order is arbitrary under concurrency; restore
    // enumeration order before building the report.
    indexed.sort_by_key(|(index, _)| *index);
    let results: Vec<ProbeResult> = indexed.into_iter().map(|(_, result)| result).collect();

    let probed = results.len();
    let reachable_count = results.iter().filter(|r| r.is_reachable()).count();
    let partial = (probed as u128) < total;
    let duration = start.elapsed();

    info!(
        probed,
        reachable = reachable_count,
        partial,
        duration_ms = duration.as_millis() as u64,
        "sweep finished"
    );

    ScanReport {
        range: config.range.to_string(),
        started_at,
        duration_ms: duration.as_millis() as u64,
        probed,
        reachable_count,
        partial,
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prober::ProbeResult;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::net::Ipv4Addr;
    use std::sync::Mutex;

    /// Prober stub with canned per-address outcomes.
    struct StubProber {
        alive: HashSet<IpAddr>,
        broken: HashSet<IpAddr>,
        seen: Mutex<Vec<IpAddr>>,
        delay: Option<Duration>,
    }

    impl StubProber {
        fn new(alive: &[IpAddr], broken: &[IpAddr]) -> Self {
            Self {
                alive: alive.iter().copied().collect(),
                broken: broken.iter().copied().collect(),
                seen: Mutex::new(Vec::new()),
                delay: None,
            }
        }

        /// Fixed per-probe delay instead of the skewed default.
        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
    }

    #[async_trait]
    impl Prober for StubProber {
        async fn probe(&self, addr: IpAddr) -> ProbeResult {
            self.seen.lock().unwrap().push(addr);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            } else if let IpAddr::V4(v4) = addr {
                // Skewed delays so completion order differs from
                // enumeration order under concurrency.
                let delay = 20u64.saturating_sub(v4.octets()[3] as u64 * 3);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            if self.broken.contains(&addr) {
                ProbeResult::failed(addr, "permission denied")
            } else if self.alive.contains(&addr) {
                ProbeResult::reachable(addr, Duration::from_millis(5))
            } else {
                ProbeResult::unreachable(addr)
            }
        }

        fn timeout(&self) -> Duration {
            Duration::from_millis(100)
        }
    }

    fn v4(a: u8, b: u8, c: u8, d: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(a, b, c, d))
    }

    #[tokio::test]
    async fn test_slash_30_scenario() {
        let range = AddressRange::parse("192.168.1.0/30").unwrap();
        let prober = Arc::new(StubProber::new(&[v4(192, 168, 1, 1)], &[]));

        let config = SweepConfig::new(range).with_quiet();
        let report = run_sweep(prober, config).await;

        assert_eq!(report.probed, 2);
        assert_eq!(report.results.len() as u128, range.host_count());
        assert!(!report.partial);

        let reachable: Vec<IpAddr> = report.reachable().collect();
        assert_eq!(reachable, vec![v4(192, 168, 1, 1)]);
        assert_eq!(report.reachable_count, 1);
    }

    #[tokio::test]
    async fn test_every_address_probed_exactly_once() {
        let range = AddressRange::parse("10.0.0.0/28").unwrap();
        let prober = Arc::new(StubProber::new(&[], &[]));

        let config = SweepConfig::new(range).with_quiet().with_concurrency(8);
        let report = run_sweep(Arc::clone(&prober) as Arc<dyn Prober>, config).await;

        assert_eq!(report.probed as u128, range.host_count());

        let mut seen = prober.seen.lock().unwrap().clone();
        seen.sort();
        let mut expected: Vec<IpAddr> = range.hosts().collect();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn test_results_in_enumeration_order() {
        let range = AddressRange::parse("10.0.0.0/28").unwrap();
        let prober = Arc::new(StubProber::new(&[], &[]));

        let config = SweepConfig::new(range).with_quiet().with_concurrency(8);
        let report = run_sweep(prober, config).await;

        let addrs: Vec<IpAddr> = report.results.iter().map(|r| r.addr).collect();
        let expected: Vec<IpAddr> = range.hosts().collect();
        assert_eq!(addrs, expected);
    }

    #[tokio::test]
    async fn test_execution_error_does_not_abort_sweep() {
        let range = AddressRange::parse("10.0.0.0/29").unwrap();
        let broken = v4(10, 0, 0, 2);
        let prober = Arc::new(StubProber::new(&[v4(10, 0, 0, 5)], &[broken]));

        let config = SweepConfig::new(range).with_quiet().with_concurrency(1);
        let report = run_sweep(prober, config).await;

        assert_eq!(report.probed as u128, range.host_count());

        let failed = report.results.iter().find(|r| r.addr == broken).unwrap();
        assert!(failed.is_error());
        assert!(!failed.is_reachable());

        // A failed probe is not merged with the reachable subset.
        let reachable: Vec<IpAddr> = report.reachable().collect();
        assert_eq!(reachable, vec![v4(10, 0, 0, 5)]);
    }

    #[tokio::test]
    async fn test_deadline_produces_partial_report() {
        let range = AddressRange::parse("10.0.0.0/26").unwrap();
        let prober = Arc::new(StubProber::new(&[], &[]));

        let config = SweepConfig::new(range)
            .with_quiet()
            .with_max_duration(Duration::ZERO);
        let report = run_sweep(prober, config).await;

        assert!(report.partial);
        assert_eq!(report.probed, 0);
        assert_eq!(report.reachable_count, 0);
    }

    #[tokio::test]
    async fn test_mid_sweep_deadline_stops_new_probes() {
        let range = AddressRange::parse("10.0.0.0/28").unwrap();
        let prober = Arc::new(
            StubProber::new(&[], &[]).with_delay(Duration::from_millis(50)),
        );

        // 14 hosts at 50ms each, sequentially: the 100ms deadline
        // lands mid-sweep, well before the range is exhausted.
        let config = SweepConfig::new(range)
            .with_quiet()
            .with_concurrency(1)
            .with_max_duration(Duration::from_millis(100));
        let report = run_sweep(prober, config).await;

        assert!(report.partial);
        assert!(report.probed >= 1);
        assert!((report.probed as u128) < range.host_count());
        assert_eq!(report.results.len(), report.probed);
    }
}
