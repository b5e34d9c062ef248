//! Prober trait abstraction.
//!
//! Defines a common interface for liveness probe implementations,
//! enabling polymorphism and easier testing.

mod icmp;

pub use icmp::IcmpProber;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

/// Outcome of a liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    /// An echo reply arrived within the timeout.
    Reachable,
    /// The timeout elapsed or the host reported itself unreachable.
    Unreachable,
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reachable => write!(f, "reachable"),
            Self::Unreachable => write!(f, "unreachable"),
        }
    }
}

/// Result of probing a single address.
///
/// An `error` distinguishes "the probe could not be issued" from a
/// normal negative probe; such results always carry
/// [`ProbeStatus::Unreachable`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    /// The address that was probed.
    pub addr: IpAddr,
    /// Reachability outcome.
    pub status: ProbeStatus,
    /// Round-trip time in milliseconds, when a reply arrived.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rtt_ms: Option<u64>,
    /// Cause of a probe that could not be executed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeResult {
    /// A positive probe with its round-trip time.
    pub fn reachable(addr: IpAddr, rtt: Duration) -> Self {
        Self {
            addr,
            status: ProbeStatus::Reachable,
            rtt_ms: Some(rtt.as_millis() as u64),
            error: None,
        }
    }

    /// A normal negative probe (timeout or explicit unreachable).
    pub fn unreachable(addr: IpAddr) -> Self {
        Self {
            addr,
            status: ProbeStatus::Unreachable,
            rtt_ms: None,
            error: None,
        }
    }

    /// A probe that could not be issued at all.
    pub fn failed(addr: IpAddr, cause: impl Into<String>) -> Self {
        Self {
            addr,
            status: ProbeStatus::Unreachable,
            rtt_ms: None,
            error: Some(cause.into()),
        }
    }

    /// Check if the address answered the probe.
    pub fn is_reachable(&self) -> bool {
        self.status == ProbeStatus::Reachable
    }

    /// Check if the probe failed to execute.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Trait for liveness probe implementations.
///
/// Each call issues exactly one reachability check and waits up to the
/// configured timeout for a reply. Implementations never return `Err`:
/// an unexecutable probe is folded into the result so a sweep can keep
/// going past it.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe a single address.
    async fn probe(&self, addr: IpAddr) -> ProbeResult;

    /// The per-probe reply deadline.
    fn timeout(&self) -> Duration;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_probe_status_display() {
        assert_eq!(ProbeStatus::Reachable.to_string(), "reachable");
        assert_eq!(ProbeStatus::Unreachable.to_string(), "unreachable");
    }

    #[test]
    fn test_probe_result_constructors() {
        let addr = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1));

        let hit = ProbeResult::reachable(addr, Duration::from_millis(12));
        assert!(hit.is_reachable());
        assert!(!hit.is_error());
        assert_eq!(hit.rtt_ms, Some(12));

        let miss = ProbeResult::unreachable(addr);
        assert!(!miss.is_reachable());
        assert!(!miss.is_error());

        let broken = ProbeResult::failed(addr, "permission denied");
        assert!(!broken.is_reachable());
        assert!(broken.is_error());
        assert_eq!(broken.error.as_deref(), Some("permission denied"));
    }
}
