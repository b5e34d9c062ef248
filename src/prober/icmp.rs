//! ICMP echo prober implementation.
//!
//! Sends a single echo request per probe through `surge-ping` and waits
//! up to the configured timeout for a reply. One client is kept per
//! address family; opening the sockets may require root or
//! `CAP_NET_RAW` depending on the platform.

use crate::error::{SweepError, SweepResult};
use crate::prober::{ProbeResult, Prober};
use async_trait::async_trait;
use std::net::IpAddr;
use std::time::Duration;
use surge_ping::{Client, Config, PingIdentifier, PingSequence, SurgeError, ICMP};
use tracing::{debug, warn};

const PAYLOAD: [u8; 56] = [0u8; 56];

/// ICMP echo prober.
///
/// Reachability semantics: a reply within the timeout is reachable; a
/// timeout or an explicit unreachable indication is a normal negative
/// probe; failure to send at all is recorded as an execution error on
/// the result.
pub struct IcmpProber {
    v4: Option<Client>,
    v6: Option<Client>,
    timeout: Duration,
}

impl IcmpProber {
    /// Create a prober with clients for both address families.
    ///
    /// A family whose socket cannot be opened is tolerated as long as
    /// the other one works; its addresses will produce execution-error
    /// results. Fails only when neither family is usable.
    pub fn new(timeout: Duration) -> SweepResult<Self> {
        let v4 = match Client::new(&Config::default()) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(error = %e, "ICMPv4 client unavailable");
                None
            }
        };
        let v6 = match Client::new(&Config::builder().kind(ICMP::V6).build()) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(error = %e, "ICMPv6 client unavailable");
                None
            }
        };

        if v4.is_none() && v6.is_none() {
            return Err(SweepError::ProbeSetup(
                "could not open an ICMP socket for either address family".into(),
            ));
        }

        Ok(Self { v4, v6, timeout })
    }

    fn client_for(&self, addr: IpAddr) -> Option<&Client> {
        match addr {
            IpAddr::V4(_) => self.v4.as_ref(),
            IpAddr::V6(_) => self.v6.as_ref(),
        }
    }
}

#[async_trait]
impl Prober for IcmpProber {
    async fn probe(&self, addr: IpAddr) -> ProbeResult {
        let Some(client) = self.client_for(addr) else {
            return ProbeResult::failed(addr, "no ICMP socket for this address family");
        };

        let mut pinger = client.pinger(addr, PingIdentifier(rand::random())).await;
        pinger.timeout(self.timeout);

        match pinger.ping(PingSequence(0), &PAYLOAD).await {
            Ok((_packet, rtt)) => {
                debug!(%addr, rtt_ms = rtt.as_millis() as u64, "echo reply");
                ProbeResult::reachable(addr, rtt)
            }
            Err(SurgeError::Timeout { .. }) => {
                debug!(%addr, "probe timed out");
                ProbeResult::unreachable(addr)
            }
            Err(e) => {
                debug!(%addr, error = %e, "probe could not be issued");
                ProbeResult::failed(addr, e.to_string())
            }
        }
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
