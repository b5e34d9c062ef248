//! CIDR range parsing and host enumeration.
//!
//! Supports IPv4 and IPv6 ranges in CIDR notation. A host address with a
//! prefix ("192.168.1.5/24") is accepted and normalized down to its
//! containing network ("192.168.1.0/24").

use crate::error::{SweepError, SweepResult};
use ipnetwork::{IpNetwork, IpNetworkIterator};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// A parsed, normalized CIDR address range.
///
/// Immutable once parsed. Host enumeration follows subnet semantics:
/// the network and broadcast addresses are excluded where the block is
/// large enough to reserve them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRange {
    network: IpNetwork,
}

impl AddressRange {
    /// Maximum number of addresses allowed in a range.
    pub const MAX_HOSTS: u128 = 65536; // /16 for IPv4

    /// Parse a CIDR range from a string.
    ///
    /// A bare address is treated as a full-length prefix (/32 or /128),
    /// matching `ip_network`-style parsers.
    pub fn parse(s: &str) -> SweepResult<Self> {
        let s = s.trim();

        let network: IpNetwork = if s.contains('/') {
            s.parse()
                .map_err(|e: ipnetwork::IpNetworkError| SweepError::invalid_range(s, e.to_string()))?
        } else {
            let ip: IpAddr = s
                .parse()
                .map_err(|_| SweepError::invalid_range(s, "not an IP address or CIDR block"))?;
            IpNetwork::from(ip)
        };

        let size = block_size(&network);
        if size > Self::MAX_HOSTS {
            return Err(SweepError::RangeTooLarge {
                hosts: size,
                max: Self::MAX_HOSTS,
            });
        }

        // Drop any host bits so "192.168.1.5/24" scans 192.168.1.0/24.
        let network = IpNetwork::new(network.network(), network.prefix())
            .map_err(|e| SweepError::invalid_range(s, e.to_string()))?;

        Ok(Self { network })
    }

    /// The normalized network this range covers.
    pub fn network(&self) -> IpNetwork {
        self.network
    }

    /// Whether this is an IPv4 range.
    pub fn is_ipv4(&self) -> bool {
        self.network.is_ipv4()
    }

    /// Whether this is an IPv6 range.
    pub fn is_ipv6(&self) -> bool {
        self.network.is_ipv6()
    }

    /// Number of host addresses [`hosts`](Self::hosts) will yield.
    pub fn host_count(&self) -> u128 {
        let size = block_size(&self.network);
        match self.network {
            IpNetwork::V4(net) if net.prefix() < 31 => size - 2,
            IpNetwork::V6(net) if net.prefix() < 127 => size - 1,
            _ => size,
        }
    }

    /// Lazy, restartable host enumerator in ascending numeric order.
    ///
    /// Every call starts a fresh iteration over the same sequence; the
    /// order is stable across runs for the same input.
    pub fn hosts(&self) -> HostIter {
        HostIter {
            inner: self.network.iter(),
            network: self.network,
        }
    }
}

impl FromStr for AddressRange {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.network)
    }
}

/// Iterator over the host addresses of an [`AddressRange`].
pub struct HostIter {
    inner: IpNetworkIterator,
    network: IpNetwork,
}

impl Iterator for HostIter {
    type Item = IpAddr;

    fn next(&mut self) -> Option<IpAddr> {
        loop {
            let ip = self.inner.next()?;
            if is_host_address(&self.network, ip) {
                return Some(ip);
            }
        }
    }
}

/// Total number of addresses in the block, saturating for huge v6 blocks.
fn block_size(network: &IpNetwork) -> u128 {
    match network {
        IpNetwork::V4(net) => {
            let prefix = net.prefix() as u32;
            1u128 << (32 - prefix)
        }
        IpNetwork::V6(net) => {
            let prefix = net.prefix() as u32;
            if prefix == 0 {
                u128::MAX
            } else {
                1u128 << (128 - prefix)
            }
        }
    }
}

/// Whether `ip` counts as a host address within `network`.
///
/// IPv4 blocks wider than /31 reserve the network and broadcast
/// addresses; IPv6 has no broadcast, so only the network (subnet-router
/// anycast) address is excluded for blocks wider than /127.
fn is_host_address(network: &IpNetwork, ip: IpAddr) -> bool {
    match (network, ip) {
        (IpNetwork::V4(net), IpAddr::V4(addr)) => {
            net.prefix() >= 31 || (addr != net.network() && addr != net.broadcast())
        }
        (IpNetwork::V6(net), IpAddr::V6(addr)) => net.prefix() >= 127 || addr != net.network(),
        _ => true,
    }
}
