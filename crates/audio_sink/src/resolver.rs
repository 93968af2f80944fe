//! Hostname to IPv4 resolution for the UDP backend

use std::net::{Ipv4Addr, SocketAddr, ToSocketAddrs};

use contracts::ContractError;
use tracing::{debug, instrument};

/// Resolve `host` to the first non-zero IPv4 address
///
/// Both address families are queried; IPv6 answers are skipped. A lookup
/// that only yields `0.0.0.0` is treated as a failure.
#[instrument(name = "resolve_ipv4", level = "debug")]
pub fn resolve_ipv4(host: &str) -> Result<Ipv4Addr, ContractError> {
    let candidates = (host, 0u16)
        .to_socket_addrs()
        .map_err(|e| ContractError::resolve(host, e.to_string()))?;

    let ip = candidates
        .filter_map(|addr| match addr {
            SocketAddr::V4(v4) => Some(*v4.ip()),
            SocketAddr::V6(_) => None,
        })
        .find(|ip| !ip.is_unspecified())
        .ok_or_else(|| ContractError::resolve(host, "no non-zero IPv4 address"))?;

    debug!(host, %ip, "Resolved");
    Ok(ip)
}
