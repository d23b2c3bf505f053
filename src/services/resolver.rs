//! Best-effort forward DNS resolution of discovered hostnames.
//!
//! Every failure kind (unknown name, timeout, malformed input, network
//! error) collapses into `Resolution::Unresolved`. Callers that need a flat
//! string fall back to the original hostname via `into_address`.

use std::net::IpAddr;

use serde::Serialize;

/// Outcome of a single hostname lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "address", rename_all = "lowercase")]
pub enum Resolution {
    Resolved(IpAddr),
    Unresolved,
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// The resolved address as a string, or `original` when unresolved.
    pub fn into_address(self, original: &str) -> String {
        match self {
            Self::Resolved(addr) => addr.to_string(),
            Self::Unresolved => original.to_string(),
        }
    }
}

/// Hostname resolution backend.
pub trait Resolver {
    fn resolve(&self, hostname: &str) -> Resolution;
}

/// Resolver backed by the operating system (`getaddrinfo`).
///
/// Blocking, with whatever timeout the system resolver applies.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

impl SystemResolver {
    pub fn new() -> Self {
        Self
    }
}

impl Resolver for SystemResolver {
    fn resolve(&self, hostname: &str) -> Resolution {
        if hostname.trim().is_empty() {
            return Resolution::Unresolved;
        }

        match dns_lookup::lookup_host(hostname) {
            Ok(addrs) => pick_address(&addrs),
            Err(e) => {
                tracing::debug!(hostname, error = %e, "Hostname did not resolve");
                Resolution::Unresolved
            }
        }
    }
}

/// Resolve `hostname`, falling back to the hostname itself.
pub fn resolve(resolver: &dyn Resolver, hostname: &str) -> String {
    resolver.resolve(hostname).into_address(hostname)
}

/// First IPv4 address wins; IPv6 only when no IPv4 address came back.
fn pick_address(addrs: &[IpAddr]) -> Resolution {
    addrs
        .iter()
        .find(|a| a.is_ipv4())
        .or_else(|| addrs.first())
        .map_or(Resolution::Unresolved, |a| Resolution::Resolved(*a))
}
