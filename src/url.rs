//! Assembly of allow-list patterns for URL-valued attributes. Pure and
//! deterministic; nothing here parses or rewrites URLs.

use std::net::{Ipv4Addr, Ipv6Addr};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

static PROTOCOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9+.\-]*$").expect("protocol pattern"));
static DOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)*$")
        .expect("domain pattern")
});

/// A relative reference: no scheme, not protocol-relative. The regex crate
/// has no look-around, so "does not start with //" is spelled out.
const RELATIVE: &str = r"(?:[^:/][^:]*|/(?:[^:/][^:]*)?)?";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostKind {
    Domain,
    Ipv4,
    Ipv6,
}

/// Classify a host as a domain name, an IPv4 address, or an IPv6 address.
/// IPv6 is accepted bare or bracketed.
pub fn classify_host(host: &str) -> Option<HostKind> {
    if let Some(inner) = host.strip_prefix('[') {
        let inner = inner.strip_suffix(']')?;
        return inner.parse::<Ipv6Addr>().ok().map(|_| HostKind::Ipv6);
    }
    if host.parse::<Ipv4Addr>().is_ok() {
        return Some(HostKind::Ipv4);
    }
    if host.parse::<Ipv6Addr>().is_ok() {
        return Some(HostKind::Ipv6);
    }
    if DOMAIN.is_match(host) {
        return Some(HostKind::Domain);
    }
    None
}

/// Build an anchored, case-insensitive pattern accepting URLs with one of
/// the given protocols and hosts, optionally plus relative references.
/// IPv6 hosts may be listed bare or bracketed; the generated pattern always
/// matches them bracketed.
pub fn build_allowed_url_regex(
    protocols: &[&str],
    hosts: &[&str],
    allow_relative: bool,
) -> Result<Regex> {
    let mut protocol_patterns = Vec::with_capacity(protocols.len());
    for protocol in protocols {
        let protocol = protocol.to_ascii_lowercase();
        if !PROTOCOL.is_match(&protocol) {
            return Err(Error::InvalidProtocol(protocol));
        }
        protocol_patterns.push(regex::escape(&protocol));
    }

    let mut host_patterns = Vec::with_capacity(hosts.len());
    for host in hosts {
        let host = host.to_ascii_lowercase();
        match classify_host(&host) {
            Some(HostKind::Ipv6) => {
                let bare = host
                    .strip_prefix('[')
                    .and_then(|inner| inner.strip_suffix(']'))
                    .unwrap_or(&host);
                host_patterns.push(format!(r"\[{}\]", regex::escape(bare)));
            }
            Some(_) => host_patterns.push(regex::escape(&host)),
            None => return Err(Error::InvalidHost(host)),
        }
    }

    let absolute = format!(
        r"(?:{})://(?:{})(?::[0-9]+)?(?:[/?#]\S*)?",
        protocol_patterns.join("|"),
        host_patterns.join("|"),
    );
    let pattern = if allow_relative {
        format!(r"^(?i)(?:{absolute}|{RELATIVE})$")
    } else {
        format!(r"^(?i){absolute}$")
    };
    Ok(Regex::new(&pattern)?)
}
