//! `NO_PROXY` exclusion rules
//!
//! Entries are comma-separated. `*` matches every host. An IP address, with
//! or without a `/prefix`, matches addresses in that network. Anything else
//! is a domain that matches itself and all of its subdomains; a leading dot
//! is ignored, so `example.com` and `.example.com` are equivalent.

use std::net::IpAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoProxy {
    rules: Vec<Rule>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Rule {
    Wildcard,
    Network(IpAddr, u8),
    Domain(String),
}

impl NoProxy {
    /// Parses a `NO_PROXY` value; `None` when it holds no usable entry.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let rules: Vec<Rule> = value
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(Rule::parse)
            .collect();

        (!rules.is_empty()).then_some(Self { rules })
    }

    /// Whether requests to `host` should bypass the proxy.
    #[must_use]
    pub fn matches(&self, host: &str) -> bool {
        let host = host.trim_start_matches('[').trim_end_matches(']');
        let ip = host.parse::<IpAddr>().ok();
        let host = host.to_ascii_lowercase();

        self.rules.iter().any(|rule| match rule {
            Rule::Wildcard => true,
            Rule::Network(network, prefix) => ip.is_some_and(|ip| in_network(ip, *network, *prefix)),
            Rule::Domain(domain) => {
                host == *domain
                    || host
                        .strip_suffix(domain.as_str())
                        .is_some_and(|rest| rest.ends_with('.'))
            }
        })
    }
}

impl Rule {
    fn parse(entry: &str) -> Rule {
        if entry == "*" {
            return Rule::Wildcard;
        }

        let (addr, prefix) = match entry.split_once('/') {
            Some((addr, prefix)) => (addr, prefix.parse::<u8>().ok()),
            None => (entry, None),
        };

        if let Ok(ip) = addr.parse::<IpAddr>() {
            let width = address_width(ip);
            let prefix = prefix.unwrap_or(width);
            if prefix <= width {
                return Rule::Network(ip, prefix);
            }
        }

        Rule::Domain(entry.trim_start_matches('.').to_ascii_lowercase())
    }
}

fn address_width(ip: IpAddr) -> u8 {
    match ip {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

fn as_bits(ip: IpAddr) -> u128 {
    match ip {
        IpAddr::V4(v4) => u128::from(u32::from(v4)),
        IpAddr::V6(v6) => u128::from(v6),
    }
}

fn in_network(ip: IpAddr, network: IpAddr, prefix: u8) -> bool {
    if ip.is_ipv4() != network.is_ipv4() {
        return false;
    }
    let width = address_width(ip);
    if prefix == 0 {
        return true;
    }
    let shift = u32::from(width - prefix);
    (as_bits(ip) >> shift) == (as_bits(network) >> shift)
}
