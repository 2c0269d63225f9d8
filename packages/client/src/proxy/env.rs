//! Proxy configuration taken from the process environment
//!
//! Values are read from the conventional variables, lower-case before
//! upper-case: `http_proxy` for `http` targets, `https_proxy` for `https`
//! targets, `all_proxy` as a fallback for both, and `no_proxy` for
//! exclusions. They are trusted to be URLs and are parsed as such, not run
//! through the proxy spec grammar.

use url::{Host, Url};

use super::no_proxy::NoProxy;
use super::spec::ProxySettings;

const HTTP_KEYS: [&str; 2] = ["http_proxy", "HTTP_PROXY"];
const HTTPS_KEYS: [&str; 2] = ["https_proxy", "HTTPS_PROXY"];
const ALL_KEYS: [&str; 2] = ["all_proxy", "ALL_PROXY"];
const NO_PROXY_KEYS: [&str; 2] = ["no_proxy", "NO_PROXY"];

/// Snapshot of the proxy-related environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvProxy {
    http: Option<String>,
    https: Option<String>,
    all: Option<String>,
    no_proxy: Option<NoProxy>,
}

impl EnvProxy {
    /// Reads the variables of the current process.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the variables through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| {
            keys.iter()
                .filter_map(|&key| lookup(key))
                .map(|value| value.trim().to_owned())
                .find(|value| !value.is_empty())
        };

        Self {
            http: first(&HTTP_KEYS),
            https: first(&HTTPS_KEYS),
            all: first(&ALL_KEYS),
            no_proxy: first(&NO_PROXY_KEYS).and_then(|value| NoProxy::parse(&value)),
        }
    }

    /// The proxy to use for requests to `target`, if any.
    #[must_use]
    pub fn for_target(&self, target: &Url) -> Option<ProxySettings> {
        if let (Some(no_proxy), Some(host)) = (&self.no_proxy, target.host_str())
            && no_proxy.matches(host)
        {
            tracing::debug!(
                target: "mgmt_client::proxy",
                host = %host,
                "target excluded from environment proxy by no_proxy"
            );
            return None;
        }

        let scheme_specific = match target.scheme() {
            "https" => self.https.as_deref(),
            _ => self.http.as_deref(),
        };
        let raw = scheme_specific.or(self.all.as_deref())?;

        let settings = proxy_from_url(raw);
        if settings.is_none() {
            tracing::warn!(
                target: "mgmt_client::proxy",
                "environment proxy is not a usable http:// URL; continuing without proxy"
            );
        }
        settings
    }
}

fn proxy_from_url(raw: &str) -> Option<ProxySettings> {
    let url = if raw.contains("://") {
        Url::parse(raw).ok()?
    } else {
        Url::parse(&format!("http://{raw}")).ok()?
    };

    if url.scheme() != "http" {
        return None;
    }

    let host = match url.host()? {
        Host::Domain(domain) => domain.to_owned(),
        Host::Ipv4(addr) => addr.to_string(),
        Host::Ipv6(addr) => addr.to_string(),
    };
    let port = url.port_or_known_default()?;

    let user = Some(url.username())
        .filter(|user| !user.is_empty())
        .map(decode);
    let pass = url.password().map(decode);

    Some(ProxySettings::new(host, port).with_user_parts(user, pass))
}

fn decode(component: &str) -> String {
    urlencoding::decode(component)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| component.to_owned())
}
