use url::Url;

use super::env::EnvProxy;
use super::spec::{ProxySettings, parse_proxy_spec};

/// Where a client's proxy comes from.
///
/// The builder keeps a single slot for this, so the last proxy setter called
/// decides the source. It is resolved exactly once, when the client is built.
#[derive(Clone, PartialEq, Eq)]
pub enum ProxySource {
    /// Settings given directly; the spec parser is bypassed.
    Literal(ProxySettings),
    /// A raw spec string, parsed at build time.
    Spec(String),
    /// The process environment, read at build time.
    Environment,
}

impl ProxySource {
    /// Resolves the source for requests to `target`.
    ///
    /// A spec that does not parse resolves to `None`, the same as no proxy.
    #[must_use]
    pub fn resolve(&self, target: &Url) -> Option<ProxySettings> {
        self.resolve_with(target, EnvProxy::from_env)
    }

    pub(crate) fn resolve_with<F>(&self, target: &Url, environment: F) -> Option<ProxySettings>
    where
        F: FnOnce() -> EnvProxy,
    {
        match self {
            ProxySource::Literal(settings) => Some(settings.clone()),
            ProxySource::Spec(spec) => {
                let parsed = parse_proxy_spec(Some(spec));
                if parsed.is_none() && !spec.is_empty() {
                    tracing::debug!(
                        target: "mgmt_client::proxy",
                        "proxy spec does not match http://[user[:pass]@]host:port; using no proxy"
                    );
                }
                parsed
            }
            ProxySource::Environment => environment().for_target(target),
        }
    }
}

impl std::fmt::Debug for ProxySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProxySource::Literal(settings) => f.debug_tuple("Literal").field(settings).finish(),
            // raw specs may embed a password
            ProxySource::Spec(_) => f.write_str("Spec(..)"),
            ProxySource::Environment => f.write_str("Environment"),
        }
    }
}
