//! Fluent client configuration
//!
//! [`ClientBuilder`] only records what it is told. Every check happens in
//! [`ClientBuilder::build`], so setters can be called in any order and as
//! often as needed; for each option the last call wins.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{PoolConfig, PoolingMode, SocketConfig, defaults};
use crate::cookie::CookieStore;
use crate::proxy::{ProxySettings, ProxySource};
use crate::transport::{HyperTransportProvider, TransportProvider};

mod build;

/// Accumulates client options until [`build`](Self::build) is called.
///
/// ```
/// use mgmt_client::ClientBuilder;
///
/// let builder = ClientBuilder::new()
///     .url("http://localhost:8778/jolokia")
///     .connection_timeout(2_000)
///     .max_total_connections(4)
///     .proxy_spec("http://proxy.example.com:3128");
///
/// let client = builder.build().unwrap();
/// assert_eq!(client.config().pool().max_total_connections, 4);
/// assert_eq!(client.config().proxy().unwrap().port(), 3128);
/// ```
#[derive(Clone)]
#[must_use = "builders do nothing unless you call `build`"]
pub struct ClientBuilder {
    url: Option<String>,
    user: Option<String>,
    password: Option<String>,
    proxy: Option<ProxySource>,
    pooling_mode: PoolingMode,
    socket: SocketConfig,
    pool: PoolConfig,
    content_charset: String,
    user_agent: String,
    cookie_store: Option<Arc<dyn CookieStore>>,
    transport_provider: Arc<dyn TransportProvider>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// Millisecond options treat 0 as "no limit".
fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            url: None,
            user: None,
            password: None,
            proxy: None,
            pooling_mode: PoolingMode::default(),
            socket: SocketConfig::default(),
            pool: PoolConfig::default(),
            content_charset: defaults::CONTENT_CHARSET.to_owned(),
            user_agent: defaults::USER_AGENT.to_owned(),
            cookie_store: None,
            transport_provider: Arc::new(HyperTransportProvider),
        }
    }

    /// The agent URL, absolute `http` or `https`. Required.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// User for preemptive basic authentication.
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Bound on establishing a connection, in milliseconds. 0 means no limit.
    pub fn connection_timeout(mut self, ms: u64) -> Self {
        self.socket.connection_timeout = millis(ms);
        self
    }

    /// Bound on waiting for a response, in milliseconds. 0 means no limit.
    pub fn socket_timeout(mut self, ms: u64) -> Self {
        self.socket.socket_timeout = millis(ms);
        self
    }

    /// Send `Expect: 100-continue` with requests that carry a body.
    pub fn expect_continue(mut self, enabled: bool) -> Self {
        self.socket.expect_continue = enabled;
        self
    }

    pub fn tcp_no_delay(mut self, enabled: bool) -> Self {
        self.socket.tcp_no_delay = enabled;
        self
    }

    /// Socket send and receive buffer size in bytes.
    pub fn socket_buffer_size(mut self, bytes: usize) -> Self {
        self.socket.socket_buffer_size = Some(bytes);
        self
    }

    /// Charset appended to request bodies' content type.
    pub fn content_charset(mut self, charset: impl Into<String>) -> Self {
        self.content_charset = charset.into();
        self
    }

    /// How long a request waits for a pooled connection, in milliseconds.
    /// 0 means it waits indefinitely. Ignored for a single connection.
    pub fn max_connection_pool_timeout(mut self, ms: u64) -> Self {
        self.pool.max_connection_pool_timeout = millis(ms);
        self
    }

    /// Upper bound on open connections. Ignored for a single connection.
    pub fn max_total_connections(mut self, max: usize) -> Self {
        self.pool.max_total_connections = max;
        self
    }

    /// Use exactly one connection, shared by all requests.
    pub fn single_connection(mut self) -> Self {
        self.pooling_mode = PoolingMode::Single;
        self
    }

    /// Use a bounded pool of connections. This is the default.
    pub fn pooled_connections(mut self) -> Self {
        self.pooling_mode = PoolingMode::Pooled;
        self
    }

    pub fn pooling_mode(mut self, mode: PoolingMode) -> Self {
        self.pooling_mode = mode;
        self
    }

    /// Share `store` with the client. The caller keeps its own handle.
    pub fn cookie_store(mut self, store: Arc<dyn CookieStore>) -> Self {
        self.cookie_store = Some(store);
        self
    }

    /// Route all connections through the proxy at `host:port`.
    pub fn proxy(mut self, host: impl Into<String>, port: u16) -> Self {
        self.proxy = Some(ProxySource::Literal(ProxySettings::new(host, port)));
        self
    }

    /// Like [`proxy`](Self::proxy), authenticating with basic credentials.
    pub fn proxy_with_credentials(
        mut self,
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let settings = ProxySettings::new(host, port).with_credentials(user, password);
        self.proxy = Some(ProxySource::Literal(settings));
        self
    }

    /// A proxy spec, `http://[user[:pass]@]host:port`, parsed at build time.
    ///
    /// A spec that does not match means no proxy; it is never an error.
    pub fn proxy_spec(mut self, spec: impl Into<String>) -> Self {
        self.proxy = Some(ProxySource::Spec(spec.into()));
        self
    }

    /// Take the proxy from `http_proxy`, `https_proxy`, `all_proxy` and
    /// `no_proxy` when the client is built.
    pub fn use_proxy_from_environment(mut self) -> Self {
        self.proxy = Some(ProxySource::Environment);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Replace the default hyper-based transport.
    pub fn transport_provider(mut self, provider: Arc<dyn TransportProvider>) -> Self {
        self.transport_provider = provider;
        self
    }
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("proxy", &self.proxy)
            .field("pooling_mode", &self.pooling_mode)
            .field("socket", &self.socket)
            .field("pool", &self.pool)
            .field("content_charset", &self.content_charset)
            .field("user_agent", &self.user_agent)
            .field("cookie_store", &self.cookie_store.is_some())
            .field("transport_provider", &self.transport_provider)
            .finish()
    }
}
