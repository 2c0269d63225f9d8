//! Client configuration
//!
//! The builder accumulates options into the types below; `build()` validates
//! them once and freezes them into a [`ClientConfig`] that never changes for
//! the lifetime of the client.

use std::fmt;
use std::time::Duration;

use url::Url;

pub mod defaults;
pub mod strategy;
pub mod validation;

pub use strategy::{ConnectionStrategy, ProxyRoute, TransportConfig, select_strategy};
pub use validation::{ConfigError, ConfigValidator};

use crate::proxy::ProxySettings;

/// Whether the transport keeps a pool of connections or a single one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PoolingMode {
    /// One connection at a time; pool options are ignored.
    Single,
    /// A bounded pool of reusable connections.
    #[default]
    Pooled,
}

/// Socket-level options, applied in both pooling modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketConfig {
    /// Bound on establishing a connection, tunnel and TLS included.
    pub connection_timeout: Option<Duration>,
    /// Bound on waiting for and reading a response.
    pub socket_timeout: Option<Duration>,
    /// `SO_SNDBUF`/`SO_RCVBUF` size in bytes; operating system default if unset.
    pub socket_buffer_size: Option<usize>,
    pub tcp_no_delay: bool,
    pub expect_continue: bool,
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            connection_timeout: None,
            socket_timeout: None,
            socket_buffer_size: None,
            tcp_no_delay: defaults::TCP_NO_DELAY,
            expect_continue: defaults::EXPECT_CONTINUE,
        }
    }
}

/// Pool options, only meaningful in [`PoolingMode::Pooled`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_total_connections: usize,
    /// How long a request waits for a free connection; unbounded if `None`.
    pub max_connection_pool_timeout: Option<Duration>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_total_connections: defaults::MAX_TOTAL_CONNECTIONS,
            max_connection_pool_timeout: Some(defaults::MAX_CONNECTION_POOL_TIMEOUT),
        }
    }
}

/// Basic credentials for the target.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub(crate) user: String,
    pub(crate) password: Option<String>,
}

impl Credentials {
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Validated, immutable configuration of a built client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub(crate) target: Url,
    pub(crate) credentials: Option<Credentials>,
    pub(crate) pooling_mode: PoolingMode,
    pub(crate) pool: PoolConfig,
    pub(crate) content_charset: String,
    pub(crate) user_agent: String,
    pub(crate) proxy: Option<ProxySettings>,
    pub(crate) transport: TransportConfig,
}

impl ClientConfig {
    #[must_use]
    pub fn target(&self) -> &Url {
        &self.target
    }

    #[must_use]
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    #[must_use]
    pub fn pooling_mode(&self) -> PoolingMode {
        self.pooling_mode
    }

    #[must_use]
    pub fn pool(&self) -> &PoolConfig {
        &self.pool
    }

    #[must_use]
    pub fn socket(&self) -> &SocketConfig {
        &self.transport.socket
    }

    #[must_use]
    pub fn content_charset(&self) -> &str {
        &self.content_charset
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// The proxy resolved at build time, if any.
    #[must_use]
    pub fn proxy(&self) -> Option<&ProxySettings> {
        self.proxy.as_ref()
    }

    /// The descriptor handed to the transport provider.
    #[must_use]
    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }
}
