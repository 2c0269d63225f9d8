//! Connection strategy selection
//!
//! Turns the frozen pooling, pool, socket and proxy options into the
//! [`TransportConfig`] descriptor a transport provider builds from. Pure
//! apart from logging: the same inputs always give the same descriptor.

use std::time::Duration;

use http::HeaderValue;

use super::validation::ConfigError;
use super::{PoolConfig, PoolingMode, SocketConfig};
use crate::proxy::ProxySettings;

/// How many connections a transport may hold and how long a request waits
/// for one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStrategy {
    /// Exactly one connection, reused across requests. Concurrent calls
    /// queue for it without a bound.
    Single,
    Pooled {
        max_total: usize,
        acquire_timeout: Option<Duration>,
    },
}

impl ConnectionStrategy {
    #[must_use]
    pub fn max_connections(&self) -> usize {
        match self {
            ConnectionStrategy::Single => 1,
            ConnectionStrategy::Pooled { max_total, .. } => *max_total,
        }
    }

    /// `None` means a request waits for a connection indefinitely.
    #[must_use]
    pub fn acquire_timeout(&self) -> Option<Duration> {
        match self {
            ConnectionStrategy::Single => None,
            ConnectionStrategy::Pooled {
                acquire_timeout, ..
            } => *acquire_timeout,
        }
    }
}

/// A proxy every connection is routed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRoute {
    pub settings: ProxySettings,
    /// Sent as `Proxy-Authorization`, present when the proxy has a user.
    pub authorization: Option<HeaderValue>,
}

/// Everything a transport provider needs to build a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub strategy: ConnectionStrategy,
    pub proxy: Option<ProxyRoute>,
    pub socket: SocketConfig,
}

/// Chooses between a single connection and a bounded pool.
///
/// In [`PoolingMode::Single`] the pool options are ignored. Socket options
/// are carried over unchanged in both modes. Pool sizes are taken as given;
/// [`ConfigValidator::validate_pool_size`](super::ConfigValidator::validate_pool_size)
/// rejects an empty pool before a client gets here.
///
/// # Errors
///
/// `InvalidProxy` if the proxy credentials cannot be encoded as a header.
pub fn select_strategy(
    mode: PoolingMode,
    pool: &PoolConfig,
    socket: &SocketConfig,
    proxy: Option<&ProxySettings>,
) -> Result<TransportConfig, ConfigError> {
    let strategy = match mode {
        PoolingMode::Single => ConnectionStrategy::Single,
        PoolingMode::Pooled => ConnectionStrategy::Pooled {
            max_total: pool.max_total_connections,
            acquire_timeout: pool.max_connection_pool_timeout,
        },
    };

    let proxy = proxy
        .map(|settings| {
            let authorization = settings.authorization().map_err(|_| {
                ConfigError::InvalidProxy(format!(
                    "credentials for proxy {} cannot be sent as a header",
                    settings.authority()
                ))
            })?;
            Ok::<_, ConfigError>(ProxyRoute {
                settings: settings.clone(),
                authorization,
            })
        })
        .transpose()?;

    tracing::debug!(
        target: "mgmt_client::config",
        ?strategy,
        proxy = ?proxy.as_ref().map(|route| route.settings.authority()),
        "selected connection strategy"
    );

    Ok(TransportConfig {
        strategy,
        proxy,
        socket: socket.clone(),
    })
}
