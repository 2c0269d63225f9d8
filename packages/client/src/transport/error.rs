use std::io;
use std::time::Duration;

use http::StatusCode;

/// Failure inside a transport.
///
/// Every variant except [`InvalidRequest`](Self::InvalidRequest) and
/// [`Init`](Self::Init) means the destination could not be reached or did
/// not answer in time; the client reports those as connect errors.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to resolve {host}: {source}")]
    Resolve { host: String, source: io::Error },

    #[error("connection to {address} failed: {source}")]
    Connect { address: String, source: io::Error },

    #[error("connection to {address} timed out after {timeout:?}")]
    ConnectTimeout { address: String, timeout: Duration },

    #[error("proxy {proxy} refused to tunnel to {target}: {status}")]
    Tunnel {
        proxy: String,
        target: String,
        status: String,
    },

    #[error("tls handshake with {host} failed: {source}")]
    Tls { host: String, source: io::Error },

    #[error("no response within {0:?}")]
    SocketTimeout(Duration),

    #[error("no connection available within {timeout:?} (pool of {max_total})")]
    PoolTimeout { timeout: Duration, max_total: usize },

    #[error("http exchange failed: {0}")]
    Http(#[from] hyper::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("transport initialisation failed: {0}")]
    Init(String),
}

impl TransportError {
    /// Whether the destination could not be reached or did not answer.
    #[must_use]
    pub fn is_connect_failure(&self) -> bool {
        !matches!(
            self,
            TransportError::InvalidRequest(_) | TransportError::Init(_)
        )
    }

    pub(crate) fn tunnel_status(proxy: &str, target: &str, status: StatusCode) -> Self {
        TransportError::Tunnel {
            proxy: proxy.to_owned(),
            target: target.to_owned(),
            status: status.to_string(),
        }
    }
}
