//! Transport capability
//!
//! A [`TransportProvider`] turns the [`TransportConfig`] chosen at build time
//! into a [`Transport`] that sends fully prepared requests. The client owns
//! the transport behind an `Arc`, so it is dropped exactly once, together
//! with the last client handle.
//!
//! [`HyperTransportProvider`] is the default; tests and embedders may
//! supply their own through
//! [`ClientBuilder::transport_provider`](crate::ClientBuilder::transport_provider).

use std::fmt;

use bytes::Bytes;

use crate::config::TransportConfig;
use crate::http::HttpResponse;

mod error;
pub mod hyper;

pub use self::error::TransportError;
pub use self::hyper::HyperTransportProvider;

/// Builds transports from a connection strategy descriptor.
pub trait TransportProvider: Send + Sync + fmt::Debug {
    /// # Errors
    ///
    /// Returns [`TransportError::Init`] when the transport cannot be set up.
    fn create(&self, config: &TransportConfig) -> Result<Box<dyn Transport>, TransportError>;
}

/// Sends requests to the client's target.
///
/// Requests arrive with an absolute URI and every header the client adds
/// already set. Implementations must be safe to call from several threads
/// at once and must respect the connection limit of their strategy.
pub trait Transport: Send + Sync + fmt::Debug {
    /// Sends `request` and waits for the complete response.
    ///
    /// # Errors
    ///
    /// Any [`TransportError`]; connection-level variants become
    /// [`Kind::Connect`](crate::Kind::Connect) errors in the client.
    fn send(&self, request: http::Request<Bytes>) -> Result<HttpResponse, TransportError>;
}
