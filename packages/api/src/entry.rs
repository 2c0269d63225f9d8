//! Static entry points
//!
//! Every [`ClientBuilder`] option is also available as an associated
//! function of [`Mgmt`] that starts a fresh builder, so a configuration can
//! begin with whichever option reads best.

use std::sync::Arc;

use mgmt_client::cookie::CookieStore;
use mgmt_client::transport::TransportProvider;
use mgmt_client::{Client, ClientBuilder, HttpResponse, PoolingMode};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::request::ManagementRequest;

/// Main entry point.
///
/// ```
/// use mgmt::{Mgmt, PoolingMode};
///
/// let client = Mgmt::single_connection()
///     .url("http://localhost:8778/jolokia")
///     .build()
///     .unwrap();
/// assert_eq!(client.config().pooling_mode(), PoolingMode::Single);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Mgmt;

impl Mgmt {
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    #[must_use]
    pub fn url(url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new().url(url)
    }

    #[must_use]
    pub fn user(user: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new().user(user)
    }

    #[must_use]
    pub fn password(password: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new().password(password)
    }

    #[must_use]
    pub fn connection_timeout(ms: u64) -> ClientBuilder {
        ClientBuilder::new().connection_timeout(ms)
    }

    #[must_use]
    pub fn socket_timeout(ms: u64) -> ClientBuilder {
        ClientBuilder::new().socket_timeout(ms)
    }

    #[must_use]
    pub fn expect_continue(enabled: bool) -> ClientBuilder {
        ClientBuilder::new().expect_continue(enabled)
    }

    #[must_use]
    pub fn tcp_no_delay(enabled: bool) -> ClientBuilder {
        ClientBuilder::new().tcp_no_delay(enabled)
    }

    #[must_use]
    pub fn socket_buffer_size(bytes: usize) -> ClientBuilder {
        ClientBuilder::new().socket_buffer_size(bytes)
    }

    #[must_use]
    pub fn content_charset(charset: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new().content_charset(charset)
    }

    #[must_use]
    pub fn max_connection_pool_timeout(ms: u64) -> ClientBuilder {
        ClientBuilder::new().max_connection_pool_timeout(ms)
    }

    #[must_use]
    pub fn max_total_connections(max: usize) -> ClientBuilder {
        ClientBuilder::new().max_total_connections(max)
    }

    #[must_use]
    pub fn single_connection() -> ClientBuilder {
        ClientBuilder::new().single_connection()
    }

    #[must_use]
    pub fn pooled_connections() -> ClientBuilder {
        ClientBuilder::new().pooled_connections()
    }

    #[must_use]
    pub fn pooling_mode(mode: PoolingMode) -> ClientBuilder {
        ClientBuilder::new().pooling_mode(mode)
    }

    #[must_use]
    pub fn cookie_store(store: Arc<dyn CookieStore>) -> ClientBuilder {
        ClientBuilder::new().cookie_store(store)
    }

    #[must_use]
    pub fn proxy(host: impl Into<String>, port: u16) -> ClientBuilder {
        ClientBuilder::new().proxy(host, port)
    }

    #[must_use]
    pub fn proxy_with_credentials(
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> ClientBuilder {
        ClientBuilder::new().proxy_with_credentials(host, port, user, password)
    }

    #[must_use]
    pub fn proxy_spec(spec: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new().proxy_spec(spec)
    }

    #[must_use]
    pub fn use_proxy_from_environment() -> ClientBuilder {
        ClientBuilder::new().use_proxy_from_environment()
    }

    #[must_use]
    pub fn user_agent(user_agent: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new().user_agent(user_agent)
    }

    #[must_use]
    pub fn transport_provider(provider: Arc<dyn TransportProvider>) -> ClientBuilder {
        ClientBuilder::new().transport_provider(provider)
    }

    /// Sends `request` and returns the raw response.
    ///
    /// # Errors
    ///
    /// [`Error::Encode`] if the payload cannot be serialized, otherwise the
    /// client's error.
    pub fn execute<R>(client: &Client, request: &R) -> Result<HttpResponse>
    where
        R: ManagementRequest + ?Sized,
    {
        let message = request.to_http()?;
        log::debug!("executing {} against {}", message.method(), client.target());
        Ok(client.execute(&message)?)
    }

    /// Sends `request` and decodes the response body as JSON.
    ///
    /// The status code is not checked; agents usually report failures in
    /// the body, so an error document decodes like any other.
    ///
    /// # Errors
    ///
    /// As [`execute`](Self::execute), plus [`Error::Decode`] when the body
    /// is not a valid `T`.
    pub fn execute_json<T, R>(client: &Client, request: &R) -> Result<T>
    where
        T: DeserializeOwned,
        R: ManagementRequest + ?Sized,
    {
        let response = Self::execute(client, request)?;
        response.json().map_err(|source| {
            log::warn!(
                "response from {} with status {} is not the expected json: {source}",
                client.target(),
                response.status()
            );
            Error::Decode {
                status: response.status(),
                source,
            }
        })
    }
}
