use std::fmt;
use std::sync::Arc;

use url::Url;

use super::prepare::Prepared;
use crate::builder::ClientBuilder;
use crate::config::ClientConfig;
use crate::cookie::{CookieStore, store_response_cookies};
use crate::error::{self, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, TransportError};

/// A configured client for one management agent.
///
/// Built once by [`ClientBuilder::build`] and never reconfigured. Clones are
/// cheap and share the transport; the transport is released when the last
/// clone is dropped. `execute` may be called from several threads at once.
///
/// ```no_run
/// use mgmt_client::{Client, HttpRequest};
///
/// # fn main() -> mgmt_client::Result<()> {
/// let client = Client::url("http://localhost:8778/jolokia")
///     .user("jolokia")
///     .password("s3cret")
///     .single_connection()
///     .build()?;
///
/// let response = client.execute(&HttpRequest::get("version"))?;
/// println!("{}", response.text());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientRef>,
}

struct ClientRef {
    config: ClientConfig,
    prepared: Prepared,
    cookie_store: Option<Arc<dyn CookieStore>>,
    transport: Box<dyn Transport>,
}

impl Client {
    /// A builder with nothing set.
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// A builder targeting `url`.
    #[must_use]
    pub fn url(url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new().url(url)
    }

    pub(crate) fn from_parts(
        config: ClientConfig,
        prepared: Prepared,
        cookie_store: Option<Arc<dyn CookieStore>>,
        transport: Box<dyn Transport>,
    ) -> Client {
        Client {
            inner: Arc::new(ClientRef {
                config,
                prepared,
                cookie_store,
                transport,
            }),
        }
    }

    /// The target URL requests are sent to.
    #[must_use]
    pub fn target(&self) -> &Url {
        &self.inner.config.target
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Sends `request` and blocks until the complete response arrived.
    ///
    /// The status code is not interpreted: a `404` or `500` is returned as
    /// an ordinary response.
    ///
    /// # Errors
    ///
    /// [`Kind::Connect`](crate::Kind::Connect) when the target or proxy
    /// cannot be reached, does not answer within the socket timeout, or no
    /// pooled connection frees up in time. The message names the target and
    /// the address that failed. [`Kind::Request`](crate::Kind::Request) when
    /// the request cannot be encoded.
    pub fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let inner = &*self.inner;
        let url = request.resolve_url(&inner.config.target);
        let message = inner
            .prepared
            .message(request, &url, inner.cookie_store.as_deref())?;

        tracing::trace!(
            target: "mgmt_client::client",
            method = %request.method(),
            url = %url,
            "executing request"
        );

        match inner.transport.send(message) {
            Ok(response) => {
                if let Some(store) = inner.cookie_store.as_deref() {
                    store_response_cookies(response.headers(), store, &url);
                }
                tracing::debug!(
                    target: "mgmt_client::client",
                    status = response.status().as_u16(),
                    url = %url,
                    "response received"
                );
                Ok(response)
            }
            Err(err) => Err(self.translate(err)),
        }
    }

    fn translate(&self, err: TransportError) -> error::Error {
        let target = &self.inner.config.target;

        if err.is_connect_failure() {
            tracing::debug!(
                target: "mgmt_client::client",
                error = %err,
                target_url = %target,
                "request failed to reach the target"
            );
            return error::connect(err, target.clone());
        }

        match err {
            TransportError::Init(_) => error::configuration(err),
            _ => error::request(err),
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("target", &self.inner.config.target.as_str())
            .field("pooling_mode", &self.inner.config.pooling_mode)
            .field("proxy", &self.inner.config.proxy)
            .field("transport", &self.inner.transport)
            .finish_non_exhaustive()
    }
}
