//! Default transport over `hyper` HTTP/1 client connections
//!
//! Each transport owns a current-thread `tokio` runtime that only runs while
//! a caller is inside [`Transport::send`]; no threads are started. Requests
//! go through a [`ConnectionPool`](pool::ConnectionPool) sized by the
//! connection strategy, so a single-connection client and a pooled client
//! share the same code path.

use std::time::Duration;

use bytes::Bytes;
use http::header::{HOST, PROXY_AUTHORIZATION};
use http::uri::{PathAndQuery, Scheme};
use http::{HeaderMap, HeaderValue, Method, Uri};
use http_body_util::{BodyExt, Full};
use hyper_util::rt::TokioIo;
use tokio::runtime::Runtime;

mod connect;
mod pool;
mod stream;
mod tls;
mod tunnel;

use self::connect::{Connector, Endpoint};
use self::pool::{ConnectionPool, Sender};
use super::{Transport, TransportError, TransportProvider};
use crate::config::TransportConfig;
use crate::http::HttpResponse;

/// Builds [`HyperTransport`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct HyperTransportProvider;

impl TransportProvider for HyperTransportProvider {
    fn create(&self, config: &TransportConfig) -> Result<Box<dyn Transport>, TransportError> {
        Ok(Box::new(HyperTransport::new(config)?))
    }
}

/// Blocking HTTP/1 transport with TLS, proxy support and a bounded pool.
///
/// Must not be called from inside an async runtime; such calls fail with
/// [`TransportError::Init`] instead of blocking an executor thread.
#[derive(Debug)]
pub struct HyperTransport {
    runtime: Option<Runtime>,
    pool: ConnectionPool,
    connector: Connector,
    socket_timeout: Option<Duration>,
}

impl HyperTransport {
    /// # Errors
    ///
    /// [`TransportError::Init`] if the runtime or TLS settings cannot be created.
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| TransportError::Init(format!("runtime: {e}")))?;

        let connector = Connector::new(config.socket.clone(), config.proxy.clone())
            .with_tls(tls::client_config()?);

        tracing::debug!(
            target: "mgmt_client::transport",
            strategy = ?config.strategy,
            proxied = config.proxy.is_some(),
            "transport created"
        );

        Ok(Self {
            runtime: Some(runtime),
            pool: ConnectionPool::new(&config.strategy),
            connector,
            socket_timeout: config.socket.socket_timeout,
        })
    }

    async fn dispatch(&self, request: http::Request<Bytes>) -> Result<HttpResponse, TransportError> {
        let (parts, body) = request.into_parts();
        let https = parts.uri.scheme() == Some(&Scheme::HTTPS);
        let target = Endpoint::from_uri(&parts.uri)
            .ok_or_else(|| TransportError::InvalidRequest(format!("{} is not absolute", parts.uri)))?;

        let mut headers = parts.headers;
        if !headers.contains_key(HOST) {
            headers.insert(HOST, host_header(&parts.uri, &target)?);
        }

        let uri = match self.connector.proxy() {
            // plain http through a proxy is sent in absolute form
            Some(route) if !https => {
                if let Some(authorization) = &route.authorization {
                    headers.insert(PROXY_AUTHORIZATION, authorization.clone());
                }
                parts.uri
            }
            _ => origin_form(&parts.uri)?,
        };

        let mut lease = self.pool.acquire().await?;
        let mut idle = lease.take();

        loop {
            let reused = idle.is_some();
            let mut sender = match idle.take() {
                Some(sender) => sender,
                None => self.open(&target, https).await?,
            };

            if let Err(e) = sender.ready().await {
                if reused {
                    tracing::debug!(target: "mgmt_client::pool", error = %e, "idle connection is gone, reconnecting");
                    continue;
                }
                return Err(e.into());
            }

            let request = build_request(&parts.method, &uri, &headers, &body);
            match self.exchange(&mut sender, request).await {
                Ok(response) => {
                    lease.put(sender);
                    tracing::trace!(
                        target: "mgmt_client::pool",
                        idle = self.pool.idle_count(),
                        reused,
                        "exchange complete"
                    );
                    return Ok(response);
                }
                // Only a request hyper never wrote may go out again.
                Err(TransportError::Http(e)) if reused && e.is_canceled() => {
                    tracing::debug!(target: "mgmt_client::pool", error = %e, "stale connection, reconnecting");
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn open(&self, target: &Endpoint, https: bool) -> Result<Sender, TransportError> {
        let stream = self.connector.connect(target, https).await?;
        let (sender, connection) = hyper::client::conn::http1::Builder::new()
            .handshake(TokioIo::new(stream))
            .await?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::debug!(target: "mgmt_client::transport", error = %e, "connection closed with error");
            }
        });

        Ok(sender)
    }

    async fn exchange(
        &self,
        sender: &mut Sender,
        request: http::Request<Full<Bytes>>,
    ) -> Result<HttpResponse, TransportError> {
        let exchange = async {
            let response = sender.send_request(request).await?;
            let (parts, body) = response.into_parts();
            let body = body.collect().await?.to_bytes();
            Ok::<_, TransportError>(HttpResponse::new(parts.status, parts.headers, body))
        };

        match self.socket_timeout {
            Some(timeout) => tokio::time::timeout(timeout, exchange)
                .await
                .map_err(|_| TransportError::SocketTimeout(timeout))?,
            None => exchange.await,
        }
    }
}

impl Transport for HyperTransport {
    fn send(&self, request: http::Request<Bytes>) -> Result<HttpResponse, TransportError> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(TransportError::Init(
                "blocking transport called from inside an async runtime".to_owned(),
            ));
        }

        let runtime = self
            .runtime
            .as_ref()
            .ok_or_else(|| TransportError::Init("transport is shut down".to_owned()))?;
        runtime.block_on(self.dispatch(request))
    }
}

impl Drop for HyperTransport {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
            tracing::debug!(target: "mgmt_client::transport", "transport released");
        }
    }
}

fn build_request(
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    body: &Bytes,
) -> http::Request<Full<Bytes>> {
    let mut request = http::Request::new(Full::new(body.clone()));
    *request.method_mut() = method.clone();
    *request.uri_mut() = uri.clone();
    *request.headers_mut() = headers.clone();
    request
}

fn origin_form(uri: &Uri) -> Result<Uri, TransportError> {
    let path = uri.path_and_query().map_or("/", PathAndQuery::as_str);
    path.parse()
        .map_err(|e| TransportError::InvalidRequest(format!("{uri}: {e}")))
}

fn host_header(uri: &Uri, target: &Endpoint) -> Result<HeaderValue, TransportError> {
    let host = match uri.port_u16() {
        Some(_) => target.authority(),
        None if target.host.contains(':') => format!("[{}]", target.host),
        None => target.host.clone(),
    };
    HeaderValue::from_str(&host).map_err(|e| TransportError::InvalidRequest(format!("host {host}: {e}")))
}
