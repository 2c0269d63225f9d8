//! Establishing connections to the target, directly or through a proxy

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use http::Uri;
use http::uri::Scheme;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::{TcpSocket, TcpStream};

use super::stream::MaybeTlsStream;
use super::{tls, tunnel};
use crate::config::{ProxyRoute, SocketConfig};
use crate::transport::TransportError;

/// Where a new connection goes first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Endpoint {
    pub(crate) host: String,
    pub(crate) port: u16,
}

impl Endpoint {
    /// Host and port an absolute `http`/`https` URI addresses.
    pub(crate) fn from_uri(uri: &Uri) -> Option<Self> {
        let host = uri.host()?.trim_start_matches('[').trim_end_matches(']');
        let default_port = if uri.scheme() == Some(&Scheme::HTTPS) { 443 } else { 80 };
        Some(Self {
            host: host.to_owned(),
            port: uri.port_u16().unwrap_or(default_port),
        })
    }

    pub(crate) fn authority(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

#[derive(Debug)]
pub(crate) struct Connector {
    socket: SocketConfig,
    proxy: Option<ProxyRoute>,
    tls: Option<Arc<rustls::ClientConfig>>,
}

impl Connector {
    pub(crate) fn new(socket: SocketConfig, proxy: Option<ProxyRoute>) -> Self {
        Self {
            socket,
            proxy,
            tls: None,
        }
    }

    pub(crate) fn with_tls(mut self, config: Arc<rustls::ClientConfig>) -> Self {
        self.tls = Some(config);
        self
    }

    pub(crate) fn proxy(&self) -> Option<&ProxyRoute> {
        self.proxy.as_ref()
    }

    /// Opens a connection ready for HTTP/1 requests to `target`.
    ///
    /// The connection timeout, when set, covers resolution, the TCP connect,
    /// any proxy tunnel and the TLS handshake together.
    pub(crate) async fn connect(
        &self,
        target: &Endpoint,
        https: bool,
    ) -> Result<MaybeTlsStream, TransportError> {
        let first_hop = match &self.proxy {
            Some(route) => Endpoint {
                host: route.settings.host().to_owned(),
                port: route.settings.port(),
            },
            None => target.clone(),
        };

        let attempt = self.connect_via(&first_hop, target, https);
        match self.socket.connection_timeout {
            Some(timeout) => tokio::time::timeout(timeout, attempt)
                .await
                .map_err(|_| TransportError::ConnectTimeout {
                    address: first_hop.authority(),
                    timeout,
                })?,
            None => attempt.await,
        }
    }

    async fn connect_via(
        &self,
        first_hop: &Endpoint,
        target: &Endpoint,
        https: bool,
    ) -> Result<MaybeTlsStream, TransportError> {
        let mut stream = self.connect_tcp(first_hop).await?;

        if !https {
            return Ok(MaybeTlsStream::Plain(stream));
        }

        if let Some(route) = &self.proxy {
            stream = tunnel::establish(
                stream,
                &first_hop.authority(),
                &target.authority(),
                route.authorization.as_ref(),
            )
            .await?;
        }

        let config = self
            .tls
            .clone()
            .ok_or_else(|| TransportError::Init("https target without tls configuration".to_owned()))?;
        let tls = tls::handshake(config, &target.host, stream).await?;
        Ok(MaybeTlsStream::Tls(Box::new(tls)))
    }

    async fn connect_tcp(&self, endpoint: &Endpoint) -> Result<TcpStream, TransportError> {
        let addrs = resolve_host(&endpoint.host, endpoint.port).await?;
        let mut last_error = None;

        for addr in addrs {
            match self.connect_addr(addr).await {
                Ok(stream) => {
                    tracing::debug!(
                        target: "mgmt_client::connect",
                        address = %addr,
                        host = %endpoint.host,
                        "connected"
                    );
                    return Ok(stream);
                }
                Err(e) => {
                    tracing::debug!(
                        target: "mgmt_client::connect",
                        address = %addr,
                        error = %e,
                        "connect attempt failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(TransportError::Connect {
            address: endpoint.authority(),
            source: last_error.unwrap_or_else(|| io::Error::other("no addresses to connect to")),
        })
    }

    async fn connect_addr(&self, addr: SocketAddr) -> io::Result<TcpStream> {
        let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
        if let Some(size) = self.socket.socket_buffer_size {
            socket.set_send_buffer_size(size)?;
            socket.set_recv_buffer_size(size)?;
        }
        socket.set_nonblocking(true)?;

        let socket = TcpSocket::from_std_stream(socket.into());
        let stream = socket.connect(addr).await?;
        stream.set_nodelay(self.socket.tcp_no_delay)?;
        Ok(stream)
    }
}

/// Resolves `host` with the system resolver off the runtime thread; IP
/// literals skip the lookup.
pub(crate) async fn resolve_host(host: &str, port: u16) -> Result<Vec<SocketAddr>, TransportError> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(vec![SocketAddr::new(ip, port)]);
    }

    let resolve_error = |source| TransportError::Resolve {
        host: host.to_owned(),
        source,
    };

    let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host, port))
        .await
        .map_err(resolve_error)?
        .collect();
    if addrs.is_empty() {
        return Err(resolve_error(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no addresses resolved for {host}"),
        )));
    }
    Ok(addrs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_uses_known_default_ports() {
        let uri = Uri::from_static("http://localhost/jolokia");
        let http = Endpoint::from_uri(&uri).expect("endpoint");
        assert_eq!(http.authority(), "localhost:80");

        let uri = Uri::from_static("https://10.0.0.1/jolokia");
        let https = Endpoint::from_uri(&uri).expect("endpoint");
        assert_eq!(https.authority(), "10.0.0.1:443");
    }

    #[test]
    fn ipv6_authority_is_bracketed() {
        let uri = Uri::from_static("http://[::1]:8778/jolokia");
        let endpoint = Endpoint::from_uri(&uri).expect("endpoint");
        assert_eq!(endpoint.host, "::1");
        assert_eq!(endpoint.authority(), "[::1]:8778");
    }

    #[tokio::test]
    async fn ip_literals_skip_resolution() {
        let addrs = resolve_host("127.0.0.1", 8080).await.expect("literal");
        assert_eq!(addrs, vec![SocketAddr::from(([127, 0, 0, 1], 8080))]);
    }

    #[tokio::test]
    async fn localhost_resolves_to_loopback() {
        let addrs = resolve_host("localhost", 8778).await.expect("localhost");
        assert!(addrs.iter().all(|addr| addr.ip().is_loopback() && addr.port() == 8778));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn connect_timeout_names_the_first_hop() {
        let socket = SocketConfig {
            connection_timeout: Some(Duration::from_millis(100)),
            ..SocketConfig::default()
        };
        let connector = Connector::new(socket, None);
        let target = Endpoint {
            host: "10.255.255.1".to_owned(),
            port: 8778,
        };

        let err = connector.connect(&target, false).await.expect_err("unroutable");
        assert!(err.is_connect_failure());
        assert!(err.to_string().contains("10.255.255.1:8778"), "{err}");
    }

    #[tokio::test]
    async fn refused_connection_names_the_endpoint() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().expect("addr").port()
        };
        let connector = Connector::new(SocketConfig::default(), None);
        let target = Endpoint {
            host: "127.0.0.1".to_owned(),
            port,
        };

        let err = connector.connect(&target, false).await.expect_err("closed port");
        assert!(err.is_connect_failure());
        assert!(err.to_string().contains(&format!("127.0.0.1:{port}")), "{err}");
    }
}
