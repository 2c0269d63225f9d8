use std::io;
use std::sync::Arc;

use rustls::ClientConfig;
use rustls::pki_types::ServerName;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;

use crate::transport::TransportError;

/// Client TLS settings trusting the Mozilla root store.
pub(crate) fn client_config() -> Result<Arc<ClientConfig>, TransportError> {
    let roots = rustls::RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };

    let config =
        ClientConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
            .with_safe_default_protocol_versions()
            .map_err(|e| TransportError::Init(format!("tls: {e}")))?
            .with_root_certificates(roots)
            .with_no_client_auth();

    Ok(Arc::new(config))
}

/// Runs the TLS handshake for `host` over an established stream.
pub(crate) async fn handshake(
    config: Arc<ClientConfig>,
    host: &str,
    stream: TcpStream,
) -> Result<TlsStream<TcpStream>, TransportError> {
    let server_name = ServerName::try_from(host.to_owned()).map_err(|e| TransportError::Tls {
        host: host.to_owned(),
        source: io::Error::new(io::ErrorKind::InvalidInput, e),
    })?;

    TlsConnector::from(config)
        .connect(server_name, stream)
        .await
        .map_err(|source| TransportError::Tls {
            host: host.to_owned(),
            source,
        })
}
