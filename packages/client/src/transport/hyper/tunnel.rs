use http::{HeaderValue, StatusCode};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::transport::TransportError;

const MAX_RESPONSE_HEAD: usize = 8 * 1024;

/// Asks the proxy on `stream` to open a tunnel to `target` (`host:port`).
///
/// The proxy's response head is consumed byte by byte so nothing the target
/// sends afterwards is lost.
pub(crate) async fn establish(
    mut stream: TcpStream,
    proxy: &str,
    target: &str,
    authorization: Option<&HeaderValue>,
) -> Result<TcpStream, TransportError> {
    let io_error = |source| TransportError::Connect {
        address: proxy.to_owned(),
        source,
    };

    let mut request = format!("CONNECT {target} HTTP/1.1\r\nHost: {target}\r\n").into_bytes();
    if let Some(authorization) = authorization {
        request.extend_from_slice(b"Proxy-Authorization: ");
        request.extend_from_slice(authorization.as_bytes());
        request.extend_from_slice(b"\r\n");
    }
    request.extend_from_slice(b"\r\n");

    stream.write_all(&request).await.map_err(io_error)?;

    let mut head = Vec::with_capacity(256);
    while !head.ends_with(b"\r\n\r\n") {
        if head.len() >= MAX_RESPONSE_HEAD {
            return Err(TransportError::Tunnel {
                proxy: proxy.to_owned(),
                target: target.to_owned(),
                status: "response head too large".to_owned(),
            });
        }
        let byte = stream.read_u8().await.map_err(io_error)?;
        head.push(byte);
    }

    let status = parse_status(&head).ok_or_else(|| TransportError::Tunnel {
        proxy: proxy.to_owned(),
        target: target.to_owned(),
        status: "malformed response".to_owned(),
    })?;

    if !status.is_success() {
        return Err(TransportError::tunnel_status(proxy, target, status));
    }

    tracing::debug!(target: "mgmt_client::connect", proxy, target, "tunnel established");
    Ok(stream)
}

/// Status code of an `HTTP/1.x NNN reason` status line.
fn parse_status(head: &[u8]) -> Option<StatusCode> {
    let line = head.split(|&b| b == b'\n').next()?;
    let line = std::str::from_utf8(line).ok()?.trim_end();
    let mut parts = line.splitn(3, ' ');
    if !parts.next()?.starts_with("HTTP/1.") {
        return None;
    }
    StatusCode::from_bytes(parts.next()?.as_bytes()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_parsing() {
        assert_eq!(
            parse_status(b"HTTP/1.1 200 Connection established\r\n\r\n"),
            Some(StatusCode::OK)
        );
        assert_eq!(
            parse_status(b"HTTP/1.0 407 Proxy Authentication Required\r\n\r\n"),
            Some(StatusCode::PROXY_AUTHENTICATION_REQUIRED)
        );
        assert_eq!(parse_status(b"SSH-2.0-OpenSSH\r\n\r\n"), None);
    }
}
