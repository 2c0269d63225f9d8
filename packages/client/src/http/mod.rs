//! Request and response values exchanged with the transport

pub mod request;
pub mod response;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::HeaderValue;
use http::header::InvalidHeaderValue;

pub use request::HttpRequest;
pub use response::HttpResponse;

/// Encodes `user[:pass]` as a sensitive `Basic` credential header value.
pub(crate) fn encode_basic_auth(
    user: &str,
    pass: Option<&str>,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let credentials = format!("{user}:{}", pass.unwrap_or_default());
    let encoded = STANDARD.encode(credentials.as_bytes());
    let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))?;
    value.set_sensitive(true);
    Ok(value)
}
