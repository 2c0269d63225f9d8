//! Pre-built requests handed to [`Client::execute`](crate::Client::execute)
//!
//! The payload itself is opaque here. A request only says which method to
//! use, what to append to the target URL, and which bytes to send.

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use url::Url;

#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    path: Option<String>,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    content_type: Option<String>,
    body: Option<Bytes>,
}

impl HttpRequest {
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            path: None,
            query: Vec::new(),
            headers: HeaderMap::new(),
            content_type: None,
            body: None,
        }
    }

    /// A `GET` for `path`, relative to the client's target URL.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET).with_path(path)
    }

    /// A `POST` of `body` to the client's target URL.
    #[must_use]
    pub fn post(body: impl Into<Bytes>) -> Self {
        Self::new(Method::POST).with_body(body)
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Media type of the body. The client's content charset is appended
    /// unless `content_type` already names one.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    #[must_use]
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// The URL this request addresses when sent to `base`.
    pub(crate) fn resolve_url(&self, base: &Url) -> Url {
        let mut url = base.clone();

        if let Some(path) = self.path.as_deref().filter(|path| !path.is_empty()) {
            let joined = format!(
                "{}/{}",
                base.path().trim_end_matches('/'),
                path.trim_start_matches('/')
            );
            url.set_path(&joined);
        }

        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }

        url
    }
}
