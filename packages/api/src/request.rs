//! Payloads that can be sent through a client
//!
//! A [`ManagementRequest`] knows how to turn itself into an [`HttpRequest`].
//! The adapters here do not encode any particular management protocol; they
//! only decide how a payload travels.

use mgmt_client::HttpRequest;
use serde::Serialize;

use crate::error::{Error, Result};

const JSON_CONTENT_TYPE: &str = "application/json";

/// A request the client can send.
pub trait ManagementRequest {
    /// # Errors
    ///
    /// [`Error::Encode`] if the payload cannot be serialized.
    fn to_http(&self) -> Result<HttpRequest>;
}

impl ManagementRequest for HttpRequest {
    fn to_http(&self) -> Result<HttpRequest> {
        Ok(self.clone())
    }
}

/// POSTs a serializable payload as JSON.
///
/// ```
/// use mgmt::{JsonRequest, ManagementRequest};
/// use serde_json::json;
///
/// let request = JsonRequest::new(json!({"type": "version"})).to_http().unwrap();
/// assert_eq!(request.method(), "POST");
/// assert_eq!(request.content_type(), Some("application/json"));
/// ```
#[derive(Debug, Clone)]
pub struct JsonRequest<T> {
    payload: T,
    path: Option<String>,
}

impl<T: Serialize> JsonRequest<T> {
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            path: None,
        }
    }

    /// Appends `path` to the client's target URL.
    #[must_use]
    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }
}

impl<T: Serialize> ManagementRequest for JsonRequest<T> {
    fn to_http(&self) -> Result<HttpRequest> {
        let body = serde_json::to_vec(&self.payload).map_err(Error::Encode)?;
        log::debug!("encoded json payload ({} bytes)", body.len());

        let request = HttpRequest::post(body).with_content_type(JSON_CONTENT_TYPE);
        Ok(match &self.path {
            Some(path) => request.with_path(path.clone()),
            None => request,
        })
    }
}

/// A GET whose meaning is carried entirely by path and query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRequest {
    path: String,
    query: Vec<(String, String)>,
}

impl PathRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

impl ManagementRequest for PathRequest {
    fn to_http(&self) -> Result<HttpRequest> {
        Ok(self
            .query
            .iter()
            .fold(HttpRequest::get(self.path.clone()), |request, (key, value)| {
                request.with_query(key.clone(), value.clone())
            }))
    }
}
