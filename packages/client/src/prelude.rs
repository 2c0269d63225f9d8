//! The types needed to build a client and send requests.

pub use crate::builder::ClientBuilder;
pub use crate::client::Client;
pub use crate::config::{ClientConfig, PoolingMode};
pub use crate::cookie::{CookieStore, Jar};
pub use crate::error::{Error, Kind, Result};
pub use crate::http::{HttpRequest, HttpResponse};
pub use crate::proxy::ProxySettings;

pub use ::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
