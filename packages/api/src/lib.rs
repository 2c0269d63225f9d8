//! # mgmt
//!
//! Entry points for [`mgmt_client`]. [`Mgmt`] starts a
//! [`ClientBuilder`] from any of its options, and [`Mgmt::execute_json`]
//! sends a [`ManagementRequest`] and decodes the JSON answer.
//!
//! ```no_run
//! use mgmt::{JsonRequest, Mgmt};
//! use serde_json::{Value, json};
//!
//! # fn main() -> mgmt::Result<()> {
//! let client = Mgmt::url("http://localhost:8778/jolokia")
//!     .user("jolokia")
//!     .password("s3cret")
//!     .build()?;
//!
//! let request = JsonRequest::new(json!({
//!     "type": "read",
//!     "mbean": "java.lang:type=Memory",
//!     "attribute": "HeapMemoryUsage",
//! }));
//! let answer: Value = Mgmt::execute_json(&client, &request)?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod entry;
pub mod error;
pub mod request;

pub use entry::Mgmt;
pub use error::{Error, Result};
pub use request::{JsonRequest, ManagementRequest, PathRequest};

pub use mgmt_client::{
    Client, ClientBuilder, ClientConfig, HttpRequest, HttpResponse, Kind, PoolingMode,
    ProxySettings, parse_proxy_spec,
};
