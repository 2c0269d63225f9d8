//! HTTP proxy configuration
//!
//! A client reaches its target either directly or through one HTTP forward
//! proxy. The proxy is given literally, as a spec string, or taken from the
//! environment; see [`ProxySource`].

pub mod env;
pub mod no_proxy;
pub mod source;
pub mod spec;

pub use env::EnvProxy;
pub use no_proxy::NoProxy;
pub use source::ProxySource;
pub use spec::{ProxySettings, parse_proxy_spec};
