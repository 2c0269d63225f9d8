//! Default values applied when a builder option is left unset

use std::time::Duration;

pub const MAX_TOTAL_CONNECTIONS: usize = 20;

pub const MAX_CONNECTION_POOL_TIMEOUT: Duration = Duration::from_millis(500);

pub const CONTENT_CHARSET: &str = "utf-8";

pub const TCP_NO_DELAY: bool = true;

pub const EXPECT_CONTINUE: bool = false;

/// Body type used when a request carries a body but names no content type.
pub const BODY_CONTENT_TYPE: &str = "text/plain";

pub const USER_AGENT: &str = concat!("mgmt-client/", env!("CARGO_PKG_VERSION"));
