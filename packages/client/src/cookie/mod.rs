//! HTTP cookies
//!
//! A client configured with a [`CookieStore`] sends the store's cookies with
//! every request and records every `Set-Cookie` it receives.

mod core;
mod utils;

pub use self::core::{CookieStore, Jar};
pub(crate) use self::utils::{add_cookie_header, store_response_cookies};
