//! Cookie store capability and the default jar

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use bytes::Bytes;
use http::HeaderValue;
use url::Url;

/// Session state shared between a client and its owner.
///
/// A client only reads and writes through this trait and never owns the
/// store: the caller keeps its own handle and may inspect or seed it while
/// clients are using it. Implementations synchronise themselves.
pub trait CookieStore: Send + Sync {
    /// Store the `Set-Cookie` values received from `url`.
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url);
    /// The `Cookie` header to send to `url`, if any cookie applies.
    fn cookies(&self, url: &Url) -> Option<HeaderValue>;
}

/// The default [`CookieStore`], an in-memory RFC 6265 store.
///
/// Clones share the same cookies, so a jar handed to a builder can still be
/// inspected afterwards.
///
/// ```
/// use mgmt_client::cookie::{CookieStore, Jar};
/// use url::Url;
///
/// let url = Url::parse("http://localhost:8080/jolokia").unwrap();
/// let jar = Jar::default();
/// jar.add_cookie_str("JSESSIONID=abc; Path=/", &url);
///
/// assert_eq!(jar.cookies(&url).unwrap(), "JSESSIONID=abc");
/// ```
#[derive(Default, Clone)]
pub struct Jar(Arc<RwLock<cookie_store::CookieStore>>);

impl Jar {
    /// Adds a cookie as if `url` had sent it in a `Set-Cookie` header.
    /// Values that do not parse as a cookie are ignored.
    pub fn add_cookie_str(&self, cookie: &str, url: &Url) {
        let parsed = cookie::Cookie::parse(cookie).map(cookie::Cookie::into_owned);
        if let Ok(parsed) = parsed {
            self.0
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .store_response_cookies(std::iter::once(parsed), url);
        }
    }

    /// Number of unexpired cookies in the jar.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter_unexpired()
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.0.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl CookieStore for Jar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let cookies: Vec<_> = cookie_headers
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| cookie::Cookie::parse(value).ok())
            .map(cookie::Cookie::into_owned)
            .collect();

        if cookies.is_empty() {
            return;
        }

        self.0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .store_response_cookies(cookies.into_iter(), url);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let header = self
            .0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get_request_values(url)
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");

        if header.is_empty() {
            return None;
        }

        HeaderValue::from_maybe_shared(Bytes::from(header)).ok()
    }
}

impl fmt::Debug for Jar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Jar").field("cookies", &self.len()).finish()
    }
}
