use http::HeaderMap;
use http::header::{COOKIE, SET_COOKIE};
use url::Url;

use super::CookieStore;

/// Adds the store's `Cookie` header for `url`, replacing one set by the caller.
pub(crate) fn add_cookie_header(headers: &mut HeaderMap, store: &dyn CookieStore, url: &Url) {
    if let Some(header) = store.cookies(url) {
        headers.insert(COOKIE, header);
    }
}

/// Hands every `Set-Cookie` value of a response to the store.
pub(crate) fn store_response_cookies(headers: &HeaderMap, store: &dyn CookieStore, url: &Url) {
    let mut values = headers.get_all(SET_COOKIE).iter();
    store.set_cookies(&mut values, url);
}
