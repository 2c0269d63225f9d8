use url::Url;

use super::types::{BoxError, Error, Kind};
use crate::config::ConfigError;

/// Creates an `Error` for an unusable builder configuration.
pub(crate) fn configuration<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Configuration).with(e)
}

/// Creates an `Error` for a failure to reach `target`.
pub(crate) fn connect<E: Into<BoxError>>(e: E, target: Url) -> Error {
    Error::new(Kind::Connect).with(e).with_url(target)
}

/// Creates an `Error` for a request that could not be encoded.
pub(crate) fn request<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Request).with(e)
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Error {
        configuration(err)
    }
}
