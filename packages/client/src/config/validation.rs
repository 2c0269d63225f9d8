//! Build-time validation of builder options

use http::HeaderValue;
use url::Url;

use super::{Credentials, PoolingMode};
use crate::proxy::ProxySettings;

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Why a builder could not be turned into a client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("no target url configured")]
    MissingUrl,

    #[error("invalid target url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("unsupported target url scheme {0:?}, expected http or https")]
    UnsupportedScheme(String),

    #[error("invalid socket buffer size: {0}")]
    InvalidBufferSize(String),

    #[error("invalid configuration parameter: {0}")]
    InvalidParameter(String),

    #[error("invalid proxy: {0}")]
    InvalidProxy(String),

    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
}

/// Checks for the individual builder options.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Parses the target URL; it must be absolute `http`/`https` with a host.
    ///
    /// # Errors
    ///
    /// `MissingUrl` if no URL was set, `InvalidUrl` if it does not parse or
    /// has no host, `UnsupportedScheme` for any other scheme.
    pub fn validate_target(url: Option<&str>) -> ConfigResult<Url> {
        let raw = url.ok_or(ConfigError::MissingUrl)?;
        let parsed = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
            url: raw.to_owned(),
            reason: e.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(parsed.scheme().to_owned()));
        }

        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(ConfigError::InvalidUrl {
                url: raw.to_owned(),
                reason: "missing host".to_owned(),
            });
        }

        Ok(parsed)
    }

    /// # Errors
    ///
    /// `InvalidBufferSize` for zero or for more than 1GB.
    pub fn validate_buffer_size(size: usize) -> ConfigResult<()> {
        if size == 0 {
            return Err(ConfigError::InvalidBufferSize(
                "socket buffer size cannot be zero".to_owned(),
            ));
        }

        if size > 1024 * 1024 * 1024 {
            return Err(ConfigError::InvalidBufferSize(
                "socket buffer size cannot exceed 1GB".to_owned(),
            ));
        }

        Ok(())
    }

    /// The pool size is only checked in pooled mode.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for a pooled client allowed zero connections.
    pub fn validate_pool_size(mode: PoolingMode, max_total: usize) -> ConfigResult<()> {
        if mode == PoolingMode::Pooled && max_total == 0 {
            return Err(ConfigError::InvalidParameter(
                "max total connections must be at least 1 for a pooled client".to_owned(),
            ));
        }
        Ok(())
    }

    /// # Errors
    ///
    /// `InvalidParameter` unless `charset` is a non-empty HTTP token.
    pub fn validate_charset(charset: &str) -> ConfigResult<()> {
        let is_token_char = |c: char| c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c);

        if charset.is_empty() || !charset.chars().all(is_token_char) {
            return Err(ConfigError::InvalidParameter(format!(
                "content charset {charset:?} is not a valid charset name"
            )));
        }
        Ok(())
    }

    /// # Errors
    ///
    /// `InvalidParameter` if the user agent cannot be sent as a header.
    pub fn validate_user_agent(user_agent: &str) -> ConfigResult<()> {
        HeaderValue::from_str(user_agent).map_err(|_| {
            ConfigError::InvalidParameter(format!("user agent {user_agent:?} is not a valid header value"))
        })?;
        Ok(())
    }

    /// Pairs user and password into credentials.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` for a password without a user, or for a user
    /// containing `:`, which basic authentication cannot represent.
    pub fn validate_credentials(
        user: Option<&str>,
        password: Option<&str>,
    ) -> ConfigResult<Option<Credentials>> {
        match (user, password) {
            (None, None) => Ok(None),
            (None, Some(_)) => Err(ConfigError::InvalidCredentials(
                "a password was set without a user".to_owned(),
            )),
            (Some(user), _) if user.contains(':') => Err(ConfigError::InvalidCredentials(
                "user name cannot contain ':'".to_owned(),
            )),
            (Some(user), password) => Ok(Some(Credentials {
                user: user.to_owned(),
                password: password.map(str::to_owned),
            })),
        }
    }

    /// Checks proxy settings given directly to the builder. Specs and
    /// environment values are never rejected, they resolve to no proxy.
    ///
    /// # Errors
    ///
    /// `InvalidProxy` for an empty host or port 0.
    pub fn validate_literal_proxy(proxy: &ProxySettings) -> ConfigResult<()> {
        if proxy.host().trim().is_empty() {
            return Err(ConfigError::InvalidProxy("proxy host cannot be empty".to_owned()));
        }
        if proxy.port() == 0 {
            return Err(ConfigError::InvalidProxy(format!(
                "proxy {} has port 0",
                proxy.host()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_must_be_present() {
        assert_eq!(
            ConfigValidator::validate_target(None),
            Err(ConfigError::MissingUrl)
        );
    }

    #[test]
    fn target_must_be_absolute_http() {
        assert!(matches!(
            ConfigValidator::validate_target(Some("localhost:8080/jolokia")),
            Err(ConfigError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            ConfigValidator::validate_target(Some("/jolokia")),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            ConfigValidator::validate_target(Some("ftp://host/jolokia")),
            Err(ConfigError::UnsupportedScheme(scheme)) if scheme == "ftp"
        ));

        let url = ConfigValidator::validate_target(Some("https://host:8443/jolokia"))
            .expect("valid target");
        assert_eq!(url.port(), Some(8443));
    }

    #[test]
    fn buffer_size_bounds() {
        assert!(ConfigValidator::validate_buffer_size(0).is_err());
        assert!(ConfigValidator::validate_buffer_size(64 * 1024).is_ok());
        assert!(ConfigValidator::validate_buffer_size(usize::MAX).is_err());
    }

    #[test]
    fn pool_size_is_ignored_for_single_mode() {
        assert!(ConfigValidator::validate_pool_size(PoolingMode::Single, 0).is_ok());
        assert!(ConfigValidator::validate_pool_size(PoolingMode::Pooled, 0).is_err());
        assert!(ConfigValidator::validate_pool_size(PoolingMode::Pooled, 1).is_ok());
    }

    #[test]
    fn charset_names() {
        assert!(ConfigValidator::validate_charset("utf-8").is_ok());
        assert!(ConfigValidator::validate_charset("ISO-8859-1").is_ok());
        assert!(ConfigValidator::validate_charset("").is_err());
        assert!(ConfigValidator::validate_charset("utf 8").is_err());
        assert!(ConfigValidator::validate_charset("utf-8;q=1").is_err());
    }

    #[test]
    fn credentials_pairing() {
        assert_eq!(ConfigValidator::validate_credentials(None, None), Ok(None));
        assert!(ConfigValidator::validate_credentials(None, Some("secret")).is_err());
        assert!(ConfigValidator::validate_credentials(Some("a:b"), None).is_err());

        let credentials = ConfigValidator::validate_credentials(Some("jolokia"), Some("secret"))
            .expect("valid credentials")
            .expect("present");
        assert_eq!(credentials.user(), "jolokia");
        assert_eq!(credentials.password.as_deref(), Some("secret"));
    }

    #[test]
    fn literal_proxy_needs_host_and_port() {
        assert!(ConfigValidator::validate_literal_proxy(&ProxySettings::new("", 8080)).is_err());
        assert!(ConfigValidator::validate_literal_proxy(&ProxySettings::new("proxy", 0)).is_err());
        assert!(ConfigValidator::validate_literal_proxy(&ProxySettings::new("proxy", 3128)).is_ok());
    }
}
