use http::HeaderValue;

use super::ClientBuilder;
use crate::client::{Client, Prepared};
use crate::config::{ClientConfig, ConfigError, ConfigValidator, select_strategy};
use crate::error::{self, Result};
use crate::http::encode_basic_auth;
use crate::proxy::ProxySource;

impl ClientBuilder {
    /// Validates the options and creates a client.
    ///
    /// The proxy source is resolved here, once: a spec string is parsed, the
    /// environment is read. The builder is left untouched, so calling
    /// `build` again yields an independent client with its own transport.
    ///
    /// # Errors
    ///
    /// [`Kind::Configuration`](crate::Kind::Configuration) for a missing or
    /// invalid URL, inconsistent options, or a transport that cannot be
    /// created. A proxy spec that does not parse is not an error.
    pub fn build(&self) -> Result<Client> {
        let target = ConfigValidator::validate_target(self.url.as_deref())?;
        let credentials = ConfigValidator::validate_credentials(
            self.user.as_deref(),
            self.password.as_deref(),
        )?;
        if let Some(size) = self.socket.socket_buffer_size {
            ConfigValidator::validate_buffer_size(size)?;
        }
        ConfigValidator::validate_pool_size(self.pooling_mode, self.pool.max_total_connections)?;
        ConfigValidator::validate_charset(&self.content_charset)?;
        ConfigValidator::validate_user_agent(&self.user_agent)?;
        if let Some(ProxySource::Literal(settings)) = &self.proxy {
            ConfigValidator::validate_literal_proxy(settings)?;
        }

        let proxy = self
            .proxy
            .as_ref()
            .and_then(|source| source.resolve(&target));

        let transport_config =
            select_strategy(self.pooling_mode, &self.pool, &self.socket, proxy.as_ref())?;

        let authorization = credentials
            .as_ref()
            .map(|c| encode_basic_auth(&c.user, c.password.as_deref()))
            .transpose()
            .map_err(|_| {
                ConfigError::InvalidCredentials("credentials cannot be sent as a header".to_owned())
            })?;

        let user_agent = HeaderValue::from_str(&self.user_agent).map_err(error::configuration)?;

        let transport = self
            .transport_provider
            .create(&transport_config)
            .map_err(error::configuration)?;

        tracing::debug!(
            target: "mgmt_client::builder",
            url = %target,
            pooling_mode = ?self.pooling_mode,
            proxy = ?proxy.as_ref().map(|p| p.authority()),
            "client built"
        );

        let prepared = Prepared {
            user_agent,
            authorization,
            charset: self.content_charset.clone(),
            expect_continue: self.socket.expect_continue,
        };

        let config = ClientConfig {
            target,
            credentials,
            pooling_mode: self.pooling_mode,
            pool: self.pool.clone(),
            content_charset: self.content_charset.clone(),
            user_agent: self.user_agent.clone(),
            proxy,
            transport: transport_config,
        };

        Ok(Client::from_parts(
            config,
            prepared,
            self.cookie_store.clone(),
            transport,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::config::{ConnectionStrategy, PoolingMode};
    use crate::{ClientBuilder, Kind};

    const URL: &str = "http://localhost:8080/jolokia";

    #[test]
    fn missing_url_is_a_configuration_error() {
        let err = ClientBuilder::new().build().expect_err("no url");
        assert_eq!(err.kind(), Kind::Configuration);
    }

    #[test]
    fn millisecond_options_treat_zero_as_unbounded() {
        let client = ClientBuilder::new()
            .url(URL)
            .connection_timeout(0)
            .socket_timeout(1500)
            .max_connection_pool_timeout(0)
            .build()
            .expect("valid");

        let config = client.config();
        assert_eq!(config.socket().connection_timeout, None);
        assert_eq!(config.socket().socket_timeout, Some(Duration::from_millis(1500)));
        assert_eq!(config.pool().max_connection_pool_timeout, None);
    }

    #[test]
    fn last_pooling_setter_wins() {
        let single = ClientBuilder::new()
            .url(URL)
            .pooled_connections()
            .single_connection()
            .build()
            .expect("valid");
        assert_eq!(single.config().pooling_mode(), PoolingMode::Single);
        assert_eq!(single.config().transport().strategy, ConnectionStrategy::Single);

        let pooled = ClientBuilder::new()
            .url(URL)
            .single_connection()
            .pooled_connections()
            .build()
            .expect("valid");
        assert_eq!(pooled.config().pooling_mode(), PoolingMode::Pooled);
    }

    #[test]
    fn last_proxy_setter_wins() {
        let client = ClientBuilder::new()
            .url(URL)
            .proxy("literal", 1111)
            .proxy_spec("http://spec:2222")
            .build()
            .expect("valid");
        assert_eq!(client.config().proxy().expect("proxy").host(), "spec");

        let client = ClientBuilder::new()
            .url(URL)
            .proxy_spec("http://spec:2222")
            .proxy("literal", 1111)
            .build()
            .expect("valid");
        assert_eq!(client.config().proxy().expect("proxy").host(), "literal");
    }

    #[test]
    fn malformed_spec_builds_without_proxy() {
        let client = ClientBuilder::new()
            .url(URL)
            .proxy_spec("host:8080")
            .build()
            .expect("malformed specs are not errors");
        assert!(client.config().proxy().is_none());
        assert!(client.config().transport().proxy.is_none());
    }

    #[test]
    fn inconsistent_options_are_rejected() {
        let cases = [
            ClientBuilder::new().url(URL).socket_buffer_size(0),
            ClientBuilder::new().url(URL).max_total_connections(0),
            ClientBuilder::new().url(URL).content_charset(""),
            ClientBuilder::new().url(URL).password("secret"),
            ClientBuilder::new().url(URL).proxy("", 8080),
            ClientBuilder::new().url(URL).user_agent("bad\nagent"),
        ];
        for builder in cases {
            let err = builder.build().expect_err("invalid");
            assert!(err.is_configuration(), "{err}");
        }
    }

    #[test]
    fn single_connection_ignores_pool_size() {
        let client = ClientBuilder::new()
            .url(URL)
            .max_total_connections(0)
            .single_connection()
            .build()
            .expect("pool size is unused");
        assert_eq!(client.config().transport().strategy.max_connections(), 1);
    }

    #[test]
    fn debug_output_hides_password() {
        let builder = ClientBuilder::new().url(URL).user("jolokia").password("s3cret");
        let rendered = format!("{builder:?}");
        assert!(rendered.contains("jolokia"));
        assert!(!rendered.contains("s3cret"));
    }
}
