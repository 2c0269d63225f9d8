use std::error::Error as StdError;
use std::fmt;

use url::Url;

/// A `Result` alias where the `Err` case is [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;

/// Errors raised while building a client or executing a request.
///
/// The kind tells callers what went wrong; the message always names the
/// destination for connect failures, even when a proxy sits in between.
pub struct Error {
    inner: Box<Inner>,
}

struct Inner {
    kind: Kind,
    source: Option<BoxError>,
    url: Option<Url>,
}

/// Category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// The builder held an unusable or inconsistent configuration.
    Configuration,
    /// The destination could not be reached, or stopped answering.
    ///
    /// Covers refused connections, DNS and TLS failures, connect and socket
    /// timeouts and waiting too long for a pooled connection.
    Connect,
    /// The request could not be turned into an HTTP message.
    Request,
}

impl Error {
    pub(crate) fn new(kind: Kind) -> Error {
        Error {
            inner: Box::new(Inner {
                kind,
                source: None,
                url: None,
            }),
        }
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub(crate) fn with<E: Into<BoxError>>(mut self, source: E) -> Error {
        self.inner.source = Some(source.into());
        self
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub(crate) fn with_url(mut self, url: Url) -> Error {
        self.inner.url = Some(url);
        self
    }

    /// The category of this error.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.inner.kind
    }

    /// The target URL this error relates to, if any.
    #[must_use]
    pub fn url(&self) -> Option<&Url> {
        self.inner.url.as_ref()
    }

    #[must_use]
    pub fn is_configuration(&self) -> bool {
        self.inner.kind == Kind::Configuration
    }

    #[must_use]
    pub fn is_connect(&self) -> bool {
        self.inner.kind == Kind::Connect
    }

    #[must_use]
    pub fn is_request(&self) -> bool {
        self.inner.kind == Kind::Request
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("mgmt_client::Error");

        f.field("kind", &self.inner.kind);

        if let Some(ref url) = self.inner.url {
            f.field("url", &url.as_str());
        }

        if let Some(ref source) = self.inner.source {
            f.field("source", source);
        }

        f.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.kind {
            Kind::Configuration => f.write_str("invalid client configuration")?,
            Kind::Request => f.write_str("error building request")?,
            Kind::Connect => {
                f.write_str("cannot connect to ")?;
                match self.inner.url {
                    Some(ref url) => write_destination(f, url)?,
                    None => f.write_str("target")?,
                }
            }
        }

        if let Some(ref source) = self.inner.source {
            write!(f, ": {source}")?;
        }

        Ok(())
    }
}

// `host:port (url)`, with the port spelled out even when the URL omits it.
fn write_destination(f: &mut fmt::Formatter<'_>, url: &Url) -> fmt::Result {
    match (url.host_str(), url.port_or_known_default()) {
        (Some(host), Some(port)) => write!(f, "{host}:{port} ({url})"),
        _ => write!(f, "{url}"),
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}
