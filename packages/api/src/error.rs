//! Errors of the payload adapter

use http::StatusCode;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Building the client or exchanging the request failed.
    #[error(transparent)]
    Client(#[from] mgmt_client::Error),

    #[error("failed to encode request payload: {0}")]
    Encode(#[source] serde_json::Error),

    /// The agent answered, but not with the expected JSON.
    #[error("failed to decode response (status {status}): {source}")]
    Decode {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// The client error category, if the failure came from the client.
    #[must_use]
    pub fn kind(&self) -> Option<mgmt_client::Kind> {
        match self {
            Error::Client(err) => Some(err.kind()),
            Error::Encode(_) | Error::Decode { .. } => None,
        }
    }

    #[must_use]
    pub fn is_connect(&self) -> bool {
        self.kind() == Some(mgmt_client::Kind::Connect)
    }
}
