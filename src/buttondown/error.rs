use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the Buttondown client and credential lookup.
///
/// None of these are retried. The message is the only detail kept from
/// the remote side.
#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "Could not find a Buttondown API key. Set {env_var} or make it readable at {secret_reference}"
    )]
    MissingCredential {
        env_var: String,
        secret_reference: String,
    },

    /// The API answered with a non-success status.
    #[error("API request failed: {message}")]
    RequestFailed { message: String },

    /// DNS, connect, TLS or timeout errors from the HTTP layer.
    #[error("API request failed: {0}")]
    TransportFailure(String),

    #[error("Unexpected response from the API: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::TransportFailure(err.to_string())
    }
}
