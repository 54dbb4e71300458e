use reqwest::StatusCode;

pub type Result<T> = std::result::Result<T, Error>;

/// Unexpected failures of the HTTP layer.
///
/// These are distinct from recorded test outcomes: a suite that hits one of
/// these propagates it to the runner, which aborts the whole run. Assertion
/// mismatches never surface here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Connection refused, timeout, DNS failure, or any other transport error.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response declared a JSON content type but the body did not parse.
    #[error("failed to decode JSON response (status {status}): {source}")]
    Decode {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },
}
