//! Error type shared by the client, decoder and CLI.

/// Result alias that carries [`CubeViewError`].
pub type Result<T> = std::result::Result<T, CubeViewError>;

/// Everything that can go wrong talking to the backend or starting up.
///
/// None of these are fatal to the viewer: a failed request leaves the
/// displayed cube untouched.
#[derive(Debug, thiserror::Error)]
pub enum CubeViewError {
    /// The request never produced a response (connection refused, timeout).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The backend answered with a non-success status code.
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
    /// The body was not valid JSON for a cube response.
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
    /// The body decoded but breaks a structural invariant.
    #[error("malformed response: {0}")]
    Malformed(String),
    /// A move name outside the 18 face turns.
    #[error("unknown move `{0}`")]
    UnknownMove(String),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
}
