//! Defines the crate level error type.

/// The errors that may occur while fetching and summarising admin data.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request could not be sent or the connection failed before a
    /// response was received.
    #[error("network error: {0}")]
    Network(String),

    /// The API responded with a non-success status code.
    ///
    /// The second field holds the response body for debugging.
    #[error("HTTP {0}: {1}")]
    Http(u16, String),

    /// The response body could not be parsed into the expected shape.
    #[error("could not parse response: {0}")]
    Parse(String),

    /// No token has been set on the [AuthContext](crate::AuthContext).
    #[error("not authenticated, log in first")]
    NotAuthenticated,

    /// The token's `exp` claim is in the past.
    #[error("the access token has expired")]
    TokenExpired,

    /// Could not acquire the lock on the authentication session.
    #[error("could not acquire the auth session lock")]
    AuthLockError,

    /// The token is not a JWT or its payload could not be decoded.
    #[error("invalid access token: {0}")]
    InvalidToken(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// A review decision was applied to a record whose status does not allow it.
    #[error("cannot change review status from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },

    /// The view that started the fetch was torn down before it finished.
    #[error("the fetch was cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Error::Parse(value.to_string())
        } else {
            tracing::error!("a request to the API failed: {}", value);
            Error::Network(value.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::Parse(value.to_string())
    }
}
