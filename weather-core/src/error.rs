use thiserror::Error;

/// Shown when the provider answers with any status code other than 200.
pub const NOT_FOUND_MESSAGE: &str = "City not found!";

/// Shown for network failures and unreadable responses.
pub const FETCH_FAILED_MESSAGE: &str = "Error fetching weather data.";

/// Everything that can go wrong while looking up the current weather.
///
/// The variants carry diagnostic detail for logs. What the user gets to see
/// is decided by [`FetchError::user_message`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("city name must not be empty")]
    EmptyInput,

    #[error("provider answered with status code {code}: {message}")]
    NotFound { code: i64, message: String },

    #[error("request to the weather provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed weather provider response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// User-facing text for this failure, or `None` when it is not surfaced at all.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            FetchError::EmptyInput => None,
            FetchError::NotFound { .. } => Some(NOT_FOUND_MESSAGE),
            FetchError::Transport(_) | FetchError::Malformed(_) => Some(FETCH_FAILED_MESSAGE),
        }
    }
}
