use thiserror::Error;

/// Everything that can stop a search from producing a list of places.
///
/// The `Display` text of each variant is the status line shown to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// No location has been cached yet, so there is no origin to search from
    #[error("Location not available")]
    LocationUnavailable,
    /// The location collaborator refused access
    #[error("Location permission is required to use this feature")]
    PermissionDenied,
    /// The endpoint answered with a status outside the 2xx range
    #[error("Error fetching data: {status}")]
    Http { status: u16 },
    /// DNS, connect, timeout or body read failure
    #[error("Error: {0}")]
    Transport(String),
    /// The body did not match the configured schema
    #[error("Error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}
