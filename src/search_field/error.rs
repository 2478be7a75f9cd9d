use std::fmt;

/// Failure reported by a lookup provider
///
/// The search field never shows these to the user; a failed lookup
/// degrades to an empty candidate list.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupError {
    /// Provider could not be reached or refused the request
    Unavailable(String),
    /// Provider answered with something that is not a candidate list
    InvalidResponse(String),
    /// Lookup task stopped before producing an answer
    Aborted(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::Unavailable(e) => write!(f, "Lookup provider unavailable: {e}"),
            LookupError::InvalidResponse(e) => write!(f, "Invalid lookup response: {e}"),
            LookupError::Aborted(e) => write!(f, "Lookup aborted: {e}"),
        }
    }
}

impl std::error::Error for LookupError {}

impl From<std::io::Error> for LookupError {
    fn from(e: std::io::Error) -> Self {
        LookupError::Unavailable(e.to_string())
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(e: serde_json::Error) -> Self {
        LookupError::InvalidResponse(e.to_string())
    }
}

impl From<tokio::task::JoinError> for LookupError {
    fn from(e: tokio::task::JoinError) -> Self {
        LookupError::Aborted(e.to_string())
    }
}

/// Result type alias for lookup operations
pub type LookupResult<T> = Result<T, LookupError>;
