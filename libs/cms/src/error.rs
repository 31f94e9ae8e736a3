use crate::models::ContentReference;

/// Errors surfaced by a content repository.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// No content exists at the reference (or it sits in the wastebasket)
    #[error("Content not found: {0}")]
    NotFound(ContentReference),

    /// The reference cannot address content (empty or malformed)
    #[error("Invalid content reference: {0}")]
    InvalidReference(String),

    /// The backend refused the operation for the supplied access level
    #[error("Access denied to content {0}")]
    AccessDenied(ContentReference),

    /// The backend does not offer this capability
    #[error("Operation '{0}' is not supported by this content repository")]
    Unsupported(&'static str),

    /// Network or protocol failure talking to a remote repository
    #[error("Transport error: {0}")]
    Transport(String),

    /// Any other failure reported by the backend
    #[error("Content backend error: {0}")]
    Backend(String),
}

/// Result type alias for content repository operations
pub type ContentResult<T> = Result<T, ContentError>;

#[cfg(feature = "http")]
impl From<reqwest::Error> for ContentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ContentError::Backend(format!("Malformed response: {}", err))
        } else {
            ContentError::Transport(err.to_string())
        }
    }
}
