use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by `blog-client`.
pub enum BlogClientError {
    /// Transport failure or an undecodable response (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured server URL cannot carry path segments.
    #[error("invalid base url: {0}")]
    InvalidUrl(String),

    /// A write was attempted before a token was set on the client.
    #[error("token is not set")]
    MissingToken,

    /// The server refused the write: token absent, invalid, or not the path owner.
    #[error("not allowed")]
    Forbidden,

    /// Nothing matched: no posts for the listing, or no such post to delete.
    #[error("not found: {0}")]
    NotFound(String),

    /// The server rejected the request payload or query.
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// Server-provided description.
        message: String,
        /// Required body fields that were absent.
        missing: Vec<String>,
    },

    /// Any other non-success status.
    #[error("server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Server-provided description.
        message: String,
    },
}

/// Result of `blog-client` operations.
pub type BlogClientResult<T> = Result<T, BlogClientError>;

impl BlogClientError {
    pub(crate) fn from_http_status(
        status: reqwest::StatusCode,
        message: Option<String>,
        missing: Vec<String>,
    ) -> Self {
        let message = message.unwrap_or_else(|| format!("http status {status}"));
        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => Self::Forbidden,
            reqwest::StatusCode::NOT_FOUND => Self::NotFound(message),
            reqwest::StatusCode::BAD_REQUEST => Self::InvalidRequest { message, missing },
            _ => Self::Server {
                status: status.as_u16(),
                message,
            },
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None, Vec::new());
        }
        Self::Http(err)
    }
}
