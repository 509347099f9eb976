use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum DomainError {
    #[error("validation failed for '{field}': {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("missing fields")]
    MissingFields(Vec<&'static str>),

    #[error("{0}")]
    NotFound(String),

    #[error("not allowed")]
    Forbidden,

    #[error("unexpected domain error: {0}")]
    Unexpected(String),
}
