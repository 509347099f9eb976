use chrono::{DateTime, Utc};

use super::error::DomainError;
use super::timestamp::to_storage_precision;

pub(crate) const USERNAME_MAX_CHARS: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) trip_id: i64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) location: Option<String>,
    pub(crate) lon: Option<f64>,
    pub(crate) lat: Option<f64>,
    pub(crate) title: String,
    pub(crate) content: String,
}

/// A post as submitted by its owner, before storage assigns an id.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CreatePostRequest {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) lon: Option<f64>,
    pub(crate) lat: Option<f64>,
    pub(crate) location: Option<String>,
    pub(crate) created_at: Option<DateTime<Utc>>,
}

impl CreatePostRequest {
    /// Field limits are checked on the wire DTO; this only aligns
    /// `created_at` with storage precision.
    pub(crate) fn normalized(self) -> Self {
        Self {
            created_at: self.created_at.map(to_storage_precision),
            ..self
        }
    }
}

impl Post {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: i64,
        username: impl Into<String>,
        trip_id: i64,
        created_at: DateTime<Utc>,
        location: Option<String>,
        lon: Option<f64>,
        lat: Option<f64>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self, DomainError> {
        if id <= 0 {
            return Err(DomainError::Validation {
                field: "id",
                message: "must be > 0",
            });
        }
        let username = username.into();
        validate_username(&username)?;

        Ok(Self {
            id,
            username,
            trip_id,
            created_at,
            location,
            lon,
            lat,
            title: title.into(),
            content: content.into(),
        })
    }
}

pub(crate) fn validate_username(username: &str) -> Result<(), DomainError> {
    let len = username.chars().count();
    if len == 0 || len > USERNAME_MAX_CHARS {
        return Err(DomainError::Validation {
            field: "username",
            message: "must be 1..32 chars",
        });
    }
    Ok(())
}
