use chrono::{DateTime, Utc};

use super::error::DomainError;
use super::timestamp::parse_timestamp;

/// Rows returned when the caller does not ask for a page size.
pub(crate) const DEFAULT_PAGE_SIZE: u32 = 10;
pub(crate) const MAX_PAGE_SIZE: u32 = 1000;

/// Which posts a listing covers: one user's posts, optionally narrowed to a
/// trip, strictly older than `before`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PostFilter {
    pub(crate) username: String,
    pub(crate) trip_id: Option<i64>,
    pub(crate) before: DateTime<Utc>,
}

impl PostFilter {
    pub(crate) fn new(
        username: impl Into<String>,
        trip_id: Option<i64>,
        before: Option<&str>,
    ) -> Result<Self, DomainError> {
        let before = match before {
            Some(raw) => parse_timestamp("before", raw)?,
            None => Utc::now(),
        };

        Ok(Self {
            username: username.into(),
            trip_id,
            before,
        })
    }

    pub(crate) fn matches(&self, username: &str, trip_id: i64, created_at: DateTime<Utc>) -> bool {
        self.username == username
            && self.trip_id.is_none_or(|wanted| wanted == trip_id)
            && created_at < self.before
    }

    pub(crate) fn not_found_message(&self) -> &'static str {
        match self.trip_id {
            Some(_) => "no posts found for this user and trip",
            None => "no posts found for this user",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageSize(u32);

impl PageSize {
    /// Missing or non-positive sizes fall back to the default, large ones are
    /// capped.
    pub(crate) fn from_requested(requested: Option<i64>) -> Self {
        match requested {
            Some(size) if size > 0 => Self(size.min(MAX_PAGE_SIZE as i64) as u32),
            _ => Self(DEFAULT_PAGE_SIZE),
        }
    }

    /// Query-string form; a value that is not an integer counts as missing.
    pub(crate) fn from_query(raw: Option<&str>) -> Self {
        Self::from_requested(raw.and_then(|raw| raw.trim().parse::<i64>().ok()))
    }

    pub(crate) fn get(self) -> u32 {
        self.0
    }
}
