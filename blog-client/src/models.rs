use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A trip blog post as returned by the server.
pub struct Post {
    /// Post id.
    pub id: i64,
    /// Author.
    pub username: String,
    /// Trip the post belongs to.
    pub trip_id: i64,
    /// Creation time (UTC, microsecond precision).
    pub created_at: DateTime<Utc>,
    /// Free-form place name.
    pub location: Option<String>,
    /// Longitude in degrees.
    pub lon: Option<f64>,
    /// Latitude in degrees.
    pub lat: Option<f64>,
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize)]
/// Payload for a new post. Only `title` and `content` are required.
pub struct NewPost {
    /// Title, at most 256 characters.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Longitude in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    /// Latitude in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    /// Place name, at most 128 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Creation time; the server uses the current time when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl NewPost {
    /// Post with just a title and body.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Paging options for listings.
pub struct ListOptions {
    /// Only posts created strictly before this time; the server defaults to now.
    pub before: Option<DateTime<Utc>>,
    /// Page size; the server defaults to 10 and caps at 1000.
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// One page of posts, newest first.
pub struct ListPostsResponse {
    /// Posts on this page.
    pub posts: Vec<Post>,
    /// Number of posts matching the filter, ignoring the page size.
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// Health report of the blog API.
pub struct Status {
    /// HTTP-style status code, 200 when healthy.
    pub status: u16,
    /// API version.
    pub version: String,
}
