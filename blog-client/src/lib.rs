//! Client library for the trip blog service.
//!
//! `BlogClient` wraps the `/blog` REST API over HTTP (`reqwest`). Listings are
//! public; creating and deleting posts needs a token issued for the path's
//! username, set with [`BlogClient::set_token`].
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;

pub use error::{BlogClientError, BlogClientResult};
pub use models::{ListOptions, ListPostsResponse, NewPost, Post, Status};

use http_client::HttpClient;

#[derive(Debug, Clone)]
/// Client for the blog service.
pub struct BlogClient {
    http_client: HttpClient,
    token: Option<String>,
}

impl BlogClient {
    /// Creates a client for a server root such as `http://127.0.0.1:8080`.
    pub fn new(base_url: &str) -> BlogClientResult<Self> {
        Ok(Self {
            http_client: HttpClient::new(base_url)?,
            token: None,
        })
    }

    /// Sets the bearer token used for writes.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Returns the current token, if set.
    pub fn get_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Forgets the stored token.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Checks that the blog API is up.
    pub async fn status(&self) -> BlogClientResult<Status> {
        self.http_client.status().await
    }

    /// Lists a user's posts across all trips, newest first.
    ///
    /// Returns [`BlogClientError::NotFound`] when nothing matches.
    pub async fn list_user_posts(
        &self,
        username: &str,
        options: ListOptions,
    ) -> BlogClientResult<ListPostsResponse> {
        self.http_client.list_posts(username, None, options).await
    }

    /// Lists a user's posts for one trip, newest first.
    ///
    /// Returns [`BlogClientError::NotFound`] when nothing matches.
    pub async fn list_trip_posts(
        &self,
        username: &str,
        trip_id: i64,
        options: ListOptions,
    ) -> BlogClientResult<ListPostsResponse> {
        self.http_client
            .list_posts(username, Some(trip_id), options)
            .await
    }

    /// Creates a post under `username`/`trip_id`.
    ///
    /// Requires a token issued for `username`.
    pub async fn create_post(
        &self,
        username: &str,
        trip_id: i64,
        post: &NewPost,
    ) -> BlogClientResult<Post> {
        let token = self.require_token()?;
        self.http_client
            .create_post(token, username, trip_id, post)
            .await
    }

    /// Deletes post `id` if it belongs to `username` and `trip_id`.
    ///
    /// Requires a token issued for `username`.
    pub async fn delete_post(&self, username: &str, trip_id: i64, id: i64) -> BlogClientResult<()> {
        let token = self.require_token()?;
        self.http_client
            .delete_post(token, username, trip_id, id)
            .await
    }

    fn require_token(&self) -> BlogClientResult<&str> {
        self.token.as_deref().ok_or(BlogClientError::MissingToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_can_be_set_and_cleared() {
        let mut client = BlogClient::new("http://127.0.0.1:8080").expect("valid base url");
        assert_eq!(client.get_token(), None);

        client.set_token("abc");
        assert_eq!(client.get_token(), Some("abc"));

        client.clear_token();
        assert_eq!(client.get_token(), None);
    }

    #[tokio::test]
    async fn writes_require_a_token_before_any_request() {
        let client = BlogClient::new("http://127.0.0.1:9").expect("valid base url");

        let created = client.create_post("Dan", 1, &NewPost::new("t", "c")).await;
        assert!(matches!(created, Err(BlogClientError::MissingToken)));

        let deleted = client.delete_post("Dan", 1, 1).await;
        assert!(matches!(deleted, Err(BlogClientError::MissingToken)));
    }
}
