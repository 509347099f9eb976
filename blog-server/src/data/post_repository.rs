use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::error::DomainError;
use crate::domain::listing::{PageSize, PostFilter};
use crate::domain::post::Post;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NewPost {
    pub(crate) username: String,
    pub(crate) trip_id: i64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) lon: Option<f64>,
    pub(crate) lat: Option<f64>,
    pub(crate) location: Option<String>,
    pub(crate) title: String,
    pub(crate) content: String,
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    /// Newest first, at most `size` rows.
    async fn list_posts(&self, filter: &PostFilter, size: PageSize)
    -> Result<Vec<Post>, DomainError>;
    async fn count_posts(&self, filter: &PostFilter) -> Result<i64, DomainError>;
    /// Deletes post `id` only if it sits in the given user/trip partition.
    async fn delete_post_owned(
        &self,
        id: i64,
        username: &str,
        trip_id: i64,
    ) -> Result<bool, DomainError>;
}

pub(crate) type DynPostRepository = Arc<dyn PostRepository>;

#[async_trait]
impl<T: PostRepository + ?Sized> PostRepository for Arc<T> {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        (**self).create_post(input).await
    }

    async fn list_posts(
        &self,
        filter: &PostFilter,
        size: PageSize,
    ) -> Result<Vec<Post>, DomainError> {
        (**self).list_posts(filter, size).await
    }

    async fn count_posts(&self, filter: &PostFilter) -> Result<i64, DomainError> {
        (**self).count_posts(filter).await
    }

    async fn delete_post_owned(
        &self,
        id: i64,
        username: &str,
        trip_id: i64,
    ) -> Result<bool, DomainError> {
        (**self).delete_post_owned(id, username, trip_id).await
    }
}
