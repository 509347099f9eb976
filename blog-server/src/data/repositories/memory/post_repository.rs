use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::data::post_repository::{NewPost, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::listing::{PageSize, PostFilter};
use crate::domain::post::Post;

/// Process-local store used when no database is configured.
#[derive(Debug, Clone, Default)]
pub(crate) struct InMemoryPostRepository {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i64,
    posts: Vec<Post>,
}

impl InMemoryPostRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, DomainError> {
        self.state
            .read()
            .map_err(|_| DomainError::Unexpected("post store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>, DomainError> {
        self.state
            .write()
            .map_err(|_| DomainError::Unexpected("post store lock poisoned".to_string()))
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let mut state = self.write()?;
        let id = state.last_id + 1;

        let post = Post::new(
            id,
            input.username,
            input.trip_id,
            input.created_at,
            input.location,
            input.lon,
            input.lat,
            input.title,
            input.content,
        )?;
        state.last_id = id;
        state.posts.push(post.clone());
        Ok(post)
    }

    async fn list_posts(
        &self,
        filter: &PostFilter,
        size: PageSize,
    ) -> Result<Vec<Post>, DomainError> {
        let state = self.read()?;
        let mut posts: Vec<Post> = state
            .posts
            .iter()
            .filter(|post| filter.matches(&post.username, post.trip_id, post.created_at))
            .cloned()
            .collect();

        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        posts.truncate(size.get() as usize);
        Ok(posts)
    }

    async fn count_posts(&self, filter: &PostFilter) -> Result<i64, DomainError> {
        let state = self.read()?;
        let total = state
            .posts
            .iter()
            .filter(|post| filter.matches(&post.username, post.trip_id, post.created_at))
            .count();
        Ok(total as i64)
    }

    async fn delete_post_owned(
        &self,
        id: i64,
        username: &str,
        trip_id: i64,
    ) -> Result<bool, DomainError> {
        let mut state = self.write()?;
        let position = state
            .posts
            .iter()
            .position(|post| post.id == id && post.username == username && post.trip_id == trip_id);

        match position {
            Some(index) => {
                state.posts.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
