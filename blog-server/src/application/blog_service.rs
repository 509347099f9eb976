use chrono::Utc;
use tracing::{debug, info};

use crate::data::post_repository::{NewPost, PostRepository};
use crate::domain::access::Owner;
use crate::domain::error::DomainError;
use crate::domain::listing::{PageSize, PostFilter};
use crate::domain::post::{CreatePostRequest, Post, validate_username};
use crate::domain::timestamp::to_storage_precision;

#[derive(Debug, Clone)]
pub(crate) struct ListPostsResult {
    pub(crate) posts: Vec<Post>,
    pub(crate) total: i64,
}

pub(crate) struct BlogService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> BlogService<R> {
    pub(crate) fn new(repo: R) -> Self {
        Self { repo }
    }

    pub(crate) async fn create_post(
        &self,
        owner: &Owner,
        trip_id: i64,
        req: CreatePostRequest,
    ) -> Result<Post, DomainError> {
        validate_username(owner.username())?;
        let req = req.normalized();

        let new_post = NewPost {
            username: owner.username().to_string(),
            trip_id,
            created_at: req
                .created_at
                .unwrap_or_else(|| to_storage_precision(Utc::now())),
            lon: req.lon,
            lat: req.lat,
            location: req.location,
            title: req.title,
            content: req.content,
        };
        let post = self.repo.create_post(new_post).await?;

        info!(post_id = post.id, username = %post.username, trip_id, "post created");
        Ok(post)
    }

    /// Empty listings are reported as `NotFound` rather than an empty page.
    pub(crate) async fn list_posts(
        &self,
        filter: PostFilter,
        size: PageSize,
    ) -> Result<ListPostsResult, DomainError> {
        let total = self.repo.count_posts(&filter).await?;
        if total == 0 {
            debug!(username = %filter.username, trip_id = ?filter.trip_id, "no posts matched");
            return Err(DomainError::NotFound(filter.not_found_message().to_string()));
        }

        let posts = self.repo.list_posts(&filter, size).await?;
        Ok(ListPostsResult { posts, total })
    }

    pub(crate) async fn delete_post(
        &self,
        owner: &Owner,
        trip_id: i64,
        post_id: i64,
    ) -> Result<(), DomainError> {
        let deleted = self
            .repo
            .delete_post_owned(post_id, owner.username(), trip_id)
            .await?;
        if !deleted {
            return Err(DomainError::NotFound(format!("post id: {post_id}")));
        }

        info!(post_id, username = owner.username(), trip_id, "post deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};

    use super::BlogService;
    use crate::data::post_repository::{NewPost, PostRepository};
    use crate::domain::access::Owner;
    use crate::domain::error::DomainError;
    use crate::domain::listing::{PageSize, PostFilter};
    use crate::domain::post::{CreatePostRequest, Post};

    #[derive(Clone)]
    struct FakePostRepo {
        created_input: Arc<Mutex<Option<NewPost>>>,
        list_call: Arc<Mutex<Option<(PostFilter, PageSize)>>>,
        delete_call: Arc<Mutex<Option<(i64, String, i64)>>>,
        delete_result: Arc<Mutex<bool>>,
        list_result: Arc<Mutex<Vec<Post>>>,
        total_result: Arc<Mutex<i64>>,
    }

    impl FakePostRepo {
        fn new() -> Self {
            Self {
                created_input: Arc::new(Mutex::new(None)),
                list_call: Arc::new(Mutex::new(None)),
                delete_call: Arc::new(Mutex::new(None)),
                delete_result: Arc::new(Mutex::new(true)),
                list_result: Arc::new(Mutex::new(Vec::new())),
                total_result: Arc::new(Mutex::new(0)),
            }
        }
    }

    #[async_trait]
    impl PostRepository for FakePostRepo {
        async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
            *self
                .created_input
                .lock()
                .expect("created_input mutex poisoned") = Some(input.clone());
            Ok(Post {
                id: 1,
                username: input.username,
                trip_id: input.trip_id,
                created_at: input.created_at,
                location: input.location,
                lon: input.lon,
                lat: input.lat,
                title: input.title,
                content: input.content,
            })
        }

        async fn list_posts(
            &self,
            filter: &PostFilter,
            size: PageSize,
        ) -> Result<Vec<Post>, DomainError> {
            *self.list_call.lock().expect("list_call mutex poisoned") =
                Some((filter.clone(), size));
            Ok(self
                .list_result
                .lock()
                .expect("list_result mutex poisoned")
                .clone())
        }

        async fn count_posts(&self, _filter: &PostFilter) -> Result<i64, DomainError> {
            Ok(*self
                .total_result
                .lock()
                .expect("total_result mutex poisoned"))
        }

        async fn delete_post_owned(
            &self,
            id: i64,
            username: &str,
            trip_id: i64,
        ) -> Result<bool, DomainError> {
            *self.delete_call.lock().expect("delete_call mutex poisoned") =
                Some((id, username.to_string(), trip_id));
            Ok(*self
                .delete_result
                .lock()
                .expect("delete_result mutex poisoned"))
        }
    }

    fn request() -> CreatePostRequest {
        CreatePostRequest {
            title: "Hello world".to_string(),
            content: "Lorem ipsum".to_string(),
            lon: Some(-71.06),
            lat: Some(42.36),
            location: Some("Boston".to_string()),
            created_at: None,
        }
    }

    fn filter(trip_id: Option<i64>) -> PostFilter {
        PostFilter {
            username: "Dan".to_string(),
            trip_id,
            before: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_post_uses_owner_and_stamps_created_at() {
        let repo = FakePostRepo::new();
        let service = BlogService::new(repo.clone());
        let lower = Utc::now() - Duration::seconds(1);

        let created = service
            .create_post(&Owner::for_tests("Dan"), 1, request())
            .await
            .expect("create_post must succeed");

        assert_eq!(created.username, "Dan");
        assert_eq!(created.trip_id, 1);
        assert!(created.created_at >= lower);

        let input = repo
            .created_input
            .lock()
            .expect("created_input mutex poisoned")
            .clone()
            .expect("repo input must be captured");
        assert_eq!(input.username, "Dan");
        assert_eq!(input.location.as_deref(), Some("Boston"));
        assert_eq!(input.lat, Some(42.36));
    }

    #[tokio::test]
    async fn create_post_keeps_client_created_at() {
        let repo = FakePostRepo::new();
        let service = BlogService::new(repo.clone());
        let created_at = Utc.with_ymd_and_hms(2016, 1, 2, 3, 4, 5).unwrap();

        let req = CreatePostRequest {
            created_at: Some(created_at),
            ..request()
        };
        let created = service
            .create_post(&Owner::for_tests("Dan"), 1, req)
            .await
            .expect("create_post must succeed");

        assert_eq!(created.created_at, created_at);
    }

    #[tokio::test]
    async fn create_post_rejects_long_username_before_repo_call() {
        let repo = FakePostRepo::new();
        let service = BlogService::new(repo.clone());

        let err = service
            .create_post(&Owner::for_tests(&"u".repeat(33)), 1, request())
            .await
            .expect_err("must be rejected");

        assert!(matches!(
            err,
            DomainError::Validation {
                field: "username",
                ..
            }
        ));
        assert!(
            repo.created_input
                .lock()
                .expect("created_input mutex poisoned")
                .is_none()
        );
    }

    #[tokio::test]
    async fn create_post_truncates_client_created_at() {
        let repo = FakePostRepo::new();
        let service = BlogService::new(repo.clone());
        let created_at = Utc.with_ymd_and_hms(2016, 1, 2, 3, 4, 5).unwrap()
            + Duration::nanoseconds(1_234_567);

        let req = CreatePostRequest {
            created_at: Some(created_at),
            ..request()
        };
        let created = service
            .create_post(&Owner::for_tests("Dan"), 1, req)
            .await
            .expect("create_post must succeed");

        assert_eq!(
            created.created_at,
            Utc.with_ymd_and_hms(2016, 1, 2, 3, 4, 5).unwrap() + Duration::microseconds(1_234)
        );
    }

    #[tokio::test]
    async fn list_posts_returns_not_found_when_nothing_matches() {
        let repo = FakePostRepo::new();
        let service = BlogService::new(repo.clone());

        let err = service
            .list_posts(filter(Some(3)), PageSize::from_requested(None))
            .await
            .expect_err("must be not found");

        match err {
            DomainError::NotFound(message) => {
                assert_eq!(message, "no posts found for this user and trip")
            }
            _ => panic!("expected DomainError::NotFound"),
        }
        assert!(
            repo.list_call
                .lock()
                .expect("list_call mutex poisoned")
                .is_none()
        );
    }

    #[tokio::test]
    async fn list_posts_returns_page_and_full_total() {
        let repo = FakePostRepo::new();
        *repo.list_result.lock().expect("list_result mutex poisoned") = vec![Post {
            id: 5,
            username: "Dan".to_string(),
            trip_id: 1,
            created_at: Utc::now(),
            location: None,
            lon: None,
            lat: None,
            title: "t".to_string(),
            content: "c".to_string(),
        }];
        *repo
            .total_result
            .lock()
            .expect("total_result mutex poisoned") = 14;

        let service = BlogService::new(repo.clone());
        let result = service
            .list_posts(filter(None), PageSize::from_requested(Some(1)))
            .await
            .expect("list_posts must succeed");

        assert_eq!(result.total, 14);
        assert_eq!(result.posts.len(), 1);

        let (_, size) = repo
            .list_call
            .lock()
            .expect("list_call mutex poisoned")
            .clone()
            .expect("list call must be captured");
        assert_eq!(size.get(), 1);
    }

    #[tokio::test]
    async fn delete_post_is_scoped_to_owner_partition() {
        let repo = FakePostRepo::new();
        let service = BlogService::new(repo.clone());

        service
            .delete_post(&Owner::for_tests("Dan"), 4, 9)
            .await
            .expect("delete must succeed");

        let call = repo
            .delete_call
            .lock()
            .expect("delete_call mutex poisoned")
            .clone()
            .expect("delete call must be captured");
        assert_eq!(call, (9, "Dan".to_string(), 4));
    }

    #[tokio::test]
    async fn delete_post_reports_missing_post() {
        let repo = FakePostRepo::new();
        *repo
            .delete_result
            .lock()
            .expect("delete_result mutex poisoned") = false;

        let service = BlogService::new(repo);
        let err = service
            .delete_post(&Owner::for_tests("Dan"), 1, 42)
            .await
            .expect_err("post must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
