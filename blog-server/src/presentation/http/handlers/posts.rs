use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;
use validator::Validate;

use crate::application::blog_service::ListPostsResult;
use crate::domain::access::{Access, Identity, Owner, belongs_to};
use crate::domain::error::DomainError;
use crate::domain::listing::{PageSize, PostFilter};
use crate::domain::post::{CreatePostRequest, Post};
use crate::domain::timestamp::{parse_timestamp, serialize_micros};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::extract::{ApiPath, ApiQuery};
use crate::presentation::http::middleware::auth::Caller;

/// `title` and `content` are required; they are optional here so that every
/// missing one can be reported at once.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub(crate) struct CreatePostDto {
    #[validate(length(max = 256))]
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub(crate) lon: Option<f64>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub(crate) lat: Option<f64>,
    #[validate(length(max = 128))]
    pub(crate) location: Option<String>,
    /// ISO-8601, defaults to the time of creation.
    pub(crate) created_at: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct ListPostsQuery {
    pub(crate) before: Option<String>,
    /// Kept raw: anything that is not an integer means the default.
    #[schema(value_type = Option<i64>)]
    pub(crate) size: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) trip_id: i64,
    #[serde(serialize_with = "serialize_micros")]
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) location: Option<String>,
    pub(crate) lon: Option<f64>,
    pub(crate) lat: Option<f64>,
    pub(crate) title: String,
    pub(crate) content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ListPostsResponseDto {
    pub(crate) posts: Vec<PostDto>,
    pub(crate) total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CreatePostResponseDto {
    pub(crate) post: PostDto,
}

impl CreatePostDto {
    fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", self.title.is_none()),
            ("content", self.content.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, missing)| missing.then_some(field))
        .collect()
    }

    /// Presence first, then value checks.
    pub(crate) fn into_request(self) -> AppResult<CreatePostRequest> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(DomainError::MissingFields(missing).into());
        }
        self.validate()?;

        let created_at = self
            .created_at
            .as_deref()
            .map(|raw| parse_timestamp("created_at", raw))
            .transpose()?;

        Ok(CreatePostRequest {
            title: self.title.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            lon: self.lon,
            lat: self.lat,
            location: self.location,
            created_at,
        })
    }
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            username: post.username,
            trip_id: post.trip_id,
            created_at: post.created_at,
            location: post.location,
            lon: post.lon,
            lat: post.lat,
            title: post.title,
            content: post.content,
        }
    }
}

impl From<ListPostsResult> for ListPostsResponseDto {
    fn from(result: ListPostsResult) -> Self {
        Self {
            posts: result.posts.into_iter().map(PostDto::from).collect(),
            total: result.total,
        }
    }
}

fn require_owner(identity: Option<&Identity>, username: &str) -> Result<Owner, DomainError> {
    match belongs_to(identity, username) {
        Access::Granted(owner) => Ok(owner),
        Access::Denied => {
            debug!(
                username,
                caller = identity.map(|identity| identity.username.as_str()),
                "write denied"
            );
            Err(DomainError::Forbidden)
        }
    }
}

async fn list(
    state: &AppState,
    username: String,
    trip_id: Option<i64>,
    query: ListPostsQuery,
) -> AppResult<(StatusCode, Json<ListPostsResponseDto>)> {
    let filter = PostFilter::new(username, trip_id, query.before.as_deref())?;
    let size = PageSize::from_query(query.size.as_deref());

    let result = state.blog_service.list_posts(filter, size).await?;
    Ok((StatusCode::OK, Json(ListPostsResponseDto::from(result))))
}

#[utoipa::path(
    get,
    path = "/blog/{username}",
    tag = "blog",
    params(
        ("username" = String, Path, description = "Username"),
        ("before" = Option<String>, Query, description = "Only posts created strictly before this ISO-8601 time (default: now)"),
        ("size" = Option<i64>, Query, description = "Page size, default 10, at most 1000")
    ),
    responses(
        (status = 200, description = "Found posts, newest first", body = ListPostsResponseDto),
        (status = 400, description = "Invalid query"),
        (status = 404, description = "No posts found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_user_posts(
    State(state): State<AppState>,
    ApiPath(username): ApiPath<String>,
    ApiQuery(query): ApiQuery<ListPostsQuery>,
) -> AppResult<(StatusCode, Json<ListPostsResponseDto>)> {
    list(&state, username, None, query).await
}

#[utoipa::path(
    get,
    path = "/blog/{username}/{trip_id}",
    tag = "blog",
    params(
        ("username" = String, Path, description = "Username"),
        ("trip_id" = i64, Path, description = "Numeric trip id"),
        ("before" = Option<String>, Query, description = "Only posts created strictly before this ISO-8601 time (default: now)"),
        ("size" = Option<i64>, Query, description = "Page size, default 10, at most 1000")
    ),
    responses(
        (status = 200, description = "Found posts, newest first", body = ListPostsResponseDto),
        (status = 400, description = "Invalid query"),
        (status = 404, description = "No posts found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_trip_posts(
    State(state): State<AppState>,
    ApiPath((username, trip_id)): ApiPath<(String, i64)>,
    ApiQuery(query): ApiQuery<ListPostsQuery>,
) -> AppResult<(StatusCode, Json<ListPostsResponseDto>)> {
    list(&state, username, Some(trip_id), query).await
}

#[utoipa::path(
    post,
    path = "/blog/{username}/{trip_id}",
    tag = "blog",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("username" = String, Path, description = "Username, must match the token"),
        ("trip_id" = i64, Path, description = "Numeric trip id")
    ),
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created", body = CreatePostResponseDto),
        (status = 400, description = "Missing or invalid fields"),
        (status = 403, description = "Not allowed"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    Caller(identity): Caller,
    ApiPath((username, trip_id)): ApiPath<(String, i64)>,
    body: Result<Json<CreatePostDto>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreatePostResponseDto>)> {
    let owner = require_owner(identity.as_ref(), &username)?;
    let Json(dto) = body?;
    let req = dto.into_request()?;

    let post = state.blog_service.create_post(&owner, trip_id, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatePostResponseDto {
            post: PostDto::from(post),
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/blog/{username}/{trip_id}/{id}",
    tag = "blog",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("username" = String, Path, description = "Username, must match the token"),
        ("trip_id" = i64, Path, description = "Numeric trip id"),
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post deleted"),
        (status = 403, description = "Not allowed"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    Caller(identity): Caller,
    ApiPath((username, trip_id, id)): ApiPath<(String, i64, i64)>,
) -> AppResult<StatusCode> {
    let owner = require_owner(identity.as_ref(), &username)?;

    state.blog_service.delete_post(&owner, trip_id, id).await?;
    Ok(StatusCode::OK)
}
