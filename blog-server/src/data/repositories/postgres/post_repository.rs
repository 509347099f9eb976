use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::error;

use crate::data::post_repository::{NewPost, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::listing::{PageSize, PostFilter};
use crate::domain::post::Post;

const SELECT_POSTS: &str = r#"
    SELECT
        id,
        username,
        trip_id,
        created_at,
        location,
        lon,
        lat,
        title,
        content
    FROM posts
"#;

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct PostRow {
    id: i64,
    username: String,
    trip_id: i64,
    created_at: DateTime<Utc>,
    location: Option<String>,
    lon: Option<f64>,
    lat: Option<f64>,
    title: String,
    content: String,
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (username, trip_id, created_at, lon, lat, location, title, content)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, username, trip_id, created_at, location, lon, lat, title, content
            "#,
        )
        .bind(input.username)
        .bind(input.trip_id)
        .bind(input.created_at)
        .bind(input.lon)
        .bind(input.lat)
        .bind(input.location)
        .bind(input.title)
        .bind(input.content)
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        map_row_to_post(row)
    }

    async fn list_posts(
        &self,
        filter: &PostFilter,
        size: PageSize,
    ) -> Result<Vec<Post>, DomainError> {
        let mut query = QueryBuilder::<Postgres>::new(SELECT_POSTS);
        push_filter(&mut query, filter);
        query
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(i64::from(size.get()));

        let rows = query
            .build_query_as::<PostRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        rows.into_iter().map(map_row_to_post).collect()
    }

    async fn count_posts(&self, filter: &PostFilter) -> Result<i64, DomainError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM posts");
        push_filter(&mut query, filter);

        query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_post_db_error)
    }

    async fn delete_post_owned(
        &self,
        id: i64,
        username: &str,
        trip_id: i64,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE id = $1 AND username = $2 AND trip_id = $3
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(trip_id)
        .execute(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}

fn push_filter(query: &mut QueryBuilder<'_, Postgres>, filter: &PostFilter) {
    query
        .push(" WHERE username = ")
        .push_bind(filter.username.clone());
    if let Some(trip_id) = filter.trip_id {
        query.push(" AND trip_id = ").push_bind(trip_id);
    }
    query.push(" AND created_at < ").push_bind(filter.before);
}

fn map_row_to_post(row: PostRow) -> Result<Post, DomainError> {
    Post::new(
        row.id,
        row.username,
        row.trip_id,
        row.created_at,
        row.location,
        row.lon,
        row.lat,
        row.title,
        row.content,
    )
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    // string_data_right_truncation
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("22001")
    {
        return DomainError::Validation {
            field: "post",
            message: "value too long",
        };
    }
    error!(error = %err, "posts query failed");
    DomainError::Unexpected(err.to_string())
}
