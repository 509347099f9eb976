use chrono::SecondsFormat;
use reqwest::{Client, Method, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;

use crate::error::{BlogClientError, BlogClientResult};
use crate::models::{ListOptions, ListPostsResponse, NewPost, Post, Status};

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    message: Option<String>,
    #[serde(default)]
    missing: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CreatePostResponseDto {
    post: Post,
}

#[derive(Debug, Default, PartialEq, Serialize)]
struct ListPostsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u32>,
}

impl From<ListOptions> for ListPostsQuery {
    fn from(options: ListOptions) -> Self {
        Self {
            before: options
                .before
                .map(|before| before.to_rfc3339_opts(SecondsFormat::Micros, true)),
            size: options.size,
        }
    }
}

#[derive(Debug, Clone)]
/// HTTP client for the `/blog` REST API.
pub struct HttpClient {
    base_url: Url,
    client: Client,
}

impl HttpClient {
    /// Builds a client for a server root such as `http://127.0.0.1:8080`.
    pub fn new(base_url: &str) -> BlogClientResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|err| BlogClientError::InvalidUrl(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(BlogClientError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self { base_url, client })
    }

    /// Appends percent-encoded segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> BlogClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BlogClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn decode_error(response: reqwest::Response) -> BlogClientError {
        let status = response.status();

        match response.json::<ErrorResponseDto>().await {
            Ok(body) => BlogClientError::from_http_status(status, body.message, body.missing),
            Err(_) => BlogClientError::from_http_status(status, None, Vec::new()),
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> BlogClientResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(BlogClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        Ok(response)
    }

    async fn send_json<TRes>(&self, request: reqwest::RequestBuilder) -> BlogClientResult<TRes>
    where
        TRes: DeserializeOwned,
    {
        self.send(request)
            .await?
            .json::<TRes>()
            .await
            .map_err(BlogClientError::from_reqwest)
    }

    /// `GET /blog/status`.
    pub async fn status(&self) -> BlogClientResult<Status> {
        let url = self.endpoint(&["blog", "status"])?;
        self.send_json(self.client.request(Method::GET, url)).await
    }

    /// `GET /blog/{username}` or `GET /blog/{username}/{trip_id}`.
    pub async fn list_posts(
        &self,
        username: &str,
        trip_id: Option<i64>,
        options: ListOptions,
    ) -> BlogClientResult<ListPostsResponse> {
        let trip_id = trip_id.map(|trip_id| trip_id.to_string());
        let url = match &trip_id {
            Some(trip_id) => self.endpoint(&["blog", username, trip_id])?,
            None => self.endpoint(&["blog", username])?,
        };

        let query = ListPostsQuery::from(options);
        self.send_json(self.client.request(Method::GET, url).query(&query))
            .await
    }

    /// `POST /blog/{username}/{trip_id}`. Requires a token issued for `username`.
    pub async fn create_post(
        &self,
        token: &str,
        username: &str,
        trip_id: i64,
        post: &NewPost,
    ) -> BlogClientResult<Post> {
        let url = self.endpoint(&["blog", username, &trip_id.to_string()])?;
        let request = self
            .client
            .request(Method::POST, url)
            .bearer_auth(token)
            .json(post);

        let dto: CreatePostResponseDto = self.send_json(request).await?;
        Ok(dto.post)
    }

    /// `DELETE /blog/{username}/{trip_id}/{id}`. Requires a token issued for `username`.
    pub async fn delete_post(
        &self,
        token: &str,
        username: &str,
        trip_id: i64,
        id: i64,
    ) -> BlogClientResult<()> {
        let url = self.endpoint(&["blog", username, &trip_id.to_string(), &id.to_string()])?;
        self.send(self.client.request(Method::DELETE, url).bearer_auth(token))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn endpoint_joins_and_encodes_segments() {
        let client = HttpClient::new("http://localhost:8080/").expect("valid base url");
        let url = client
            .endpoint(&["blog", "Dan Smith", "1"])
            .expect("valid endpoint");
        assert_eq!(url.as_str(), "http://localhost:8080/blog/Dan%20Smith/1");
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let client = HttpClient::new("http://localhost:8080/api").expect("valid base url");
        let url = client.endpoint(&["blog", "status"]).expect("valid endpoint");
        assert_eq!(url.as_str(), "http://localhost:8080/api/blog/status");
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(matches!(
            HttpClient::new("not a url"),
            Err(BlogClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpClient::new("mailto:dan@example.com"),
            Err(BlogClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn list_query_formats_before_with_micros() {
        let query = ListPostsQuery::from(ListOptions {
            before: Some(Utc.with_ymd_and_hms(2017, 1, 1, 6, 0, 0).unwrap()),
            size: Some(3),
        });
        assert_eq!(
            query,
            ListPostsQuery {
                before: Some("2017-01-01T06:00:00.000000Z".to_string()),
                size: Some(3),
            }
        );
        assert_eq!(
            ListPostsQuery::from(ListOptions::default()),
            ListPostsQuery::default()
        );
    }

    #[test]
    fn decodes_server_post_shape() {
        let body = serde_json::json!({
            "post": {
                "id": 7,
                "username": "Dan",
                "trip_id": 1,
                "created_at": "2017-05-04T12:34:56.789000Z",
                "location": null,
                "lon": null,
                "lat": null,
                "title": "Hello world",
                "content": "Lorem ipsum"
            }
        });

        let dto: CreatePostResponseDto = serde_json::from_value(body).expect("must decode");
        assert_eq!(dto.post.id, 7);
        assert_eq!(dto.post.location, None);
        assert_eq!(
            dto.post.created_at,
            Utc.with_ymd_and_hms(2017, 5, 4, 12, 34, 56).unwrap()
                + chrono::Duration::milliseconds(789)
        );
    }

    #[test]
    fn new_post_omits_unset_optionals() {
        let json = serde_json::to_value(NewPost::new("t", "c")).expect("must serialize");
        assert_eq!(json, serde_json::json!({"title": "t", "content": "c"}));
    }
}
