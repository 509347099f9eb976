use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

/// Version of the `/blog` API contract, independent of the crate version.
const BLOG_API_VERSION: &str = "1.0";

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct StatusDto {
    pub(crate) status: u16,
    pub(crate) version: String,
}

#[utoipa::path(
    get,
    path = "/blog/status",
    tag = "blog",
    responses(
        (status = 200, description = "Blog API is up", body = StatusDto)
    )
)]
pub(crate) async fn blog_status() -> Json<StatusDto> {
    Json(StatusDto {
        status: 200,
        version: BLOG_API_VERSION.to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/status",
    tag = "service",
    responses(
        (status = 200, description = "Service is up", body = StatusDto)
    )
)]
pub(crate) async fn service_status() -> Json<StatusDto> {
    Json(StatusDto {
        status: 200,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
