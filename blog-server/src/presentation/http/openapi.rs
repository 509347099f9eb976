use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::http::handlers::posts::{
    CreatePostDto, CreatePostResponseDto, ListPostsQuery, ListPostsResponseDto, PostDto,
};
use crate::presentation::http::handlers::status::StatusDto;

#[derive(OpenApi)]
#[openapi(
    info(title = "Blog", version = "1.0", description = "Blog service"),
    paths(
        crate::presentation::http::handlers::status::service_status,
        crate::presentation::http::handlers::status::blog_status,
        crate::presentation::http::handlers::posts::list_user_posts,
        crate::presentation::http::handlers::posts::list_trip_posts,
        crate::presentation::http::handlers::posts::create_post,
        crate::presentation::http::handlers::posts::delete_post
    ),
    components(
        schemas(
            StatusDto,
            CreatePostDto,
            ListPostsQuery,
            PostDto,
            ListPostsResponseDto,
            CreatePostResponseDto
        )
    ),
    tags(
        (name = "service", description = "Service health"),
        (name = "blog", description = "Trip blog posts")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "HS256 token whose identity.username owns the path; the JWT scheme is also accepted",
                    ))
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}
