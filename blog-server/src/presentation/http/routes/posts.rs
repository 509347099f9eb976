use axum::Router;
use axum::middleware;
use axum::routing::{delete, get, post};

use crate::presentation::AppState;
use crate::presentation::http::handlers::posts::{
    create_post, delete_post, list_trip_posts, list_user_posts,
};
use crate::presentation::http::handlers::status::blog_status;
use crate::presentation::http::middleware::auth::identify_caller;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/status", get(blog_status))
        .route("/{username}", get(list_user_posts))
        .route("/{username}/{trip_id}", get(list_trip_posts));

    let protected = Router::new()
        .route("/{username}/{trip_id}", post(create_post))
        .route("/{username}/{trip_id}/{id}", delete(delete_post))
        .layer(middleware::from_fn_with_state(state, identify_caller));

    public.merge(protected)
}
