use axum::Router;
use axum::routing::get;

use super::handlers::status::service_status;
use crate::presentation::AppState;

pub(crate) mod posts;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/status", get(service_status))
        .nest("/blog", posts::router(state))
}
