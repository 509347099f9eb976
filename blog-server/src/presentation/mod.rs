use std::sync::Arc;

use crate::application::blog_service::BlogService;
use crate::data::post_repository::DynPostRepository;
use crate::infrastructure::jwt::JwtService;

pub(crate) mod http;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) blog_service: Arc<BlogService<DynPostRepository>>,
    pub(crate) jwt: Arc<JwtService>,
}

impl AppState {
    pub(crate) fn new(
        blog_service: Arc<BlogService<DynPostRepository>>,
        jwt: Arc<JwtService>,
    ) -> Self {
        Self { blog_service, jwt }
    }
}
