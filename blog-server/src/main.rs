use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use application::blog_service::BlogService;
use data::post_repository::DynPostRepository;
use data::repositories::memory::post_repository::InMemoryPostRepository;
use data::repositories::postgres::post_repository::PostgresPostRepository;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::jwt::JwtService;
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let repo: DynPostRepository = match &settings.database_url {
        Some(database_url) => {
            let pool = create_pool(database_url, settings.database_max_connections).await?;
            run_migrations(&pool).await?;
            info!("storing posts in postgres");
            Arc::new(PostgresPostRepository::new(pool))
        }
        None => {
            warn!("DATABASE_URL is not set, posts are kept in memory only");
            Arc::new(InMemoryPostRepository::new())
        }
    };

    let blog_service = Arc::new(BlogService::new(repo));
    let jwt = Arc::new(JwtService::new(&settings.jwt_secret));
    let state = AppState::new(blog_service, jwt);

    server::run_http(&settings, state).await
}
