pub mod auth;
pub mod error;
pub mod extract;
pub mod health;
pub mod prompts;
pub mod stories;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use storyteller_db::Database;
use storyteller_generator::StoryGenerator;
use tracing::error;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub generator: StoryGenerator,
    /// Whether a completion API key was configured at startup.
    pub completion_configured: bool,
}

/// All API routes. Transport layers (CORS, tracing) are added by the caller.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/story-prompts", get(prompts::list_prompts))
        .route("/api/generate-story", post(stories::generate_story))
        .route("/api/stories", get(stories::list_stories))
        .route("/api/stories/{story_id}", get(stories::get_story))
        .route("/api/saved-stories", post(stories::save_story))
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/health", get(health::health))
        .with_state(state)
}

/// Run blocking database work off the async runtime.
pub(crate) async fn blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> storyteller_db::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal
        })?
        .map_err(ApiError::from)
}
