use axum::{Json, extract::State};

use storyteller_types::api::PromptQuery;
use storyteller_types::models::StoryPromptRecord;

use crate::error::ApiError;
use crate::extract::QueryParams;
use crate::{AppState, blocking};

/// GET /api/story-prompts: Catalog entries, optionally narrowed by language
/// and age group.
pub async fn list_prompts(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PromptQuery>,
) -> Result<Json<Vec<StoryPromptRecord>>, ApiError> {
    let db = state.db.clone();
    let prompts = blocking(move || {
        db.list_prompts(query.language.as_deref(), query.age_group.as_deref())
    })
    .await?;

    Ok(Json(prompts))
}
