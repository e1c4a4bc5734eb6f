use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::info;

use storyteller_types::api::{
    GenerateStoryQuery, GeneratedStoryResponse, SaveStoryRequest, StoryPrompt, StoryQuery,
};
use storyteller_types::models::{SavedStory, Story};

use crate::error::ApiError;
use crate::extract::{JsonBody, PathParam, QueryParams};
use crate::{AppState, blocking};

/// POST /api/generate-story: Generate a story and store it.
///
/// The owner comes from the `user_id` query parameter, else from the body.
/// An owner that does not exist is ignored and the story is stored as
/// anonymous.
pub async fn generate_story(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<GenerateStoryQuery>,
    JsonBody(prompt): JsonBody<StoryPrompt>,
) -> Result<impl IntoResponse, ApiError> {
    validate_prompt(&prompt)?;
    let owner = query.user_id.or(prompt.user_id);

    let generated = state.generator.generate(&prompt).await;

    let db = state.db.clone();
    let to_store = generated.clone();
    let story = blocking(move || db.create_story(&to_store, owner)).await?;

    info!(
        "Stored story {} ({}, fallback: {})",
        story.id, story.title, generated.is_fallback
    );
    Ok((
        StatusCode::CREATED,
        Json(GeneratedStoryResponse::new(story, generated)),
    ))
}

/// GET /api/stories: Newest first, optionally filtered by owner and visibility.
pub async fn list_stories(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<StoryQuery>,
) -> Result<Json<Vec<Story>>, ApiError> {
    let db = state.db.clone();
    let stories = blocking(move || db.list_stories(query.user_id, query.is_public)).await?;
    Ok(Json(stories))
}

pub async fn get_story(
    State(state): State<AppState>,
    PathParam(story_id): PathParam<i64>,
) -> Result<Json<Story>, ApiError> {
    let db = state.db.clone();
    let story = blocking(move || db.get_story(story_id)).await?;
    Ok(Json(story))
}

/// POST /api/saved-stories: Bookmark a story for a user.
pub async fn save_story(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SaveStoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = req.saving_user();
    info!("Saving story {} for user {}", req.story_id, user_id);

    let db = state.db.clone();
    let saved: SavedStory = blocking(move || db.save_story(user_id, req.story_id)).await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

fn validate_prompt(prompt: &StoryPrompt) -> Result<(), ApiError> {
    let required = [
        ("character_type", &prompt.character_type),
        ("setting_type", &prompt.setting_type),
        ("theme_type", &prompt.theme_type),
        ("age_group", &prompt.age_group),
    ];

    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(ApiError::Validation(format!("{} must not be empty", field)));
        }
    }
    Ok(())
}
