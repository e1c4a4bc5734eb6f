use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{GeneratedStory, Story};

// -- Story generation --

/// Structured story parameters. This is what the service calls a "prompt";
/// the text sent to the completion service is derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryPrompt {
    pub character_type: String,
    pub setting_type: String,
    pub theme_type: String,
    pub age_group: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_story_length")]
    pub story_length: String,
    #[serde(default)]
    pub custom_prompt: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    /// Owner of the generated story. The `user_id` query parameter takes
    /// precedence when both are given.
    #[serde(default)]
    pub user_id: Option<i64>,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_story_length() -> String {
    "medium".to_string()
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateStoryQuery {
    pub user_id: Option<i64>,
}

/// A freshly generated and stored story: the stored record plus the
/// generation details that are not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedStoryResponse {
    #[serde(flatten)]
    pub story: Story,
    pub story_length: String,
    pub style: Option<String>,
    pub is_fallback: bool,
}

impl GeneratedStoryResponse {
    pub fn new(story: Story, generated: GeneratedStory) -> Self {
        Self {
            story,
            story_length: generated.story_length,
            style: generated.style,
            is_fallback: generated.is_fallback,
        }
    }
}

// -- Catalog / listing --

#[derive(Debug, Default, Deserialize)]
pub struct PromptQuery {
    pub language: Option<String>,
    pub age_group: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StoryQuery {
    pub user_id: Option<i64>,
    pub is_public: Option<bool>,
}

// -- Saved stories --

/// Clients without an account save under the first user.
pub const DEFAULT_SAVING_USER: i64 = 1;

#[derive(Debug, Deserialize)]
pub struct SaveStoryRequest {
    pub story_id: i64,
    /// Missing and `null` both mean [`DEFAULT_SAVING_USER`].
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl SaveStoryRequest {
    pub fn saving_user(&self) -> i64 {
        self.user_id.unwrap_or(DEFAULT_SAVING_USER)
    }
}

// -- Auth --

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// -- Misc --

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// "available" when a completion API key is configured, "missing" otherwise.
    pub openai_api: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
