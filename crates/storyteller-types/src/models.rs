use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An account as exposed to callers. Password material never leaves the
/// database layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub theme: String,
    pub characters: Vec<String>,
    pub setting: String,
    pub age_group: String,
    pub language: String,
    pub user_id: Option<i64>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Catalog entry used by clients to offer ready-made story ideas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryPromptRecord {
    pub id: i64,
    pub character_type: String,
    pub setting_type: String,
    pub theme_type: String,
    pub age_group: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedStory {
    pub id: i64,
    pub user_id: i64,
    pub story_id: i64,
    pub created_at: DateTime<Utc>,
    pub story: Story,
}

/// Output of the story generator, before it is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedStory {
    pub title: String,
    pub content: String,
    pub characters: Vec<String>,
    pub setting: String,
    pub theme: String,
    pub age_group: String,
    pub language: String,
    pub story_length: String,
    pub style: Option<String>,
    /// Set when the completion service could not be used and the
    /// templated story was returned instead.
    pub is_fallback: bool,
}
