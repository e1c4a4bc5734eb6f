//! Database row types. These map directly to SQLite rows and are converted
//! into `storyteller-types` models at the edge of this crate.

use chrono::{DateTime, Utc};
use storyteller_types::models::{Story, StoryPromptRecord, User};

use crate::{DbError, Result};

pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// `"salt:digest"`, both hex-encoded.
    pub password_hash: String,
    pub created_at: String,
}

pub struct StoryRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub theme: String,
    /// JSON array of character names.
    pub characters: String,
    pub setting: String,
    pub age_group: String,
    pub language: String,
    pub user_id: Option<i64>,
    pub is_public: bool,
    pub created_at: String,
    pub updated_at: String,
}

pub struct PromptRow {
    pub id: i64,
    pub character_type: String,
    pub setting_type: String,
    pub theme_type: String,
    pub age_group: String,
    pub language: String,
    pub created_at: String,
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DbError::Timestamp(raw.to_string()))
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            id: row.id,
            username: row.username,
            email: row.email,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

impl TryFrom<StoryRow> for Story {
    type Error = DbError;

    fn try_from(row: StoryRow) -> Result<Self> {
        Ok(Story {
            id: row.id,
            title: row.title,
            content: row.content,
            theme: row.theme,
            characters: serde_json::from_str(&row.characters)?,
            setting: row.setting,
            age_group: row.age_group,
            language: row.language,
            user_id: row.user_id,
            is_public: row.is_public,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

impl TryFrom<PromptRow> for StoryPromptRecord {
    type Error = DbError;

    fn try_from(row: PromptRow) -> Result<Self> {
        Ok(StoryPromptRecord {
            id: row.id,
            character_type: row.character_type,
            setting_type: row.setting_type,
            theme_type: row.theme_type,
            age_group: row.age_group,
            language: row.language,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}
