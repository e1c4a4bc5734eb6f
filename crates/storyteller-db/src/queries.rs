use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use storyteller_types::models::{GeneratedStory, SavedStory, Story, StoryPromptRecord, User};
use tracing::{debug, warn};

use crate::models::{PromptRow, StoryRow, UserRow, parse_timestamp};
use crate::{Database, DbError, Filter, Result};

/// Stories without an owner are listed publicly; owned stories start private.
pub const ANONYMOUS_STORIES_ARE_PUBLIC: bool = true;

/// Visibility given to a newly stored story.
pub fn story_visibility(owner: Option<i64>) -> bool {
    match owner {
        None => ANONYMOUS_STORIES_ARE_PUBLIC,
        Some(_) => !ANONYMOUS_STORIES_ARE_PUBLIC,
    }
}

const PROMPT_COLUMNS: &str =
    "id, character_type, setting_type, theme_type, age_group, language, created_at";

const STORY_COLUMNS: &str = "id, title, content, theme, characters, setting, age_group, language, \
     user_id, is_public, created_at, updated_at";

const ALREADY_SAVED: &str = "Story already saved by this user";

impl Database {
    // -- Prompts --

    pub fn list_prompts(
        &self,
        language: Option<&str>,
        age_group: Option<&str>,
    ) -> Result<Vec<StoryPromptRecord>> {
        let filter = Filter::new()
            .eq_opt("language", language.map(str::to_owned))
            .eq_opt("age_group", age_group.map(str::to_owned));

        self.transaction(|tx| query_prompts(tx, &filter))
    }

    // -- Stories --

    /// Store a generated story.
    ///
    /// An `owner` that does not exist is dropped and the story is stored as
    /// anonymous, which also makes it public.
    pub fn create_story(&self, story: &GeneratedStory, owner: Option<i64>) -> Result<Story> {
        self.transaction(|tx| {
            let owner = match owner {
                Some(id) if !user_exists(tx, id)? => {
                    warn!("User {} does not exist, storing story as anonymous", id);
                    None
                }
                other => other,
            };
            let is_public = story_visibility(owner);
            let characters = serde_json::to_string(&story.characters)?;

            let (id, created_at, updated_at): (i64, String, String) = tx.query_row(
                "INSERT INTO stories
                    (title, content, theme, characters, setting, age_group, language, user_id, is_public)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 RETURNING id, created_at, updated_at",
                params![
                    story.title,
                    story.content,
                    story.theme,
                    characters,
                    story.setting,
                    story.age_group,
                    story.language,
                    owner,
                    is_public,
                ],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )?;

            debug!("Stored story {} (owner {:?}, public {})", id, owner, is_public);

            Ok(Story {
                id,
                title: story.title.clone(),
                content: story.content.clone(),
                theme: story.theme.clone(),
                characters: story.characters.clone(),
                setting: story.setting.clone(),
                age_group: story.age_group.clone(),
                language: story.language.clone(),
                user_id: owner,
                is_public,
                created_at: parse_timestamp(&created_at)?,
                updated_at: parse_timestamp(&updated_at)?,
            })
        })
    }

    /// Newest first. Both filters are optional and combine with AND.
    pub fn list_stories(&self, user_id: Option<i64>, is_public: Option<bool>) -> Result<Vec<Story>> {
        let filter = Filter::new()
            .eq_opt("user_id", user_id)
            .eq_opt("is_public", is_public);

        self.transaction(|tx| query_stories(tx, &filter))
    }

    pub fn get_story(&self, id: i64) -> Result<Story> {
        self.transaction(|tx| {
            query_story(tx, id)?.ok_or_else(|| DbError::NotFound("Story not found".to_string()))
        })
    }

    // -- Saved stories --

    /// Bookmark `story_id` for `user_id` and return the bookmark with the story.
    pub fn save_story(&self, user_id: i64, story_id: i64) -> Result<SavedStory> {
        self.transaction(|tx| {
            let story = query_story(tx, story_id)?.ok_or_else(|| {
                DbError::NotFound(format!("Story not found with ID: {}", story_id))
            })?;

            if !user_exists(tx, user_id)? {
                return Err(DbError::NotFound(format!("User not found with ID: {}", user_id)));
            }

            let existing: Option<i64> = tx
                .query_row(
                    "SELECT id FROM saved_stories WHERE user_id = ?1 AND story_id = ?2",
                    params![user_id, story_id],
                    |row| row.get(0),
                )
                .optional()?;
            if existing.is_some() {
                return Err(DbError::Conflict(ALREADY_SAVED.to_string()));
            }

            let (id, created_at): (i64, String) = tx
                .query_row(
                    "INSERT INTO saved_stories (user_id, story_id) VALUES (?1, ?2)
                     RETURNING id, created_at",
                    params![user_id, story_id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .map_err(|e| conflict_on_unique(e, ALREADY_SAVED))?;

            Ok(SavedStory {
                id,
                user_id,
                story_id,
                created_at: parse_timestamp(&created_at)?,
                story,
            })
        })
    }

    // -- Users --

    /// Insert a new account. `password_hash` is stored as given.
    pub fn create_user(&self, username: &str, email: &str, password_hash: &str) -> Result<User> {
        self.transaction(|tx| {
            let email_taken: Option<i64> = tx
                .query_row("SELECT id FROM users WHERE email = ?1", [email], |row| row.get(0))
                .optional()?;
            if email_taken.is_some() {
                return Err(DbError::Conflict("Email already registered".to_string()));
            }

            let username_taken: Option<i64> = tx
                .query_row("SELECT id FROM users WHERE username = ?1", [username], |row| {
                    row.get(0)
                })
                .optional()?;
            if username_taken.is_some() {
                return Err(DbError::Conflict("Username already taken".to_string()));
            }

            let (id, created_at): (i64, String) = tx
                .query_row(
                    "INSERT INTO users (username, email, password_hash) VALUES (?1, ?2, ?3)
                     RETURNING id, created_at",
                    (username, email, password_hash),
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .map_err(|e| conflict_on_unique(e, "Username or email already registered"))?;

            Ok(User {
                id,
                username: username.to_string(),
                email: email.to_string(),
                created_at: parse_timestamp(&created_at)?,
            })
        })
    }

    /// Full row including the stored password hash, for credential checks.
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.transaction(|tx| {
            let row = tx
                .query_row(
                    "SELECT id, username, email, password_hash, created_at FROM users WHERE email = ?1",
                    [email],
                    |row| {
                        Ok(UserRow {
                            id: row.get(0)?,
                            username: row.get(1)?,
                            email: row.get(2)?,
                            password_hash: row.get(3)?,
                            created_at: row.get(4)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
    }
}

fn user_exists(conn: &Connection, id: i64) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT id FROM users WHERE id = ?1", [id], |row| row.get(0))
        .optional()?;
    Ok(found.is_some())
}

fn conflict_on_unique(err: rusqlite::Error, message: &str) -> DbError {
    if DbError::is_unique_violation(&err) {
        DbError::Conflict(message.to_string())
    } else {
        err.into()
    }
}

fn query_prompts(conn: &Connection, filter: &Filter) -> Result<Vec<StoryPromptRecord>> {
    let sql = format!(
        "SELECT {} FROM story_prompts{} ORDER BY id",
        PROMPT_COLUMNS,
        filter.where_clause()
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(filter.params()), |row| {
            Ok(PromptRow {
                id: row.get(0)?,
                character_type: row.get(1)?,
                setting_type: row.get(2)?,
                theme_type: row.get(3)?,
                age_group: row.get(4)?,
                language: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter().map(StoryPromptRecord::try_from).collect()
}

fn query_stories(conn: &Connection, filter: &Filter) -> Result<Vec<Story>> {
    let sql = format!(
        "SELECT {} FROM stories{} ORDER BY created_at DESC, id DESC",
        STORY_COLUMNS,
        filter.where_clause()
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(filter.params()), story_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter().map(Story::try_from).collect()
}

fn query_story(conn: &Connection, id: i64) -> Result<Option<Story>> {
    let sql = format!("SELECT {} FROM stories WHERE id = ?1", STORY_COLUMNS);
    let row = conn.query_row(&sql, [id], story_row).optional()?;
    row.map(Story::try_from).transpose()
}

fn story_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoryRow> {
    Ok(StoryRow {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        theme: row.get(3)?,
        characters: row.get(4)?,
        setting: row.get(5)?,
        age_group: row.get(6)?,
        language: row.get(7)?,
        user_id: row.get(8)?,
        is_public: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}
