use rusqlite::Connection;
use tracing::info;

use crate::Result;

/// Catalog entries offered to clients on a fresh install:
/// (character, setting, theme, age group, language).
const SEED_PROMPTS: &[(&str, &str, &str, &str, &str)] = &[
    ("Princess", "Castle", "Adventure", "3-5", "en"),
    ("Pirate", "Ship", "Treasure Hunt", "6-8", "en"),
    ("Astronaut", "Space", "Discovery", "9-12", "en"),
    ("Wizard", "Magic School", "Learning", "3-5", "en"),
    ("Dragon", "Mountain", "Friendship", "6-8", "en"),
    ("Robot", "Future City", "Technology", "9-12", "en"),
    ("Prinsessa", "Slott", "Äventyr", "3-5", "sv"),
    ("Pirat", "Skepp", "Skattjakt", "6-8", "sv"),
    ("Astronaut", "Rymden", "Upptäckt", "9-12", "sv"),
    ("Trollkarl", "Magiskola", "Lärande", "3-5", "sv"),
    ("Drake", "Berg", "Vänskap", "6-8", "sv"),
    ("Robot", "Framtidsstad", "Teknologi", "9-12", "sv"),
];

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS users (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                username        TEXT NOT NULL UNIQUE,
                email           TEXT NOT NULL UNIQUE,
                password_hash   TEXT NOT NULL,
                created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE TABLE IF NOT EXISTS stories (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                title       TEXT NOT NULL,
                content     TEXT NOT NULL,
                theme       TEXT NOT NULL,
                characters  TEXT NOT NULL DEFAULT '[]',
                setting     TEXT NOT NULL,
                age_group   TEXT NOT NULL,
                language    TEXT NOT NULL,
                user_id     INTEGER REFERENCES users(id),
                is_public   INTEGER NOT NULL DEFAULT 0,
                created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE INDEX IF NOT EXISTS idx_stories_user
                ON stories(user_id, created_at);

            CREATE TABLE IF NOT EXISTS story_prompts (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                character_type  TEXT NOT NULL,
                setting_type    TEXT NOT NULL,
                theme_type      TEXT NOT NULL,
                age_group       TEXT NOT NULL,
                language        TEXT NOT NULL,
                created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE TABLE IF NOT EXISTS saved_stories (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id     INTEGER NOT NULL REFERENCES users(id),
                story_id    INTEGER NOT NULL REFERENCES stories(id),
                created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                UNIQUE(user_id, story_id)
            );

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
        tx.commit()?;
    }

    seed_prompts(conn)?;

    info!("Database migrations complete");
    Ok(())
}

/// Fill the prompt catalog if it is empty. Existing entries are never touched.
fn seed_prompts(conn: &Connection) -> Result<()> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM story_prompts", [], |r| r.get(0))?;
    if count > 0 {
        return Ok(());
    }

    let mut stmt = conn.prepare(
        "INSERT INTO story_prompts (character_type, setting_type, theme_type, age_group, language)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for (character, setting, theme, age_group, language) in SEED_PROMPTS {
        stmt.execute((character, setting, theme, age_group, language))?;
    }

    info!("Seeded {} story prompts", SEED_PROMPTS.len());
    Ok(())
}
