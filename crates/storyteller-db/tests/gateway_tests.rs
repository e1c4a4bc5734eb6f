use storyteller_db::{Database, DbError};
use storyteller_types::models::GeneratedStory;
use tempfile::TempDir;

/// Helper: open a fresh database in a temp directory. The directory must
/// outlive the database handle.
fn open_db() -> (TempDir, Database) {
    let dir = TempDir::new().unwrap();
    let db = Database::open(&dir.path().join("stories.db")).unwrap();
    (dir, db)
}

fn generated(character: &str, setting: &str) -> GeneratedStory {
    GeneratedStory {
        title: format!("The {} in the {}", character, setting),
        content: format!("Once upon a time, there was a {}.", character),
        characters: vec![character.to_string()],
        setting: setting.to_string(),
        theme: "Friendship".to_string(),
        age_group: "6-8".to_string(),
        language: "en".to_string(),
        story_length: "medium".to_string(),
        style: None,
        is_fallback: false,
    }
}

// ============================================================
// Prompt catalog
// ============================================================

#[test]
fn lists_whole_catalog_without_filters() {
    let (_dir, db) = open_db();
    let prompts = db.list_prompts(None, None).unwrap();
    assert_eq!(prompts.len(), 12);
}

#[test]
fn filters_catalog_by_language_and_age_group() {
    let (_dir, db) = open_db();

    let swedish = db.list_prompts(Some("sv"), None).unwrap();
    assert_eq!(swedish.len(), 6);
    assert!(swedish.iter().all(|p| p.language == "sv"));

    let both = db.list_prompts(Some("en"), Some("6-8")).unwrap();
    let characters: Vec<&str> = both.iter().map(|p| p.character_type.as_str()).collect();
    assert_eq!(characters, vec!["Pirate", "Dragon"]);

    let none = db.list_prompts(Some("de"), None).unwrap();
    assert!(none.is_empty());
}

#[test]
fn reopening_does_not_reseed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stories.db");
    Database::open(&path).unwrap();
    let db = Database::open(&path).unwrap();
    assert_eq!(db.list_prompts(None, None).unwrap().len(), 12);
}

// ============================================================
// Users
// ============================================================

#[test]
fn duplicate_email_and_username_conflict() {
    let (_dir, db) = open_db();
    let user = db.create_user("astrid", "astrid@example.se", "aa:bb").unwrap();
    assert_eq!(user.username, "astrid");

    match db.create_user("other", "astrid@example.se", "aa:bb") {
        Err(DbError::Conflict(msg)) => assert_eq!(msg, "Email already registered"),
        other => panic!("expected email conflict, got {:?}", other),
    }

    match db.create_user("astrid", "other@example.se", "aa:bb") {
        Err(DbError::Conflict(msg)) => assert_eq!(msg, "Username already taken"),
        other => panic!("expected username conflict, got {:?}", other),
    }
}

#[test]
fn user_lookup_by_email_returns_hash() {
    let (_dir, db) = open_db();
    db.create_user("pippi", "pippi@example.se", "salt:digest").unwrap();

    let row = db.get_user_by_email("pippi@example.se").unwrap().unwrap();
    assert_eq!(row.username, "pippi");
    assert_eq!(row.password_hash, "salt:digest");

    assert!(db.get_user_by_email("nobody@example.se").unwrap().is_none());
}

// ============================================================
// Stories
// ============================================================

#[test]
fn anonymous_story_is_public() {
    let (_dir, db) = open_db();
    let story = db.create_story(&generated("Dragon", "Mountain"), None).unwrap();
    assert!(story.is_public);
    assert_eq!(story.user_id, None);
}

#[test]
fn owned_story_is_private() {
    let (_dir, db) = open_db();
    let user = db.create_user("emil", "emil@example.se", "aa:bb").unwrap();
    let story = db.create_story(&generated("Robot", "Future City"), Some(user.id)).unwrap();
    assert!(!story.is_public);
    assert_eq!(story.user_id, Some(user.id));
}

#[test]
fn unknown_owner_is_dropped_to_anonymous() {
    let (_dir, db) = open_db();
    let story = db.create_story(&generated("Pirate", "Ship"), Some(999)).unwrap();
    assert_eq!(story.user_id, None);
    assert!(story.is_public);
}

#[test]
fn stored_story_round_trips() {
    let (_dir, db) = open_db();
    let created = db.create_story(&generated("Wizard", "Magic School"), None).unwrap();
    let fetched = db.get_story(created.id).unwrap();
    assert_eq!(created, fetched);
}

#[test]
fn missing_story_is_not_found() {
    let (_dir, db) = open_db();
    assert!(matches!(db.get_story(42), Err(DbError::NotFound(_))));
}

#[test]
fn lists_newest_first_and_filters_conjunctively() {
    let (_dir, db) = open_db();
    let user = db.create_user("madicken", "madicken@example.se", "aa:bb").unwrap();

    let first = db.create_story(&generated("Princess", "Castle"), None).unwrap();
    let second = db.create_story(&generated("Pirate", "Ship"), Some(user.id)).unwrap();
    let third = db.create_story(&generated("Astronaut", "Space"), Some(user.id)).unwrap();

    let all: Vec<i64> = db.list_stories(None, None).unwrap().iter().map(|s| s.id).collect();
    assert_eq!(all, vec![third.id, second.id, first.id]);

    let public: Vec<i64> = db.list_stories(None, Some(true)).unwrap().iter().map(|s| s.id).collect();
    assert_eq!(public, vec![first.id]);

    let mine: Vec<i64> = db
        .list_stories(Some(user.id), None)
        .unwrap()
        .iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(mine, vec![third.id, second.id]);

    assert!(db.list_stories(Some(user.id), Some(true)).unwrap().is_empty());
    assert_eq!(db.list_stories(Some(user.id), Some(false)).unwrap().len(), 2);
}

// ============================================================
// Saved stories
// ============================================================

#[test]
fn saving_twice_conflicts() {
    let (_dir, db) = open_db();
    let user = db.create_user("lotta", "lotta@example.se", "aa:bb").unwrap();
    let story = db.create_story(&generated("Drake", "Berg"), None).unwrap();

    let saved = db.save_story(user.id, story.id).unwrap();
    assert_eq!(saved.user_id, user.id);
    assert_eq!(saved.story_id, story.id);
    assert_eq!(saved.story, story);

    match db.save_story(user.id, story.id) {
        Err(DbError::Conflict(msg)) => assert_eq!(msg, "Story already saved by this user"),
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[test]
fn saving_missing_story_is_not_found() {
    let (_dir, db) = open_db();
    let user = db.create_user("lotta", "lotta@example.se", "aa:bb").unwrap();
    assert!(matches!(db.save_story(user.id, 77), Err(DbError::NotFound(_))));
}

#[test]
fn saving_for_missing_user_is_not_found() {
    let (_dir, db) = open_db();
    let story = db.create_story(&generated("Drake", "Berg"), None).unwrap();
    assert!(matches!(db.save_story(5, story.id), Err(DbError::NotFound(_))));
}

#[test]
fn same_story_saved_by_two_users() {
    let (_dir, db) = open_db();
    let a = db.create_user("anna", "anna@example.se", "aa:bb").unwrap();
    let b = db.create_user("bosse", "bosse@example.se", "aa:bb").unwrap();
    let story = db.create_story(&generated("Pirat", "Skepp"), None).unwrap();

    db.save_story(a.id, story.id).unwrap();
    db.save_story(b.id, story.id).unwrap();
}

// ============================================================
// Unit of work
// ============================================================

#[test]
fn failed_unit_of_work_rolls_back() {
    let (_dir, db) = open_db();

    let result: Result<(), DbError> = db.transaction(|tx| {
        tx.execute(
            "INSERT INTO users (username, email, password_hash) VALUES ('ghost', 'ghost@example.se', 'x:y')",
            [],
        )?;
        Err(DbError::Conflict("abort".into()))
    });
    assert!(result.is_err());

    assert!(db.get_user_by_email("ghost@example.se").unwrap().is_none());
}

#[test]
fn panicking_unit_of_work_rolls_back() {
    let (_dir, db) = open_db();

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _: Result<(), DbError> = db.transaction(|tx| {
            tx.execute(
                "INSERT INTO users (username, email, password_hash) VALUES ('ghost', 'ghost@example.se', 'x:y')",
                [],
            )?;
            panic!("boom");
        });
    }));
    assert!(outcome.is_err());

    assert!(db.get_user_by_email("ghost@example.se").unwrap().is_none());
    // The database stays usable afterwards
    db.create_user("ghost", "ghost@example.se", "x:y").unwrap();
}

#[test]
fn concurrent_writers_all_succeed() {
    use std::sync::{Arc, Barrier};
    use std::thread;

    const ROUNDS: usize = 10;
    const WRITERS: usize = 8;

    let (_dir, db) = open_db();
    let owner = db.create_user("owner", "owner@example.se", "x:y").unwrap();

    for round in 0..ROUNDS {
        let barrier = Arc::new(Barrier::new(WRITERS));
        let handles: Vec<_> = (0..WRITERS)
            .map(|i| {
                let db = db.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    if i % 2 == 0 {
                        db.create_story(&generated("Dragon", "Mountain"), Some(owner.id))
                            .map(|_| ())
                    } else {
                        let name = format!("writer-{}-{}", round, i);
                        db.create_user(&name, &format!("{}@example.se", name), "x:y")
                            .map(|_| ())
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap().unwrap();
        }
    }

    let owned = db.list_stories(Some(owner.id), None).unwrap();
    assert_eq!(owned.len(), ROUNDS * WRITERS / 2);
}
