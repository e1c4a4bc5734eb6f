use storyteller_types::api::StoryPrompt;

use crate::prompt::Language;

/// The canned story used when the completion service cannot be reached or
/// returns something unusable. Five paragraphs followed by a closing line.
pub fn story(prompt: &StoryPrompt) -> String {
    let character = &prompt.character_type;
    let setting = &prompt.setting_type;
    let theme = &prompt.theme_type;

    let paragraphs = match Language::from_tag(&prompt.language) {
        Language::Swedish => [
            format!("Det var en gång en modig {} som bodde i en fantastisk {}.", character, setting),
            format!("Varje dag utforskade {}en nya platser och lärde sig nya saker.", character),
            format!("En dag upptäckte {}en något speciellt som handlade om {}.", character, theme),
            format!("Detta lärde {}en något viktigt om världen och sig själv.", character),
            format!("Alla i {}en blev glada och firade tillsammans.", setting),
            "Slut.".to_string(),
        ],
        Language::English => [
            format!(
                "Once upon a time, there was a brave {} who lived in an amazing {}.",
                character, setting
            ),
            format!("Every day, the {} would explore new places and learn new things.", character),
            format!("One day, the {} discovered something special about {}.", character, theme),
            format!(
                "This taught the {} something important about the world and themselves.",
                character
            ),
            format!("Everyone in the {} was happy and celebrated together.", setting),
            "The end.".to_string(),
        ],
    };

    paragraphs.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(language: &str) -> StoryPrompt {
        StoryPrompt {
            character_type: "Dragon".into(),
            setting_type: "Mountain".into(),
            theme_type: "Friendship".into(),
            age_group: "6-8".into(),
            language: language.into(),
            story_length: "medium".into(),
            custom_prompt: None,
            style: None,
            user_id: None,
        }
    }

    #[test]
    fn english_fallback_has_five_paragraphs_and_closing() {
        let text = story(&prompt("en"));
        let blocks: Vec<&str> = text.split("\n\n").collect();
        assert_eq!(blocks.len(), 6);
        assert_eq!(blocks[5], "The end.");
        assert!(blocks[0].starts_with("Once upon a time"));
        assert!(blocks[2].contains("Friendship"));
        assert!(blocks[4].contains("Mountain"));
    }

    #[test]
    fn swedish_fallback_is_localized() {
        let text = story(&prompt("sv"));
        assert!(text.starts_with("Det var en gång en modig Dragon"));
        assert!(text.ends_with("Slut."));
        assert!(text.contains("Friendship"));
    }

    #[test]
    fn unknown_language_uses_english() {
        assert_eq!(story(&prompt("fi")), story(&prompt("en")));
    }

    #[test]
    fn fallback_is_deterministic() {
        assert_eq!(story(&prompt("en")), story(&prompt("en")));
    }
}
