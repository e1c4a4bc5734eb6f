//! Turns structured story parameters into the instructions sent to the
//! completion service.

use storyteller_types::api::StoryPrompt;

use crate::client::ChatMessage;

/// Instruction language. Anything that is not Swedish is phrased in English;
/// the supplied tag is still echoed back in the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Swedish,
}

impl Language {
    pub fn from_tag(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("sv") {
            Language::Swedish
        } else {
            Language::English
        }
    }
}

/// Language-complexity descriptor for an age group.
pub fn age_language(age_group: &str) -> &'static str {
    match age_group {
        "3-5" => "very simple language suitable for preschoolers",
        "6-8" => "simple language suitable for early elementary school children",
        "9-12" => "language suitable for upper elementary school children",
        _ => "simple language suitable for children",
    }
}

/// Minimum-length instruction for a story length; unknown lengths read as medium.
pub fn length_instruction(story_length: &str) -> &'static str {
    match story_length {
        "short" => "at least 1000 words",
        "long" => "at least 2500 words",
        _ => "at least 1500 words",
    }
}

pub fn title(prompt: &StoryPrompt) -> String {
    match Language::from_tag(&prompt.language) {
        Language::Swedish => format!("{}en i {}en", prompt.character_type, prompt.setting_type),
        Language::English => format!("The {} in the {}", prompt.character_type, prompt.setting_type),
    }
}

/// System instructions: the localized template, then the style line and the
/// custom text when present.
pub fn instructions(prompt: &StoryPrompt) -> String {
    let language = Language::from_tag(&prompt.language);
    let age = age_language(&prompt.age_group);
    let length = length_instruction(&prompt.story_length);

    let mut lines = match language {
        Language::Swedish => vec![
            "Du är en kreativ barnboksförfattare.".to_string(),
            format!("Skriv en LÅNG saga på svenska med {}.", age),
            format!("Sagan ska vara {} lång.", length),
            format!(
                "Sagan ska handla om en {} i en {} med temat {}.",
                prompt.character_type, prompt.setting_type, prompt.theme_type
            ),
            format!(
                "Sagan ska vara underhållande, lärorik och lämplig för barn i åldern {}.",
                prompt.age_group
            ),
            "Dela upp berättelsen i korta stycken.".to_string(),
        ],
        Language::English => vec![
            "You are a creative children's book author.".to_string(),
            format!("Write a LONG story in English with {}.", age),
            format!("The story should be {} long.", length),
            format!(
                "The story should be about a {} in a {} with the theme of {}.",
                prompt.character_type, prompt.setting_type, prompt.theme_type
            ),
            format!(
                "The story should be entertaining, educational, and appropriate for children aged {}.",
                prompt.age_group
            ),
            "Break the story into short paragraphs.".to_string(),
        ],
    };

    if let Some(style) = present(&prompt.style) {
        lines.push(match language {
            Language::Swedish => format!("Sagan ska vara i en {} stil.", style),
            Language::English => format!("The story should be in a {} style.", style),
        });
    }

    if let Some(custom) = present(&prompt.custom_prompt) {
        lines.push(custom.to_string());
    }

    lines.join("\n")
}

/// The short user-facing request that accompanies the instructions.
pub fn request_line(prompt: &StoryPrompt) -> String {
    format!(
        "Write a story about a {} in a {} with the theme of {}.",
        prompt.character_type, prompt.setting_type, prompt.theme_type
    )
}

/// System + user message pair for one completion.
pub fn messages(prompt: &StoryPrompt) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(instructions(prompt)),
        ChatMessage::user(request_line(prompt)),
    ]
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
