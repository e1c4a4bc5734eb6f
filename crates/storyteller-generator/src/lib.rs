//! Story generation.
//!
//! Builds instructions from a [`StoryPrompt`], asks a [`CompletionClient`] for
//! one completion and, if that fails for any reason, falls back to a fixed
//! templated story. Generation itself never fails.

pub mod client;
pub mod fallback;
pub mod prompt;

use std::sync::Arc;

use storyteller_types::api::StoryPrompt;
use storyteller_types::models::GeneratedStory;
use tracing::{info, warn};

pub use client::{ChatMessage, CompletionClient, GenerationError, OpenAiClient, OpenAiConfig, Role};

/// Upper bound on completion size requested from the service.
pub const MAX_STORY_TOKENS: u32 = 4000;

#[derive(Clone)]
pub struct StoryGenerator {
    client: Arc<dyn CompletionClient>,
}

impl StoryGenerator {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Generate a story. Makes exactly one completion call and never retries.
    pub async fn generate(&self, prompt: &StoryPrompt) -> GeneratedStory {
        info!(
            "Starting story generation for {} in {}",
            prompt.character_type, prompt.setting_type
        );

        let messages = prompt::messages(prompt);
        match self.client.complete(&messages, MAX_STORY_TOKENS).await {
            Ok(content) => {
                info!("Story generated, {} characters", content.len());
                assemble(prompt, content, false)
            }
            Err(e) => {
                warn!("Story generation failed, using fallback story: {}", e);
                assemble(prompt, fallback::story(prompt), true)
            }
        }
    }
}

fn assemble(prompt: &StoryPrompt, content: String, is_fallback: bool) -> GeneratedStory {
    GeneratedStory {
        title: prompt::title(prompt),
        content,
        characters: vec![prompt.character_type.clone()],
        setting: prompt.setting_type.clone(),
        theme: prompt.theme_type.clone(),
        age_group: prompt.age_group.clone(),
        language: prompt.language.clone(),
        story_length: prompt.story_length.clone(),
        style: prompt.style.clone(),
        is_fallback,
    }
}
