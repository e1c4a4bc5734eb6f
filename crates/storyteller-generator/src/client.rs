use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Sampling temperature for story completions.
const TEMPERATURE: f32 = 0.7;

/// Errors from a single completion round trip.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("completion API key is not set")]
    MissingCredentials,

    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("completion API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected completion response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A text-generation service that answers a role-tagged message list with
/// a single completion.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String, GenerationError>;
}

/// Connection settings for an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub model: String,
    /// e.g. `https://api.openai.com/v1`
    pub base_url: String,
    pub timeout: Duration,
}

pub struct OpenAiClient {
    http: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key().is_some()
    }

    fn api_key(&self) -> Option<&str> {
        self.config.api_key.as_deref().filter(|k| !k.is_empty())
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
    n: u32,
    stream: bool,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String, GenerationError> {
        let api_key = self.api_key().ok_or(GenerationError::MissingCredentials)?;

        let body = CompletionRequest {
            model: &self.config.model,
            messages,
            max_tokens,
            temperature: TEMPERATURE,
            n: 1,
            stream: false,
        };
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        debug!("Completion API responded with {}", status);

        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        parse_completion(&text)
    }
}

/// Extract the trimmed text of the first choice.
pub fn parse_completion(body: &str) -> Result<String, GenerationError> {
    let response: CompletionResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::MalformedResponse("'choices' is empty".into()))?;

    let content = choice
        .message
        .and_then(|m| m.content)
        .ok_or_else(|| GenerationError::MalformedResponse("'message.content' not found".into()))?;

    let content = content.trim();
    if content.is_empty() {
        return Err(GenerationError::MalformedResponse("empty completion".into()));
    }

    Ok(content.to_string())
}

/// `error.message` from an API error body, if there is one.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_owned))
        .unwrap_or_else(|| "Unknown error".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_choice() {
        let body = r#"{
            "model": "gpt-3.5-turbo",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "  Once there was a fox.\n"}},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ]
        }"#;
        assert_eq!(parse_completion(body).unwrap(), "Once there was a fox.");
    }

    #[test]
    fn missing_choices_is_malformed() {
        assert!(matches!(
            parse_completion(r#"{"id": "x"}"#),
            Err(GenerationError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_completion(r#"{"choices": []}"#),
            Err(GenerationError::MalformedResponse(_))
        ));
    }

    #[test]
    fn missing_content_is_malformed() {
        assert!(matches!(
            parse_completion(r#"{"choices": [{"message": {"role": "assistant"}}]}"#),
            Err(GenerationError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_completion(r#"{"choices": [{"finish_reason": "length"}]}"#),
            Err(GenerationError::MalformedResponse(_))
        ));
    }

    #[test]
    fn non_json_is_malformed() {
        assert!(matches!(
            parse_completion("<html>bad gateway</html>"),
            Err(GenerationError::MalformedResponse(_))
        ));
    }

    #[test]
    fn error_message_from_api_body() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        assert_eq!(error_message(body), "Incorrect API key provided");
        assert_eq!(error_message("oops"), "Unknown error");
    }

    #[test]
    fn request_body_shape() {
        let messages = vec![ChatMessage::system("be nice"), ChatMessage::user("a story")];
        let body = CompletionRequest {
            model: "gpt-3.5-turbo",
            messages: &messages,
            max_tokens: 4000,
            temperature: TEMPERATURE,
            n: 1,
            stream: false,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["max_tokens"], 4000);
        assert_eq!(value["n"], 1);
        assert_eq!(value["stream"], false);
    }
}
