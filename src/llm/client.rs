use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Settings, DEFAULT_MODEL};
use crate::error::LlmError;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Named generation settings used by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelProfile {
    /// Low temperature, used to decompose the query
    Planning,
    /// Higher temperature, used to write the report
    Writing,
}

impl ModelProfile {
    pub fn temperature(self) -> f64 {
        match self {
            ModelProfile::Planning => 0.1,
            ModelProfile::Writing => 0.4,
        }
    }
}

/// A single system + user exchange with the language model
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system: String,
    pub user: String,
    pub profile: ModelProfile,
}

impl GenerationRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>, profile: ModelProfile) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            profile,
        }
    }
}

/// Language-generation service: one synchronous request, one text reply
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError>;
}

/// Configuration for the OpenAI chat client
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    /// Model used for both profiles (e.g., "gpt-4o-mini")
    pub model: String,
    /// Maximum tokens in response
    pub max_tokens: u32,
    pub endpoint: String,
}

impl OpenAiConfig {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            max_tokens: 4096,
            endpoint: CHAT_COMPLETIONS_URL.to_string(),
        }
    }

    /// Create config from startup settings
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.require_openai_key()?.to_string();
        let model = if settings.model.is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            settings.model.clone()
        };
        Ok(Self::new(api_key, model))
    }
}

/// OpenAI chat-completions client
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: request.profile.temperature(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.user.clone(),
                },
            ],
        };

        debug!(
            model = %self.config.model,
            profile = ?request.profile,
            prompt_chars = request.user.len(),
            "sending chat completion request"
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::Response(format!("HTTP {}: {}", status, text)));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Serialization(e.to_string()))?;

        // Extract text from the first choice
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::Response("No text content in response".to_string()))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    max_tokens: u32,
    temperature: f64,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planning_is_cooler_than_writing() {
        assert!(ModelProfile::Planning.temperature() < ModelProfile::Writing.temperature());
    }

    #[test]
    fn test_config_requires_api_key() {
        let settings = Settings::from_lookup(|_| None);
        assert!(OpenAiConfig::from_settings(&settings).is_err());
    }

    #[test]
    fn test_config_from_settings() {
        let settings = Settings::from_lookup(|key| match key {
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            _ => None,
        });
        let config = OpenAiConfig::from_settings(&settings).unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.endpoint, CHAT_COMPLETIONS_URL);
    }

    #[test]
    fn test_parse_chat_response() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": "hello"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("hello"));
    }
}
