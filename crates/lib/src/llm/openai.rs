//! OpenAI chat-completions client (https://api.openai.com/v1 by default).
//!
//! One non-streaming call per request; the base URL is configurable for proxies and tests.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Upper bound on one completion call. A hung upstream must not stall the skill response.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the OpenAI chat-completions API.
#[derive(Clone)]
pub struct OpenAiClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, thiserror::Error)]
pub enum OpenAiError {
    #[error("openai request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("openai api error: {0}")]
    Api(String),
    #[error("openai api key not configured")]
    MissingKey,
    #[error("openai returned no completion")]
    EmptyCompletion,
}

/// One chat message (system/user/assistant).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl OpenAiClient {
    pub fn new(api_key: Option<String>, base_url: Option<String>) -> Self {
        let base_url = base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            base_url,
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// POST /chat/completions — non-streaming completion. Returns the first choice's content.
    pub async fn chat(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, OpenAiError> {
        let key = self.api_key.as_deref().ok_or(OpenAiError::MissingKey)?;
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: model.to_string(),
            messages,
            max_tokens,
            temperature,
        };
        let res = self
            .client
            .post(&url)
            .bearer_auth(key)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(OpenAiError::Api(format!("{} {}", status, body)));
        }
        let data: ChatCompletionResponse = res.json().await?;
        data.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(OpenAiError::EmptyCompletion)
    }
}
