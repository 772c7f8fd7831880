//! OpenAI-compatible HTTP implementation of [`TextRewriteService`].

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::ai::RewriteError;

use super::model::RewriteRequest;
use super::prompt::build_user_message;
use super::service::TextRewriteService;

/// Default API root for the hosted `OpenAI` service.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default chat model.
pub const DEFAULT_MODEL: &str = "chatgpt-4o-latest";

const MAX_OUTPUT_TOKENS: u32 = 1000;
const TEMPERATURE: f32 = 0.7;
const ERROR_BODY_PREVIEW_CHARS: usize = 160;

/// Configuration for [`OpenAiTextRewriteService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiTextRewriteConfig {
    /// Base API URL (e.g., `https://api.openai.com/v1`).
    pub base_url: String,
    /// Model identifier sent in chat-completions requests.
    pub model: String,
    /// API key used for bearer authentication.
    pub api_key: Option<String>,
    /// HTTP timeout; `None` keeps the client's own default.
    pub timeout: Option<Duration>,
    /// Additional request headers (primarily useful for deterministic tests).
    #[cfg(any(test, feature = "test-support"))]
    pub additional_headers: Vec<(String, String)>,
}

impl Default for OpenAiTextRewriteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            api_key: None,
            timeout: None,
            #[cfg(any(test, feature = "test-support"))]
            additional_headers: Vec::new(),
        }
    }
}

impl OpenAiTextRewriteConfig {
    /// Constructs configuration with required API settings.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key,
            timeout,
            #[cfg(any(test, feature = "test-support"))]
            additional_headers: Vec::new(),
        }
    }

    /// Adds one extra HTTP header.
    #[cfg(any(test, feature = "test-support"))]
    #[must_use]
    pub fn with_additional_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.additional_headers.push((name.into(), value.into()));
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// OpenAI-compatible rewrite service holding one reusable HTTP client.
#[derive(Debug, Clone)]
pub struct OpenAiTextRewriteService {
    config: OpenAiTextRewriteConfig,
    client: Client,
}

impl OpenAiTextRewriteService {
    /// Creates a service from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Configuration`] when the HTTP client cannot be
    /// built.
    pub fn new(config: OpenAiTextRewriteConfig) -> Result<Self, RewriteError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|error| RewriteError::Configuration {
                message: format!("failed to configure AI HTTP client: {error}"),
            })?;

        Ok(Self { config, client })
    }

    fn extract_api_key(&self) -> Result<&str, RewriteError> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(RewriteError::MissingApiKey)
    }
}

impl TextRewriteService for OpenAiTextRewriteService {
    fn rewrite_text(&self, request: &RewriteRequest<'_>) -> Result<String, RewriteError> {
        let api_key = self.extract_api_key()?;
        let payload = ChatCompletionsRequest {
            model: self.config.model.as_str(),
            messages: vec![
                ChatCompletionsMessage {
                    role: "system",
                    content: request.instructions().to_owned(),
                },
                ChatCompletionsMessage {
                    role: "user",
                    content: build_user_message(request.source_text()),
                },
            ],
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        };

        #[cfg(any(test, feature = "test-support"))]
        let mut request_builder = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(api_key)
            .json(&payload);
        #[cfg(not(any(test, feature = "test-support")))]
        let request_builder = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(api_key)
            .json(&payload);
        #[cfg(any(test, feature = "test-support"))]
        for (name, value) in &self.config.additional_headers {
            request_builder = request_builder.header(name, value);
        }

        let response = request_builder
            .send()
            .map_err(|error| RewriteError::Network {
                message: format!("AI request transport failed: {error}"),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().map_or_else(
                |_| "(failed to read error response body)".to_owned(),
                |content| truncate_for_message(content.as_str(), ERROR_BODY_PREVIEW_CHARS),
            );
            return Err(map_status_error(status, &body));
        }

        let response_payload: ChatCompletionsResponse =
            response.json().map_err(|error| RewriteError::Api {
                message: format!("AI response JSON decoding failed: {error}"),
            })?;

        response_payload
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_ref())
            .and_then(parse_content_value)
            .map(|content| content.trim().to_owned())
            .ok_or_else(|| RewriteError::Api {
                message: "AI response did not contain assistant text".to_owned(),
            })
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionsRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionsMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatCompletionsMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChatContent {
    Text(String),
    Parts(Vec<ChatContentPart>),
}

#[derive(Debug, Deserialize)]
struct ChatContentPart {
    text: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<ChatContent>,
}

fn map_status_error(status: StatusCode, body: &str) -> RewriteError {
    let message = format!("status {}: {body}", status.as_u16());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            RewriteError::Authentication { message }
        }
        StatusCode::TOO_MANY_REQUESTS => RewriteError::RateLimited { message },
        _ => RewriteError::Api {
            message: format!("AI request failed with {message}"),
        },
    }
}

fn parse_content_value(content: &ChatContent) -> Option<&str> {
    match content {
        ChatContent::Text(text) => Some(text.as_str()),
        ChatContent::Parts(parts) => parts
            .iter()
            .find_map(|part| part.text.as_deref().or(part.content.as_deref())),
    }
}

fn truncate_for_message(message: &str, max_chars: usize) -> String {
    let mut output = String::new();
    let mut chars = message.chars();

    for _ in 0..max_chars {
        let Some(character) = chars.next() else {
            return output;
        };
        output.push(character);
    }

    if chars.next().is_some() {
        output.push_str("...");
    }

    output
}

#[cfg(test)]
#[path = "openai_tests.rs"]
mod tests;
