//! # Completion Module
//!
//! Talks to an OpenAI-compatible chat-completion endpoint and holds the two
//! prompts the chat flow relies on:
//!
//! - [`intent`] - classifies a chat message as a recommendation request, a
//!   top-tracks request, or neither.
//! - [`prompt`] - rewrites a request into a prompt demanding a strict JSON
//!   song list and parses the reply into a [`crate::types::PlaylistSpec`].
//!
//! Every call is a single user-role message with temperature 0, so the same
//! message classifies the same way.

pub mod intent;
pub mod prompt;

use reqwest::Client;

use crate::{
    config::Settings,
    error::{AppError, ensure_success},
    types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage},
};

const SERVICE: &str = "completion api";

#[derive(Debug, Clone)]
pub struct CompletionClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl CompletionClient {
    pub fn new(http: Client, settings: &Settings) -> Self {
        Self {
            http,
            base_url: settings.completion_url.clone(),
            api_key: settings.completion_api_key.clone(),
            model: settings.completion_model.clone(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends `prompt` as one user message and returns the reply text.
    pub async fn complete(&self, prompt: &str) -> Result<String, AppError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some(prompt.to_string()),
            }],
            temperature: 0.0,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(AppError::transport(SERVICE))?;

        let completion = ensure_success(SERVICE, response)
            .await?
            .json::<ChatCompletionResponse>()
            .await
            .map_err(AppError::transport(SERVICE))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(AppError::EmptyCompletion)
    }
}
