//! Chat-completion reply strategy (OpenRouter and other OpenAI-compatible APIs).

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::{CHAT_FAILURE_REPLY, EMPTY_REPLY, ReplyStrategy, build_prompt, provider_client};
use crate::config::ChatCompletionSettings;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Replies through a `/chat/completions` endpoint.
///
/// Does not derive Debug so the API key cannot leak through logs.
pub struct ChatCompletionReply {
    endpoint: String,
    api_key: SecretString,
    model: String,
    referer: String,
    title: String,
    http_client: reqwest::Client,
}

impl ChatCompletionReply {
    pub fn new(settings: &ChatCompletionSettings) -> Result<Self, reqwest::Error> {
        Ok(Self {
            endpoint: format!(
                "{}/chat/completions",
                settings.base_url.trim_end_matches('/')
            ),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            referer: settings.referer.clone(),
            title: settings.title.clone(),
            http_client: provider_client()?,
        })
    }

    async fn complete(&self, prompt: &str) -> Result<String, String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let err_text = response.text().await.unwrap_or_default();
            return Err(format!("{} {}", status.as_u16(), err_text));
        }

        let data: ChatResponse = response
            .json()
            .await
            .map_err(|e| format!("unreadable response: {}", e))?;

        Ok(first_choice_text(data))
    }
}

/// Trimmed content of the first choice, or the empty-reply sentinel.
fn first_choice_text(data: ChatResponse) -> String {
    data.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .unwrap_or_else(|| EMPTY_REPLY.to_string())
}

#[async_trait]
impl ReplyStrategy for ChatCompletionReply {
    fn name(&self) -> &'static str {
        "chat"
    }

    async fn reply(&self, description: &str, message: &str) -> String {
        let prompt = build_prompt(description, message);
        debug!(model = %self.model, "Requesting chat completion");

        match self.complete(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Chat completion API error: {}", e);
                CHAT_FAILURE_REPLY.to_string()
            }
        }
    }
}
