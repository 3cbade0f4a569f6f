//! Text-generation reply strategy for hosted inference endpoints.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::{EMPTY_REPLY, INFERENCE_FAILURE_REPLY, ReplyStrategy, build_prompt, provider_client};
use crate::config::TextGenerationSettings;

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Deserialize)]
struct Generation {
    generated_text: Option<String>,
}

/// Shapes an inference endpoint may answer with.
///
/// `Batch` goes first: untagged struct variants also accept sequences.
#[derive(Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Batch(Vec<Generation>),
    Failed { error: serde_json::Value },
    Single(Generation),
}

/// Replies through a text-generation inference endpoint.
pub struct TextGenerationReply {
    endpoint: String,
    token: SecretString,
    http_client: reqwest::Client,
}

impl TextGenerationReply {
    pub fn new(settings: &TextGenerationSettings) -> Result<Self, reqwest::Error> {
        Ok(Self {
            endpoint: settings.endpoint(),
            token: settings.token.clone(),
            http_client: provider_client()?,
        })
    }

    async fn generate(&self, prompt: &str) -> Result<InferenceResponse, String> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(self.token.expose_secret())
            .json(&InferenceRequest { inputs: prompt })
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("unreadable response: {}", e))?;

        serde_json::from_str(&body).map_err(|_| format!("{} {}", status.as_u16(), body))
    }
}

/// Generated text with the echoed prompt removed, or a sentinel.
fn extract_reply(response: InferenceResponse, prompt: &str) -> String {
    let generated = match response {
        InferenceResponse::Failed { error: err } => {
            error!("Inference API error: {}", err);
            return INFERENCE_FAILURE_REPLY.to_string();
        }
        InferenceResponse::Batch(batch) => batch.into_iter().next().and_then(|g| g.generated_text),
        InferenceResponse::Single(single) => single.generated_text,
    };

    generated
        .map(|text| {
            text.strip_prefix(prompt)
                .unwrap_or(&text)
                .trim()
                .to_string()
        })
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| EMPTY_REPLY.to_string())
}

#[async_trait]
impl ReplyStrategy for TextGenerationReply {
    fn name(&self) -> &'static str {
        "inference"
    }

    async fn reply(&self, description: &str, message: &str) -> String {
        let prompt = build_prompt(description, message);
        debug!(endpoint = %self.endpoint, "Requesting text generation");

        match self.generate(&prompt).await {
            Ok(response) => extract_reply(response, &prompt),
            Err(e) => {
                error!("Inference API error: {}", e);
                INFERENCE_FAILURE_REPLY.to_string()
            }
        }
    }
}
