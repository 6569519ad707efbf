use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, error, info, warn};

use super::{AiError, ChatMessage, LanguageModel};
use crate::models::config::OpenAi;

/// Client for an OpenAI-compatible REST API.
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    chat_model: String,
    vision_model: String,
    embedding_model: String,
    embedding_dimensions: usize,
}

/// HTTPS is required for remote hosts; plain HTTP only for localhost.
pub fn validate_base_url(base_url: &str) -> Result<(), String> {
    let parsed = reqwest::Url::parse(base_url)
        .map_err(|e| format!("Invalid base_url '{}': {}", base_url, e))?;
    let host = parsed.host_str().unwrap_or("");

    match parsed.scheme() {
        "https" => Ok(()),
        "http" => {
            let is_localhost =
                host == "localhost" || host == "127.0.0.1" || host == "[::1]" || host == "::1";
            if is_localhost {
                warn!(base_url, "using unencrypted HTTP for local LLM server");
                Ok(())
            } else {
                Err(format!(
                    "HTTP is not allowed for remote URLs (base_url: '{}'); use HTTPS",
                    base_url
                ))
            }
        }
        scheme => Err(format!(
            "Unsupported URL scheme '{}' in base_url '{}'",
            scheme, base_url
        )),
    }
}

impl OpenAiClient {
    pub fn new(config: &OpenAi) -> anyhow::Result<Self> {
        validate_base_url(&config.base_url).map_err(anyhow::Error::msg)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            chat_model: config.chat_model.clone(),
            vision_model: config.vision_model.clone(),
            embedding_model: config.embedding_model.clone(),
            embedding_dimensions: config.embedding_dimensions,
        })
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, AiError> {
        let api_key = self.api_key.as_deref().ok_or(AiError::NotConfigured)?;
        let url = format!("{}{}", self.base_url, path);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, "HTTP request failed: {}", e);
                AiError::Network(e.to_string())
            })?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| AiError::Network(e.to_string()))?;

        if !status.is_success() {
            error!(status = %status, url = %url, "LLM API error");
            return Err(AiError::Status {
                status: status.as_u16(),
                message: api_error_message(&text),
            });
        }

        debug!(url = %url, bytes = text.len(), "LLM API response");
        serde_json::from_str(&text).map_err(|e| AiError::Decode(e.to_string()))
    }
}

/// Pull `error.message` out of an OpenAI error body, else a short prefix.
fn api_error_message(body: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(body)
        && let Some(msg) = v["error"]["message"].as_str()
    {
        return msg.to_string();
    }
    body.chars().take(300).collect()
}

fn first_choice_text(data: &Value) -> Result<String, AiError> {
    data["choices"]
        .get(0)
        .and_then(|c| c["message"]["content"].as_str())
        .map(|s| s.trim().to_string())
        .ok_or_else(|| AiError::Decode("no choices in response".to_string()))
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, AiError> {
        info!(model = %self.chat_model, messages = messages.len(), "calling chat completion");
        let body = json!({
            "model": self.chat_model,
            "messages": messages,
            "temperature": 0.7,
        });
        let data = self.post("/chat/completions", &body).await?;
        first_choice_text(&data)
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, AiError> {
        let input = text.trim();
        if input.is_empty() {
            return Err(AiError::Decode("cannot embed empty text".to_string()));
        }
        info!(model = %self.embedding_model, "calling embeddings");
        let body = json!({
            "model": self.embedding_model,
            "input": input,
            "dimensions": self.embedding_dimensions,
        });
        let data = self.post("/embeddings", &body).await?;
        let vector: Vec<f32> = data["data"]
            .get(0)
            .and_then(|d| d["embedding"].as_array())
            .ok_or_else(|| AiError::Decode("no embedding in response".to_string()))?
            .iter()
            .filter_map(|v| v.as_f64().map(|f| f as f32))
            .collect();
        if vector.len() != self.embedding_dimensions {
            return Err(AiError::Decode(format!(
                "embedding has {} dimensions, expected {}",
                vector.len(),
                self.embedding_dimensions
            )));
        }
        Ok(vector)
    }

    async fn vision(&self, prompt: &str, image_url: &str) -> Result<String, AiError> {
        info!(model = %self.vision_model, "calling vision completion");
        let body = json!({
            "model": self.vision_model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt },
                    { "type": "image_url", "image_url": { "url": image_url } }
                ]
            }],
            "max_tokens": 800,
        });
        let data = self.post("/chat/completions", &body).await?;
        first_choice_text(&data)
    }
}
