//! LLM access: the [`LanguageModel`] seam, its OpenAI-compatible
//! implementation, prompt builders and the coaching service on top.

pub mod openai;
pub mod prompts;
pub mod service;

use async_trait::async_trait;
use serde::Serialize;

pub use openai::OpenAiClient;
pub use service::{CoachService, ServiceError};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("no API key configured for the language model")]
    NotConfigured,
    #[error("language model request failed: {0}")]
    Network(String),
    #[error("language model returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected language model response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Chat completion; returns the assistant text.
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, AiError>;

    /// Text embedding of fixed dimensionality.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AiError>;

    /// Vision completion over one image given as a data URL.
    async fn vision(&self, prompt: &str, image_url: &str) -> Result<String, AiError>;
}
