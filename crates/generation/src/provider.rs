use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    RequestFailed(String),

    #[error("generation service returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("generation service returned an unexpected answer: {0}")]
    InvalidOutput(String),

    #[error("generation provider not configured: {0}")]
    NotConfigured(String),
}

/// One structured completion request.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Stable name of the flow, used for logging and by the fake provider.
    pub name: &'static str,
    pub system: String,
    pub user: String,
    pub temperature: Option<f32>,
    /// The structured input the prompt was rendered from.
    pub input: serde_json::Value,
}

/// A hosted model able to answer with JSON text and to draw images.
///
/// Implementations must be stateless from the caller's point of view and safe
/// to share across tasks.
#[async_trait]
pub trait LlmProvider: Send + Sync + fmt::Debug {
    /// Returns the raw text of a JSON answer.
    async fn complete(&self, prompt: &Prompt) -> Result<String, GenerationError>;

    /// Returns an image reference (URL or data URI), or `None` when the model
    /// produced no image.
    async fn image(&self, prompt: &str) -> Result<Option<String>, GenerationError>;

    fn provider_name(&self) -> &'static str;

    fn model_name(&self) -> &str;
}
