//! Text-completion port used by extraction and categorization.
//!
//! The pipeline only needs `prompt -> reply`. Transport, model choice and
//! credentials belong to the implementation (the CLI ships an
//! OpenAI-compatible HTTP client).

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Request(String),

    #[error("completion API error: {status} {body}")]
    Api { status: u16, body: String },

    #[error("completion timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),

    #[error("malformed completion response: {0}")]
    Malformed(String),
}

/// A text-completion collaborator (LLM behind some API).
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one prompt, return the model's reply text.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

#[async_trait]
impl<T: CompletionClient + ?Sized> CompletionClient for Arc<T> {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        (**self).complete(prompt).await
    }
}

/// `client.complete(prompt)` bounded by `limit`.
pub async fn complete_within<C: CompletionClient + ?Sized>(
    client: &C,
    prompt: &str,
    limit: Duration,
) -> Result<String, CompletionError> {
    match tokio::time::timeout(limit, client.complete(prompt)).await {
        Ok(reply) => reply,
        Err(_) => Err(CompletionError::Timeout(limit)),
    }
}
