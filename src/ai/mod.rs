//! All AI/LLM functionality

pub mod client;
pub mod prompt;

use async_trait::async_trait;

use crate::core::models::Prompt;
use crate::errors::BotError;

pub use client::BedrockClient;

/// A hosted model that turns a prompt into plain text.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> Result<String, BotError>;
}
