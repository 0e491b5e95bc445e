//! Confluence publishing

pub mod client;
pub mod storage;

use async_trait::async_trait;

use crate::core::models::PublishedDocument;
use crate::errors::BotError;

pub use client::ConfluenceClient;

/// Creates documentation pages for summaries.
#[async_trait]
pub trait DocumentPublisher: Send + Sync {
    /// Creates a new top-level page and returns it with its short link.
    async fn publish(&self, title: &str, body: &str) -> Result<PublishedDocument, BotError>;
}
