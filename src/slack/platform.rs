//! The chat-platform seam the pipeline talks to.

use async_trait::async_trait;

use crate::core::models::{Message, ThreadRef};
use crate::errors::BotError;

/// Metadata returned by `files.info`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInfo {
    pub id: String,
    pub mimetype: Option<String>,
    pub download_url: Option<String>,
    pub permalink_public: Option<String>,
    pub public_url_shared: bool,
}

#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Messages of the thread anchored at `thread.thread_ts`, anchor first.
    async fn fetch_thread(&self, thread: &ThreadRef) -> Result<Vec<Message>, BotError>;

    async fn file_info(&self, file_id: &str) -> Result<FileInfo, BotError>;

    /// Enables public sharing for the file and returns its `permalink_public`.
    ///
    /// `Ok(None)` means Slack reported the file as already public.
    async fn share_public_url(&self, file_id: &str) -> Result<Option<String>, BotError>;

    /// Downloads a publicly reachable file, failing once more than `max_bytes` arrive.
    async fn download_file(&self, url: &str, max_bytes: usize) -> Result<Vec<u8>, BotError>;

    async fn post_in_thread(
        &self,
        channel_id: &str,
        thread_ts: &str,
        text: &str,
    ) -> Result<(), BotError>;
}
