//! The thread-to-document pipeline

pub mod deliver;
pub mod resolve;
pub mod summarize;

use tracing::error;

use crate::bot::ThreadBot;
use crate::core::models::ThreadRef;

pub use summarize::summarize_thread;

/// Canonical failure message shown to users when summarization fails.
pub const CANONICAL_FAILURE_MESSAGE: &str =
    "Sorry, I couldn't generate a summary at this time. Please try again later.";

/// Runs the pipeline for a mention and replies in the thread.
pub async fn handle_mention(bot: &ThreadBot, thread: &ThreadRef) {
    match summarize_thread(bot, thread).await {
        Ok(outcome) => deliver::deliver_summary(bot, thread, &outcome).await,
        Err(e) => {
            error!(channel_id = %thread.channel_id, thread_ts = %thread.thread_ts, "Failed to generate summary: {}", e);
            deliver::notify_failure(bot, thread).await;
        }
    }
}
