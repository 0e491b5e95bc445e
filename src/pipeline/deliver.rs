use tracing::{error, warn};

use super::CANONICAL_FAILURE_MESSAGE;
use crate::bot::ThreadBot;
use crate::core::models::{PipelineOutcome, ThreadRef};
use crate::errors::BotError;

/// Posts `text` into the thread. Failures are logged and swallowed.
pub async fn notify(bot: &ThreadBot, thread: &ThreadRef, text: &str) {
    match bot
        .chat()
        .post_in_thread(&thread.channel_id, &thread.thread_ts, text)
        .await
    {
        Ok(()) => {}
        Err(BotError::MissingScope(needed)) => {
            warn!(
                channel_id = %thread.channel_id,
                "Missing scope: {}. Please add the required scope to your Slack App.",
                needed
            );
        }
        Err(e) => error!(channel_id = %thread.channel_id, "Error posting message: {}", e),
    }
}

pub async fn deliver_summary(bot: &ThreadBot, thread: &ThreadRef, outcome: &PipelineOutcome) {
    notify(bot, thread, &outcome.message()).await;
}

pub async fn notify_failure(bot: &ThreadBot, thread: &ThreadRef) {
    notify(bot, thread, CANONICAL_FAILURE_MESSAGE).await;
}
