use tracing::{error, info, warn};

use super::resolve::resolve_images;
use crate::ai::prompt::build_prompt;
use crate::bot::ThreadBot;
use crate::core::models::{PipelineOutcome, Publication, Summary, ThreadRef};
use crate::errors::BotError;
use crate::slack::format_messages;

/// Fetch, format, resolve images, generate, and publish.
///
/// Only inference failures are returned as errors. A thread that cannot be
/// fetched or is empty yields [`Summary::NoMessages`] without calling the
/// model; a publishing failure is recorded in the outcome next to the summary.
///
/// # Errors
///
/// Returns `BotError::Inference` when the model call fails.
pub async fn summarize_thread(
    bot: &ThreadBot,
    thread: &ThreadRef,
) -> Result<PipelineOutcome, BotError> {
    let messages = match bot.chat().fetch_thread(thread).await {
        Ok(messages) => messages,
        Err(e) => {
            error!(channel_id = %thread.channel_id, thread_ts = %thread.thread_ts, "{}", e);
            Vec::new()
        }
    };

    if messages.is_empty() {
        info!(channel_id = %thread.channel_id, thread_ts = %thread.thread_ts, "No messages to summarize");
        return Ok(PipelineOutcome {
            summary: Summary::NoMessages,
            publication: Publication::Skipped,
        });
    }

    let transcript = format_messages(&messages);
    let images = resolve_images(bot.chat(), &transcript, bot.config().max_image_bytes).await;
    info!(
        messages = messages.len(),
        lines = transcript.lines().len(),
        images = images.len(),
        "Built transcript"
    );

    let prompt = build_prompt(&transcript, images);
    let summary = bot.inference().complete(&prompt).await?;

    let publication = match bot.publisher() {
        None => Publication::Skipped,
        Some(publisher) => match publisher.publish(&thread.page_title(), &summary).await {
            Ok(doc) => Publication::Published(doc),
            Err(e) => {
                warn!(thread_ts = %thread.thread_ts, "{}", e);
                Publication::Failed(e.to_string())
            }
        },
    };

    Ok(PipelineOutcome {
        summary: Summary::Generated(summary),
        publication,
    })
}
