//! Handler for `POST /summarize`.

use serde_json::{Map, Value, json};
use tracing::error;

use super::helpers::{err_response, json_response};
use crate::bot::ThreadBot;
use crate::core::models::{PipelineOutcome, Publication, SummarizeRequest};
use crate::pipeline::summarize_thread;

pub const MISSING_FIELDS: &str = "Missing channel_id or thread_ts";

/// Response body for a finished pipeline run.
///
/// Without a publisher the body is `{"summary": ..}`; with one it is
/// `{"confluence_message": ..}` plus `error` when publishing failed.
#[must_use]
pub fn outcome_body(outcome: &PipelineOutcome, publishing_enabled: bool) -> Value {
    if !publishing_enabled {
        return json!({ "summary": outcome.summary.text() });
    }

    let mut body = Map::new();
    body.insert("confluence_message".to_string(), Value::String(outcome.message()));
    if let Publication::Failed(reason) = &outcome.publication {
        body.insert("error".to_string(), Value::String(reason.clone()));
    }
    Value::Object(body)
}

pub async fn handle_summarize(bot: &ThreadBot, body: &str) -> Value {
    let request: SummarizeRequest = serde_json::from_str(body).unwrap_or_default();

    let Some(thread) = request.thread() else {
        return err_response(400, MISSING_FIELDS);
    };

    match summarize_thread(bot, &thread).await {
        Ok(outcome) => json_response(200, &outcome_body(&outcome, bot.publisher().is_some())),
        Err(e) => {
            error!(channel_id = %thread.channel_id, thread_ts = %thread.thread_ts, "Failed to generate summary: {}", e);
            err_response(502, &e.to_string())
        }
    }
}
