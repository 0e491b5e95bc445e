//! Handler for `POST /slack/events` (Slack Events API).
//!
//! The URL-verification handshake is answered before anything else. Every
//! other payload must carry a valid Slack signature; verified `app_mention`
//! events run the summarization pipeline in-process.

use serde_json::{Value, json};
use tracing::{error, info};

use super::helpers::{err_response, json_response, ok_status};
use super::parsing::{get_header_value, v_str};
use super::signature;
use crate::bot::ThreadBot;
use crate::core::models::ThreadRef;
use crate::errors::BotError;
use crate::pipeline;

/// Thread to summarize for an `app_mention` event.
///
/// A mention inside a thread anchors on the thread parent; a top-level
/// mention anchors on itself.
#[must_use]
pub fn mention_thread(event: &Value) -> Option<ThreadRef> {
    let channel_id = v_str(event, &["channel"]).filter(|s| !s.is_empty())?;
    let thread_ts = v_str(event, &["thread_ts"])
        .or_else(|| v_str(event, &["ts"]))
        .filter(|s| !s.is_empty())?;
    Some(ThreadRef::new(channel_id, thread_ts))
}

fn verify_request(bot: &ThreadBot, headers: &Value, body: &str) -> Result<(), BotError> {
    let sig = get_header_value(headers, "X-Slack-Signature")
        .ok_or_else(|| BotError::Verification("Missing X-Slack-Signature header".to_string()))?;
    let timestamp = get_header_value(headers, "X-Slack-Request-Timestamp").ok_or_else(|| {
        BotError::Verification("Missing X-Slack-Request-Timestamp header".to_string())
    })?;

    signature::verify_slack_signature(body, timestamp, sig, &bot.config().slack_signing_secret)
}

/// Handle an Events API request.
///
/// # Returns
/// `{"challenge": ..}` for the handshake, 400 when verification fails, and
/// `{"status": "ok"}` otherwise, whatever happened downstream.
pub async fn handle_slack_events(bot: &ThreadBot, headers: &Value, body: &str) -> Value {
    let json_body: Option<Value> = serde_json::from_str(body).ok();

    if let Some(challenge) = json_body
        .as_ref()
        .and_then(|v| v.get("challenge"))
        .and_then(Value::as_str)
    {
        return json_response(200, &json!({ "challenge": challenge }));
    }

    if let Err(e) = verify_request(bot, headers, body) {
        error!("{}", e);
        return err_response(400, "Invalid request");
    }

    let Some(json_body) = json_body else {
        error!("Verified Slack request body is not JSON");
        return err_response(400, "Invalid request");
    };

    // Slack redelivers when the first attempt is slow; the first attempt is still running.
    if let Some(retry) = get_header_value(headers, "X-Slack-Retry-Num") {
        info!(retry_num = %retry, "Ignoring Slack redelivery");
        return ok_status();
    }

    let Some(event) = json_body.get("event") else {
        return ok_status();
    };

    let event_type = v_str(event, &["type"]).unwrap_or("");
    info!(event_type = %event_type, "Processing event callback");

    if event_type == "app_mention" {
        match mention_thread(event) {
            Some(thread) => {
                info!(channel_id = %thread.channel_id, thread_ts = %thread.thread_ts, "Summarizing mentioned thread");
                pipeline::handle_mention(bot, &thread).await;
            }
            None => error!("app_mention event without channel or ts"),
        }
    }

    ok_status()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mention_in_thread_uses_parent_ts() {
        let event = json!({
            "type": "app_mention",
            "channel": "C0755GWLGAD",
            "ts": "1716459800.000100",
            "thread_ts": "1716459443.426039"
        });
        assert_eq!(
            mention_thread(&event),
            Some(ThreadRef::new("C0755GWLGAD", "1716459443.426039"))
        );
    }

    #[test]
    fn test_top_level_mention_anchors_on_itself() {
        let event = json!({"type": "app_mention", "channel": "C1", "ts": "1716459800.000100"});
        assert_eq!(mention_thread(&event), Some(ThreadRef::new("C1", "1716459800.000100")));
    }

    #[test]
    fn test_mention_without_channel() {
        let event = json!({"type": "app_mention", "ts": "1.0"});
        assert!(mention_thread(&event).is_none());
    }
}
