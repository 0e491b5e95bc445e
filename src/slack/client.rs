//! Slack API client module
//!
//! Encapsulates the Slack Web API calls the summarizer needs: thread replies,
//! file metadata and sharing, public file downloads, and thread replies.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use slack_morphism::hyper_tokio::{SlackClientHyperConnector, SlackHyperClient};
use slack_morphism::prelude::SlackApiConversationsRepliesRequest;
use slack_morphism::{SlackApiToken, SlackApiTokenValue, SlackChannelId, SlackHistoryMessage, SlackTs};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::platform::{ChatPlatform, FileInfo};
use crate::core::models::{Attachment, Message, ThreadRef};
use crate::errors::BotError;
use crate::utils::mime::guess_from_path;

const SLACK_API: &str = "https://slack.com/api";

/// Upper bound Slack accepts for `conversations.replies`.
const REPLIES_PAGE_LIMIT: u16 = 1000;

// Build the Slack client connector safely without panicking.
// If connector construction fails, store None and surface a BotError at call sites.
static SLACK_CLIENT: std::sync::LazyLock<Option<SlackHyperClient>> =
    std::sync::LazyLock::new(|| match SlackClientHyperConnector::new() {
        Ok(connector) => Some(SlackHyperClient::new(connector)),
        Err(e) => {
            warn!("Failed to create Slack HTTP connector: {}", e);
            None
        }
    });

#[derive(Debug, Deserialize)]
struct SlackFileObject {
    id: String,
    mimetype: Option<String>,
    url_private: Option<String>,
    url_private_download: Option<String>,
    permalink_public: Option<String>,
    #[serde(default)]
    public_url_shared: bool,
}

#[derive(Debug, Deserialize)]
struct FileResponse {
    ok: bool,
    file: Option<SlackFileObject>,
    error: Option<String>,
}

impl From<SlackFileObject> for FileInfo {
    fn from(file: SlackFileObject) -> Self {
        FileInfo {
            id: file.id,
            mimetype: file.mimetype,
            download_url: file.url_private_download.or(file.url_private),
            permalink_public: file.permalink_public,
            public_url_shared: file.public_url_shared,
        }
    }
}

/// Maps a Slack history message onto the domain `Message`.
///
/// Slack omits `user` for some bot posts; those are attributed to `unknown`.
#[must_use]
pub fn message_from_history(msg: &SlackHistoryMessage) -> Message {
    let author = msg
        .sender
        .user
        .as_ref()
        .map_or_else(|| "unknown".to_string(), |uid| uid.0.clone());

    let attachments = msg
        .content
        .files
        .iter()
        .flatten()
        .filter_map(|file| {
            let url = file.url_private.as_ref()?;
            let media_type = file
                .mimetype
                .as_ref()
                .map_or_else(|| guess_from_path(url.path()), |m| m.0.clone());
            Some(Attachment {
                file_id: file.id.0.clone(),
                media_type,
                url_private: url.to_string(),
            })
        })
        .collect();

    Message {
        author,
        text: msg.content.text.clone(),
        attachments,
    }
}

/// Classifies a failed `chat.postMessage` body.
fn post_message_error(body: &Value) -> BotError {
    let code = body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("unknown");

    if code == "missing_scope" {
        let needed = body
            .get("needed")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        BotError::MissingScope(needed.to_string())
    } else {
        BotError::Notify(format!("chat.postMessage error: {code}"))
    }
}

/// Slack Web API client
pub struct SlackClient {
    token: SlackApiToken,
    http: Client,
    timeout: Duration,
}

impl SlackClient {
    #[must_use]
    pub fn new(token: String, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            token: SlackApiToken::new(SlackApiTokenValue::new(token)),
            http,
            timeout,
        }
    }

    async fn file_call(&self, method: &str, file_id: &str) -> Result<FileResponse, BotError> {
        let resp = self
            .http
            .post(format!("{SLACK_API}/{method}"))
            .bearer_auth(&self.token.token_value.0)
            .form(&[("file", file_id)])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(BotError::AttachmentResolve(format!(
                "{method} HTTP {}",
                resp.status()
            )));
        }

        Ok(resp.json::<FileResponse>().await?)
    }
}

#[async_trait]
impl ChatPlatform for SlackClient {
    async fn fetch_thread(&self, thread: &ThreadRef) -> Result<Vec<Message>, BotError> {
        let session = SLACK_CLIENT
            .as_ref()
            .ok_or_else(|| {
                BotError::ThreadFetch("Slack HTTP connector not initialized".to_string())
            })?
            .open_session(&self.token);

        let request = SlackApiConversationsRepliesRequest::new(
            SlackChannelId(thread.channel_id.clone()),
            SlackTs(thread.thread_ts.clone()),
        )
        .with_limit(REPLIES_PAGE_LIMIT);

        let response = tokio::time::timeout(self.timeout, session.conversations_replies(&request))
            .await
            .map_err(|_| BotError::ThreadFetch("conversations.replies timed out".to_string()))?
            .map_err(|e| BotError::ThreadFetch(e.to_string()))?;

        debug!(
            channel_id = %thread.channel_id,
            thread_ts = %thread.thread_ts,
            count = response.messages.len(),
            "Fetched thread replies"
        );

        Ok(response.messages.iter().map(message_from_history).collect())
    }

    async fn file_info(&self, file_id: &str) -> Result<FileInfo, BotError> {
        let body = self.file_call("files.info", file_id).await?;

        if !body.ok {
            return Err(BotError::AttachmentResolve(format!(
                "files.info error: {}",
                body.error.unwrap_or_else(|| "unknown".to_string())
            )));
        }

        body.file
            .map(FileInfo::from)
            .ok_or_else(|| BotError::AttachmentResolve("files.info: no file in response".to_string()))
    }

    async fn share_public_url(&self, file_id: &str) -> Result<Option<String>, BotError> {
        let body = self.file_call("files.sharedPublicURL", file_id).await?;

        if !body.ok {
            let code = body.error.unwrap_or_else(|| "unknown".to_string());
            if code == "already_public" {
                return Ok(None);
            }
            return Err(BotError::AttachmentResolve(format!(
                "files.sharedPublicURL error: {code}"
            )));
        }

        body.file
            .and_then(|f| f.permalink_public)
            .map(Some)
            .ok_or_else(|| {
                BotError::AttachmentResolve("files.sharedPublicURL: no permalink_public".to_string())
            })
    }

    async fn download_file(&self, url: &str, max_bytes: usize) -> Result<Vec<u8>, BotError> {
        if max_bytes == 0 {
            return Err(BotError::AttachmentResolve(
                "download_file max_bytes must be > 0".to_string(),
            ));
        }

        let resp = self.http.get(url).send().await?;

        if !resp.status().is_success() {
            return Err(BotError::AttachmentResolve(format!(
                "Slack file download HTTP {}",
                resp.status()
            )));
        }

        // Slack answers with an HTML login page when the pub_secret is not honoured.
        if let Some(ct) = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            && ct.starts_with("text/html")
        {
            return Err(BotError::AttachmentResolve(
                "Slack file download returned HTML instead of an image".to_string(),
            ));
        }

        if let Some(len) = resp.content_length()
            && len > u64::try_from(max_bytes).unwrap_or(u64::MAX)
        {
            return Err(BotError::AttachmentResolve(format!(
                "Slack image too large to inline ({len}B > {max_bytes}B)"
            )));
        }

        let mut out: Vec<u8> = Vec::new();
        let mut stream = resp.bytes_stream();
        while let Some(item) = stream.next().await {
            let chunk = item?;
            if out.len().saturating_add(chunk.len()) > max_bytes {
                return Err(BotError::AttachmentResolve(format!(
                    "Slack image too large to inline (exceeded {max_bytes}B cap)"
                )));
            }
            out.extend_from_slice(&chunk);
        }

        Ok(out)
    }

    async fn post_in_thread(
        &self,
        channel_id: &str,
        thread_ts: &str,
        text: &str,
    ) -> Result<(), BotError> {
        let payload = json!({
            "channel": channel_id,
            "text": text,
            "thread_ts": thread_ts,
        });

        let resp = self
            .http
            .post(format!("{SLACK_API}/chat.postMessage"))
            .bearer_auth(&self.token.token_value.0)
            .json(&payload)
            .send()
            .await
            .map_err(|e| BotError::Notify(format!("Failed to post thread message: {e}")))?;

        if !resp.status().is_success() {
            return Err(BotError::Notify(format!(
                "chat.postMessage HTTP {}",
                resp.status()
            )));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| BotError::Notify(format!("chat.postMessage JSON parse error: {e}")))?;

        if !body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
            return Err(post_message_error(&body));
        }

        info!(
            channel_id = %channel_id,
            thread_ts = %thread_ts,
            ts = body.get("ts").and_then(serde_json::Value::as_str).unwrap_or(""),
            "Message posted to thread"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_from_history_text_only() {
        let msg: SlackHistoryMessage = serde_json::from_value(json!({
            "ts": "1716459443.426039",
            "user": "U123",
            "text": "boto3 cannot find credentials"
        }))
        .unwrap();

        let message = message_from_history(&msg);
        assert_eq!(message.author, "U123");
        assert_eq!(message.text.as_deref(), Some("boto3 cannot find credentials"));
        assert!(message.attachments.is_empty());
    }

    #[test]
    fn test_message_from_history_without_user_is_unknown() {
        let msg: SlackHistoryMessage = serde_json::from_value(json!({
            "ts": "1716459443.426039",
            "text": "deploy finished"
        }))
        .unwrap();

        assert_eq!(message_from_history(&msg).author, "unknown");
    }

    #[test]
    fn test_message_from_history_maps_files() {
        let msg: SlackHistoryMessage = serde_json::from_value(json!({
            "ts": "1716459769.164459",
            "user": "U9",
            "text": "stack trace attached",
            "files": [
                {
                    "id": "F01",
                    "mimetype": "image/png",
                    "url_private": "https://files.slack.com/files-pri/T1-F01/trace.png"
                },
                {
                    "id": "F02",
                    "url_private": "https://files.slack.com/files-pri/T1-F02/photo.jpg"
                },
                { "id": "F03" }
            ]
        }))
        .unwrap();

        let message = message_from_history(&msg);
        assert_eq!(message.attachments.len(), 2);
        assert_eq!(message.attachments[0].file_id, "F01");
        assert_eq!(message.attachments[0].media_type, "image/png");
        assert_eq!(message.attachments[1].media_type, "image/jpeg");
    }

    #[test]
    fn test_file_response_parsing() {
        let body: FileResponse = serde_json::from_value(json!({
            "ok": true,
            "file": {
                "id": "F01",
                "mimetype": "image/png",
                "url_private": "https://files.slack.com/files-pri/T1-F01/a.png",
                "url_private_download": "https://files.slack.com/files-pri/T1-F01/download/a.png",
                "permalink_public": "https://slack-files.com/T1-F01-abc123",
                "public_url_shared": true
            }
        }))
        .unwrap();

        let info = FileInfo::from(body.file.unwrap());
        assert_eq!(
            info.download_url.as_deref(),
            Some("https://files.slack.com/files-pri/T1-F01/download/a.png")
        );
        assert!(info.public_url_shared);
    }

    #[test]
    fn test_post_message_missing_scope() {
        let body = json!({"ok": false, "error": "missing_scope", "needed": "chat:write"});
        match post_message_error(&body) {
            BotError::MissingScope(needed) => assert_eq!(needed, "chat:write"),
            other => panic!("unexpected error: {other:?}"),
        }

        let body = json!({"ok": false, "error": "channel_not_found"});
        assert!(matches!(post_message_error(&body), BotError::Notify(_)));
    }
}
