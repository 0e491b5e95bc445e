#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use threadbook::ThreadBot;
use threadbook::confluence::DocumentPublisher;
use threadbook::ai::InferenceBackend;
use threadbook::core::config::AppConfig;
use threadbook::core::models::{Attachment, Message, Prompt, PublishedDocument, ThreadRef};
use threadbook::errors::BotError;
use threadbook::slack::{ChatPlatform, FileInfo};

pub const SIGNING_SECRET: &str = "test-signing-secret";

pub fn config() -> AppConfig {
    AppConfig {
        slack_bot_token: "xoxb-test".to_string(),
        slack_signing_secret: SIGNING_SECRET.to_string(),
        confluence: None,
        bedrock_model_id: "anthropic.claude-3-haiku-20240307-v1:0".to_string(),
        bedrock_region: "us-east-1".to_string(),
        http_timeout: Duration::from_secs(5),
        bedrock_timeout: Duration::from_secs(5),
        max_image_bytes: 1024,
    }
}

pub fn text(author: &str, body: &str) -> Message {
    Message {
        author: author.to_string(),
        text: Some(body.to_string()),
        attachments: Vec::new(),
    }
}

pub fn image(file_id: &str) -> Attachment {
    Attachment {
        file_id: file_id.to_string(),
        media_type: "image/png".to_string(),
        url_private: format!("https://files.slack.com/files-pri/T1-{file_id}/shot.png"),
    }
}

/// A file that resolves cleanly: public link shared, bytes available.
pub fn public_file(file_id: &str) -> FileInfo {
    FileInfo {
        id: file_id.to_string(),
        mimetype: Some("image/png".to_string()),
        download_url: Some(format!(
            "https://files.slack.com/files-pri/T1-{file_id}/download/shot.png"
        )),
        permalink_public: Some(format!("https://slack-files.com/T1-{file_id}-secret")),
        public_url_shared: true,
    }
}

#[derive(Default)]
pub struct StubChat {
    pub thread: Option<Vec<Message>>,
    pub files: HashMap<String, FileInfo>,
    pub downloads: HashMap<String, Vec<u8>>,
    pub fail_posts: bool,
    /// Answer `files.sharedPublicURL` the way Slack does for a file that is already public.
    pub already_public: bool,
    pub downloaded: Mutex<Vec<String>>,
    pub fetched: Mutex<Vec<ThreadRef>>,
    pub posts: Mutex<Vec<(String, String, String)>>,
}

impl StubChat {
    pub fn with_thread(messages: Vec<Message>) -> Self {
        Self {
            thread: Some(messages),
            ..Self::default()
        }
    }

    pub fn add_file(&mut self, info: FileInfo, bytes: &[u8]) {
        self.downloads.insert(info.id.clone(), bytes.to_vec());
        self.files.insert(info.id.clone(), info);
    }

    pub fn posts(&self) -> Vec<(String, String, String)> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatPlatform for StubChat {
    async fn fetch_thread(&self, thread: &ThreadRef) -> Result<Vec<Message>, BotError> {
        self.fetched.lock().unwrap().push(thread.clone());
        self.thread
            .clone()
            .ok_or_else(|| BotError::ThreadFetch("thread_not_found".to_string()))
    }

    async fn file_info(&self, file_id: &str) -> Result<FileInfo, BotError> {
        self.files
            .get(file_id)
            .cloned()
            .ok_or_else(|| BotError::AttachmentResolve("file_not_found".to_string()))
    }

    async fn share_public_url(&self, file_id: &str) -> Result<Option<String>, BotError> {
        if self.already_public {
            return Ok(None);
        }
        Ok(Some(format!("https://slack-files.com/T1-{file_id}-shared")))
    }

    async fn download_file(&self, url: &str, max_bytes: usize) -> Result<Vec<u8>, BotError> {
        self.downloaded.lock().unwrap().push(url.to_string());
        let bytes = self
            .downloads
            .iter()
            .find(|(id, _)| url.contains(&format!("-{id}/")))
            .map(|(_, b)| b.clone())
            .ok_or_else(|| BotError::AttachmentResolve("404".to_string()))?;
        if bytes.len() > max_bytes {
            return Err(BotError::AttachmentResolve("too large".to_string()));
        }
        Ok(bytes)
    }

    async fn post_in_thread(
        &self,
        channel_id: &str,
        thread_ts: &str,
        text: &str,
    ) -> Result<(), BotError> {
        if self.fail_posts {
            return Err(BotError::MissingScope("chat:write".to_string()));
        }
        self.posts.lock().unwrap().push((
            channel_id.to_string(),
            thread_ts.to_string(),
            text.to_string(),
        ));
        Ok(())
    }
}

pub struct StubModel {
    pub reply: Result<String, String>,
    pub prompts: Mutex<Vec<Prompt>>,
}

impl StubModel {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            reply: Err(reason.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceBackend for StubModel {
    async fn complete(&self, prompt: &Prompt) -> Result<String, BotError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.reply.clone().map_err(BotError::Inference)
    }
}

pub struct StubWiki {
    pub fail: bool,
    pub pages: Mutex<Vec<(String, String)>>,
}

impl StubWiki {
    pub fn accepting() -> Self {
        Self {
            fail: false,
            pages: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            fail: true,
            pages: Mutex::new(Vec::new()),
        }
    }

    pub fn pages(&self) -> Vec<(String, String)> {
        self.pages.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentPublisher for StubWiki {
    async fn publish(&self, title: &str, body: &str) -> Result<PublishedDocument, BotError> {
        if self.fail {
            return Err(BotError::Publish(
                "HTTP 400 Bad Request: A page with this title already exists".to_string(),
            ));
        }
        self.pages
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
        Ok(PublishedDocument {
            title: title.to_string(),
            body: body.to_string(),
            space: "ENG".to_string(),
            link: "https://wiki.example.com/x/AbCd".to_string(),
        })
    }
}

pub fn bot(
    chat: &Arc<StubChat>,
    model: &Arc<StubModel>,
    wiki: Option<&Arc<StubWiki>>,
) -> ThreadBot {
    ThreadBot::new(
        config(),
        chat.clone(),
        model.clone(),
        wiki.map(|w| w.clone() as Arc<dyn DocumentPublisher>),
    )
}
