use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a Slack thread: the channel plus the anchor message timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadRef {
    pub channel_id: String,
    pub thread_ts: String,
}

impl ThreadRef {
    #[must_use]
    pub fn new(channel_id: impl Into<String>, thread_ts: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            thread_ts: thread_ts.into(),
        }
    }

    /// Title of the Confluence page created for this thread.
    #[must_use]
    pub fn page_title(&self) -> String {
        format!("Summary for Thread {}", self.thread_ts)
    }
}

/// A file attached to a Slack message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_id: String,
    pub media_type: String,
    pub url_private: String,
}

impl Attachment {
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

/// One message of a thread, already mapped out of the Slack API types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub author: String,
    pub text: Option<String>,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptLine {
    Text {
        author: String,
        text: String,
    },
    Image {
        author: String,
        file_id: String,
        media_type: String,
        url: String,
    },
}

impl fmt::Display for TranscriptLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptLine::Text { author, text } => write!(f, "{author}: {text}"),
            TranscriptLine::Image { author, url, .. } => write!(f, "{author}: [Image] {url}"),
        }
    }
}

/// Flat, ordered rendering of a thread. Built per summarization call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    lines: Vec<TranscriptLine>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: TranscriptLine) {
        self.lines.push(line);
    }

    #[must_use]
    pub fn lines(&self) -> &[TranscriptLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Image lines in transcript order.
    pub fn images(&self) -> impl Iterator<Item = &TranscriptLine> {
        self.lines
            .iter()
            .filter(|line| matches!(line, TranscriptLine::Image { .. }))
    }

    /// The transcript as newline-joined text.
    #[must_use]
    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Base64 image ready to be sent as a model content block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub media_type: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub instruction: String,
    pub images: Vec<EncodedImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedDocument {
    pub title: String,
    pub body: String,
    pub space: String,
    pub link: String,
}

/// Body of `POST /summarize`.
#[derive(Debug, Default, Deserialize)]
pub struct SummarizeRequest {
    pub channel_id: Option<String>,
    pub thread_ts: Option<String>,
}

impl SummarizeRequest {
    /// Both fields present and non-empty.
    #[must_use]
    pub fn thread(&self) -> Option<ThreadRef> {
        let channel_id = self.channel_id.as_deref().filter(|s| !s.is_empty())?;
        let thread_ts = self.thread_ts.as_deref().filter(|s| !s.is_empty())?;
        Some(ThreadRef::new(channel_id, thread_ts))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    Generated(String),
    NoMessages,
}

impl Summary {
    pub const NO_MESSAGES_TEXT: &'static str = "No messages found or error fetching messages.";

    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Summary::Generated(text) => text,
            Summary::NoMessages => Self::NO_MESSAGES_TEXT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Publication {
    /// No publisher configured, or nothing worth publishing.
    Skipped,
    Published(PublishedDocument),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub summary: Summary,
    pub publication: Publication,
}

impl PipelineOutcome {
    pub const RUNBOOK_LEAD: &'static str = "Here is the confluence runbook created for the issue: ";

    /// Text posted back to Slack and returned as `confluence_message`.
    #[must_use]
    pub fn message(&self) -> String {
        match &self.publication {
            Publication::Published(doc) => {
                format!("{}\n\n{}{}", self.summary.text(), Self::RUNBOOK_LEAD, doc.link)
            }
            Publication::Skipped | Publication::Failed(_) => self.summary.text().to_string(),
        }
    }
}
