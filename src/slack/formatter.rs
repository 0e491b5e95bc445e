//! Flattens a Slack thread into the transcript handed to the model.

use crate::core::models::{Message, Transcript, TranscriptLine};

/// Formats `messages` into a fresh [`Transcript`].
///
/// Each message contributes its text line (when it has text) followed by one
/// image line per image attachment. Non-image files are ignored, so a message
/// with neither text nor images contributes nothing.
#[must_use]
pub fn format_messages(messages: &[Message]) -> Transcript {
    let mut transcript = Transcript::new();

    for message in messages {
        if let Some(text) = message.text.as_deref().filter(|t| !t.is_empty()) {
            transcript.push(TranscriptLine::Text {
                author: message.author.clone(),
                text: text.to_string(),
            });
        }

        for attachment in message.attachments.iter().filter(|a| a.is_image()) {
            transcript.push(TranscriptLine::Image {
                author: message.author.clone(),
                file_id: attachment.file_id.clone(),
                media_type: attachment.media_type.clone(),
                url: attachment.url_private.clone(),
            });
        }
    }

    transcript
}
