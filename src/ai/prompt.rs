//! Prompt construction and the Bedrock request/response shapes.

use serde_json::{Value, json};

use crate::core::models::{EncodedImage, Prompt, Transcript};
use crate::errors::BotError;

pub const SYSTEM_PROMPT: &str = "You are an honest and helpful bot.";

pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Claude's per-request image limit.
pub const MAX_IMAGES: usize = 20;

const INSTRUCTION: &str = "Extract insights from the following Slack conversation, focused on \
engineering challenges including code issues and infrastructure setup. Identify the initial \
problem and find out what was the solution from the thread conversation. Be concise. Provide a \
straightforward answer. Your task is to provide a clear summary. Do not make it narrative, do not \
mention it like 'The user did this' or 'The user did that'. Instead, just provide what was the \
question and what is the final solution in an instructional manner. Here is the discussion text:";

/// Sampling parameters sent with every invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub stop_sequences: Vec<String>,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            max_tokens: 2048,
            temperature: 0.1,
            top_k: 250,
            top_p: 1.0,
            stop_sequences: vec!["\n\nHuman".to_string()],
        }
    }
}

/// Builds the prompt: instruction, the rendered transcript, then the images.
#[must_use]
pub fn build_prompt(transcript: &Transcript, images: Vec<EncodedImage>) -> Prompt {
    Prompt {
        instruction: format!("{INSTRUCTION}\n\n{}\n\n:", transcript.render()),
        images,
    }
}

/// Anthropic messages body for Bedrock `InvokeModel`.
#[must_use]
pub fn build_request_body(prompt: &Prompt, params: &SamplingParams) -> Value {
    let mut content = vec![json!({"type": "text", "text": prompt.instruction})];
    content.extend(prompt.images.iter().map(|image| {
        json!({
            "type": "image",
            "source": {
                "type": "base64",
                "media_type": image.media_type,
                "data": image.data,
            }
        })
    }));

    json!({
        "anthropic_version": ANTHROPIC_VERSION,
        "system": SYSTEM_PROMPT,
        "messages": [
            { "role": "user", "content": content }
        ],
        "max_tokens": params.max_tokens,
        "temperature": params.temperature,
        "top_k": params.top_k,
        "top_p": params.top_p,
        "stop_sequences": params.stop_sequences,
    })
}

/// Pulls the first text block out of a Bedrock Anthropic response body.
///
/// # Errors
///
/// Returns `BotError::Inference` if the body is not JSON or carries no text block.
pub fn extract_summary(body: &[u8]) -> Result<String, BotError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| BotError::Inference(format!("Invalid model response JSON: {e}")))?;

    value
        .get("content")
        .and_then(Value::as_array)
        .and_then(|blocks| {
            blocks
                .iter()
                .find(|b| b.get("type").and_then(Value::as_str).is_none_or(|t| t == "text"))
        })
        .and_then(|b| b.get("text"))
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| BotError::Inference("Model response has no text content".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::TranscriptLine;

    fn transcript() -> Transcript {
        let mut t = Transcript::new();
        t.push(TranscriptLine::Text {
            author: "U1".into(),
            text: "terraform apply hangs".into(),
        });
        t.push(TranscriptLine::Text {
            author: "U2".into(),
            text: "state lock in dynamodb, force-unlock it".into(),
        });
        t
    }

    #[test]
    fn test_prompt_contains_instruction_and_transcript() {
        let prompt = build_prompt(&transcript(), Vec::new());

        assert!(prompt.instruction.starts_with("Extract insights"));
        assert!(prompt.instruction.contains(
            "U1: terraform apply hangs\nU2: state lock in dynamodb, force-unlock it"
        ));
        assert!(prompt.images.is_empty());
    }

    #[test]
    fn test_request_body_shape() {
        let images = vec![EncodedImage {
            media_type: "image/png".into(),
            data: "aGVsbG8=".into(),
        }];
        let prompt = build_prompt(&transcript(), images);
        let body = build_request_body(&prompt, &SamplingParams::default());

        assert_eq!(body["anthropic_version"], "bedrock-2023-05-31");
        assert_eq!(body["system"], SYSTEM_PROMPT);
        assert_eq!(body["max_tokens"], 2048);
        assert_eq!(body["top_k"], 250);
        assert_eq!(body["stop_sequences"][0], "\n\nHuman");

        let content = body["messages"][0]["content"].as_array().unwrap();
        assert_eq!(content.len(), 2);
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[1]["type"], "image");
        assert_eq!(content[1]["source"]["type"], "base64");
        assert_eq!(content[1]["source"]["media_type"], "image/png");
        assert_eq!(content[1]["source"]["data"], "aGVsbG8=");
    }

    #[test]
    fn test_sampling_values_are_sent_exactly() {
        let body = build_request_body(&build_prompt(&transcript(), Vec::new()), &SamplingParams::default());
        assert_eq!(body["temperature"].to_string(), "0.1");
        assert_eq!(body["top_p"].to_string(), "1.0");
    }

    #[test]
    fn test_extract_summary_first_text_block() {
        let body = br#"{"id":"msg_1","content":[{"type":"text","text":"Run terraform force-unlock."},{"type":"text","text":"ignored"}],"stop_reason":"end_turn"}"#;
        assert_eq!(extract_summary(body).unwrap(), "Run terraform force-unlock.");
    }

    #[test]
    fn test_extract_summary_missing_content_is_inference_error() {
        let err = extract_summary(br#"{"content":[]}"#).unwrap_err();
        assert!(matches!(err, BotError::Inference(_)));

        let err = extract_summary(b"not json").unwrap_err();
        assert!(matches!(err, BotError::Inference(_)));
    }
}
