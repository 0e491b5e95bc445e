//! Bedrock (Anthropic Claude) client module
//!
//! Sends the summarization prompt to `InvokeModel` and returns the model text.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::primitives::Blob;
use std::time::Duration;
use tracing::info;

use super::InferenceBackend;
use super::prompt::{SamplingParams, build_request_body, extract_summary};
use crate::core::models::Prompt;
use crate::errors::BotError;

/// Bedrock runtime client bound to one model id.
pub struct BedrockClient {
    client: Client,
    model_id: String,
    params: SamplingParams,
}

impl BedrockClient {
    #[must_use]
    pub fn new(client: Client, model_id: String) -> Self {
        Self {
            client,
            model_id,
            params: SamplingParams::default(),
        }
    }

    /// Builds a client from the default AWS provider chain with an operation timeout.
    pub async fn from_env(region: String, model_id: String, timeout: Duration) -> Self {
        let timeouts = TimeoutConfig::builder().operation_timeout(timeout).build();
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(region))
            .timeout_config(timeouts)
            .load()
            .await;

        Self::new(Client::new(&sdk_config), model_id)
    }
}

#[async_trait]
impl InferenceBackend for BedrockClient {
    async fn complete(&self, prompt: &Prompt) -> Result<String, BotError> {
        let body = build_request_body(prompt, &self.params);
        let bytes = serde_json::to_vec(&body)
            .map_err(|e| BotError::Inference(format!("Failed to encode request body: {e}")))?;

        #[cfg(feature = "debug-logs")]
        info!("Using Bedrock request body:\n{}", body);

        info!(
            model_id = %self.model_id,
            images = prompt.images.len(),
            "Invoking Bedrock model"
        );

        let output = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(bytes))
            .send()
            .await
            .map_err(|e| BotError::Inference(DisplayErrorContext(&e).to_string()))?;

        extract_summary(output.body().as_ref())
    }
}
