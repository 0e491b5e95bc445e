//! The process-wide bot: configuration plus the clients the pipeline calls.

use std::sync::Arc;

use crate::ai::{BedrockClient, InferenceBackend};
use crate::confluence::{ConfluenceClient, DocumentPublisher};
use crate::core::config::AppConfig;
use crate::slack::{ChatPlatform, SlackClient};

/// Read-only after construction; shared by every invocation of a warm Lambda.
pub struct ThreadBot {
    config: AppConfig,
    chat: Arc<dyn ChatPlatform>,
    inference: Arc<dyn InferenceBackend>,
    publisher: Option<Arc<dyn DocumentPublisher>>,
}

impl ThreadBot {
    /// Compose a bot from explicit collaborators.
    #[must_use]
    pub fn new(
        config: AppConfig,
        chat: Arc<dyn ChatPlatform>,
        inference: Arc<dyn InferenceBackend>,
        publisher: Option<Arc<dyn DocumentPublisher>>,
    ) -> Self {
        Self {
            config,
            chat,
            inference,
            publisher,
        }
    }

    /// Build the production bot: Slack, Bedrock, and Confluence when configured.
    pub async fn from_config(config: AppConfig) -> Self {
        let chat = Arc::new(SlackClient::new(
            config.slack_bot_token.clone(),
            config.http_timeout,
        ));
        let inference = Arc::new(
            BedrockClient::from_env(
                config.bedrock_region.clone(),
                config.bedrock_model_id.clone(),
                config.bedrock_timeout,
            )
            .await,
        );
        let publisher = config.confluence.clone().map(|c| {
            Arc::new(ConfluenceClient::new(c, config.http_timeout)) as Arc<dyn DocumentPublisher>
        });

        Self::new(config, chat, inference, publisher)
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn chat(&self) -> &dyn ChatPlatform {
        self.chat.as_ref()
    }

    #[must_use]
    pub fn inference(&self) -> &dyn InferenceBackend {
        self.inference.as_ref()
    }

    #[must_use]
    pub fn publisher(&self) -> Option<&dyn DocumentPublisher> {
        self.publisher.as_deref()
    }
}
