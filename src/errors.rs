use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Failed to fetch Slack thread: {0}")]
    ThreadFetch(String),

    #[error("Failed to resolve image attachment: {0}")]
    AttachmentResolve(String),

    #[error("Failed to invoke Bedrock model: {0}")]
    Inference(String),

    #[error("Failed to publish Confluence page: {0}")]
    Publish(String),

    #[error("Failed to post Slack message: {0}")]
    Notify(String),

    #[error("Slack app is missing the required scope: {0}")]
    MissingScope(String),

    #[error("Slack request verification failed: {0}")]
    Verification(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to send HTTP request: {0}")]
    Http(String),
}

impl From<reqwest::Error> for BotError {
    fn from(error: reqwest::Error) -> Self {
        BotError::Http(error.to_string())
    }
}
