/// threadbook - a Slack bot that turns a mentioned thread into a runbook.
///
/// When the bot is mentioned in a Slack thread it fetches the whole thread,
/// summarizes it with an Anthropic Claude model on AWS Bedrock (images
/// included), publishes the summary as a Confluence page, and replies in the
/// thread with the summary and the page link.
///
/// # Architecture
///
/// The system uses:
/// - AWS Lambda behind an HTTP front door (`/slack/events`, `/summarize`)
/// - slack-morphism and the Slack Web API for threads, files and replies
/// - the Bedrock runtime SDK for model invocation
/// - the Confluence REST API for page creation
/// - Tokio for async runtime
///
/// # Example
///
/// ```no_run
/// use threadbook::ThreadBot;
/// use threadbook::core::config::AppConfig;
/// use threadbook::core::models::ThreadRef;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     threadbook::setup_logging();
///
///     let config = AppConfig::from_env()?;
///     let bot = ThreadBot::from_config(config).await;
///
///     let thread = ThreadRef::new("C0755GWLGAD", "1716459443.426039");
///     let outcome = threadbook::pipeline::summarize_thread(&bot, &thread).await?;
///     println!("{}", outcome.message());
///
///     Ok(())
/// }
/// ```
pub mod ai;
pub mod api;
pub mod bot;
pub mod confluence;
pub mod core;
pub mod errors;
pub mod pipeline;
pub mod slack;
pub mod utils;

pub use bot::ThreadBot;
pub use errors::BotError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration, filtered by `RUST_LOG` (default `info`).
/// Calling it more than once is harmless.
///
/// # Example
///
/// ```
/// threadbook::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
