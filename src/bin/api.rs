use threadbook::ThreadBot;
use threadbook::api::function_handler;
use threadbook::core::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    threadbook::setup_logging();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Config error: {}", e);
        lambda_runtime::Error::from(e)
    })?;
    let bot = ThreadBot::from_config(config).await;
    let bot = &bot;

    lambda_runtime::run(lambda_runtime::service_fn(move |event| async move {
        function_handler(bot, event).await
    }))
    .await
}
