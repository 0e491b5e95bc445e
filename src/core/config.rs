use std::env;
use std::time::Duration;

use crate::errors::BotError;

pub const DEFAULT_BEDROCK_MODEL_ID: &str = "anthropic.claude-3-haiku-20240307-v1:0";
pub const DEFAULT_BEDROCK_REGION: &str = "us-east-1";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BEDROCK_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Confluence settings. Present only when every `CONFLUENCE_*` variable is set.
#[derive(Debug, Clone)]
pub struct ConfluenceConfig {
    pub base_url: String,
    pub user: String,
    pub password: String,
    pub space_key: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub slack_bot_token: String,
    pub slack_signing_secret: String,
    pub confluence: Option<ConfluenceConfig>,
    pub bedrock_model_id: String,
    pub bedrock_region: String,
    pub http_timeout: Duration,
    pub bedrock_timeout: Duration,
    pub max_image_bytes: usize,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `BotError::Config` when a required variable is missing, when the
    /// Confluence group is only partially set, or when a numeric value does not parse.
    pub fn from_env() -> Result<Self, BotError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reads values through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| var(key).ok_or_else(|| BotError::Config(format!("{key} is not set")));

        Ok(Self {
            slack_bot_token: required("SLACK_BOT_TOKEN")?,
            slack_signing_secret: required("SLACK_SIGNING_SECRET")?,
            confluence: confluence_from(&var)?,
            bedrock_model_id: var("BEDROCK_MODEL_ID")
                .unwrap_or_else(|| DEFAULT_BEDROCK_MODEL_ID.to_string()),
            bedrock_region: var("BEDROCK_REGION")
                .unwrap_or_else(|| DEFAULT_BEDROCK_REGION.to_string()),
            http_timeout: Duration::from_secs(parse_or(
                var("HTTP_TIMEOUT_SECS"),
                "HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
            bedrock_timeout: Duration::from_secs(parse_or(
                var("BEDROCK_TIMEOUT_SECS"),
                "BEDROCK_TIMEOUT_SECS",
                DEFAULT_BEDROCK_TIMEOUT_SECS,
            )?),
            max_image_bytes: parse_or(
                var("MAX_IMAGE_BYTES"),
                "MAX_IMAGE_BYTES",
                DEFAULT_MAX_IMAGE_BYTES,
            )?,
        })
    }
}

fn confluence_from<F>(var: &F) -> Result<Option<ConfluenceConfig>, BotError>
where
    F: Fn(&str) -> Option<String>,
{
    const KEYS: [&str; 4] = [
        "CONFLUENCE_URL",
        "CONFLUENCE_USER",
        "CONFLUENCE_PASSWORD",
        "CONFLUENCE_SPACE_KEY",
    ];

    let values: Vec<Option<String>> = KEYS.iter().map(|&k| var(k)).collect();
    if values.iter().all(Option::is_none) {
        return Ok(None);
    }

    let missing: Vec<&str> = KEYS
        .iter()
        .zip(&values)
        .filter(|(_, v)| v.is_none())
        .map(|(k, _)| *k)
        .collect();
    if !missing.is_empty() {
        return Err(BotError::Config(format!(
            "Confluence is partially configured, missing: {}",
            missing.join(", ")
        )));
    }

    let mut values = values.into_iter().flatten();
    let mut next = || values.next().unwrap_or_default();
    Ok(Some(ConfluenceConfig {
        base_url: next().trim_end_matches('/').to_string(),
        user: next(),
        password: next(),
        space_key: next(),
    }))
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, key: &str, default: T) -> Result<T, BotError> {
    match raw {
        Some(v) => v
            .trim()
            .parse::<T>()
            .map_err(|_| BotError::Config(format!("{key} must be a number, got '{v}'"))),
        None => Ok(default),
    }
}
