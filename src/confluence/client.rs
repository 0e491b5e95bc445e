//! Confluence REST client module
//!
//! Creates pages through `POST {base}/rest/api/content`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::info;

use super::DocumentPublisher;
use super::storage::to_storage_format;
use crate::core::config::ConfluenceConfig;
use crate::core::models::PublishedDocument;
use crate::errors::BotError;

#[derive(Debug, Deserialize)]
struct PageLinks {
    base: Option<String>,
    tinyui: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedPage {
    #[serde(rename = "_links")]
    links: PageLinks,
}

/// Request body for a top-level page in `space_key`.
#[must_use]
pub fn build_page_body(space_key: &str, title: &str, storage_body: &str) -> Value {
    json!({
        "type": "page",
        "title": title,
        "space": { "key": space_key },
        "body": {
            "storage": {
                "value": storage_body,
                "representation": "storage",
            }
        }
    })
}

/// Absolute short link for a created page.
fn tiny_link(body: &[u8], base_url: &str) -> Result<String, BotError> {
    let page: CreatedPage = serde_json::from_slice(body)
        .map_err(|e| BotError::Publish(format!("Invalid create-page response: {e}")))?;

    let tinyui = page
        .links
        .tinyui
        .ok_or_else(|| BotError::Publish("Created page has no tinyui link".to_string()))?;

    if tinyui.starts_with("http://") || tinyui.starts_with("https://") {
        return Ok(tinyui);
    }

    let base = page.links.base.unwrap_or_else(|| base_url.to_string());
    Ok(format!("{}{}", base.trim_end_matches('/'), tinyui))
}

/// Extracts Confluence's error message from a rejection body.
fn rejection_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(ToString::to_string))
        .unwrap_or_else(|| body.chars().take(300).collect())
}

pub struct ConfluenceClient {
    config: ConfluenceConfig,
    http: Client,
}

impl ConfluenceClient {
    #[must_use]
    pub fn new(config: ConfluenceConfig, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { config, http }
    }
}

#[async_trait]
impl DocumentPublisher for ConfluenceClient {
    async fn publish(&self, title: &str, body: &str) -> Result<PublishedDocument, BotError> {
        let payload = build_page_body(&self.config.space_key, title, &to_storage_format(body));

        let resp = self
            .http
            .post(format!("{}/rest/api/content", self.config.base_url))
            .basic_auth(&self.config.user, Some(&self.config.password))
            .json(&payload)
            .send()
            .await
            .map_err(|e| BotError::Publish(format!("Confluence request failed: {e}")))?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| BotError::Publish(format!("Failed to read Confluence response: {e}")))?;

        if !status.is_success() {
            return Err(BotError::Publish(format!(
                "HTTP {status}: {}",
                rejection_message(&String::from_utf8_lossy(&bytes))
            )));
        }

        let link = tiny_link(&bytes, &self.config.base_url)?;
        info!(space = %self.config.space_key, title = %title, link = %link, "Confluence page created");

        Ok(PublishedDocument {
            title: title.to_string(),
            body: body.to_string(),
            space: self.config.space_key.clone(),
            link,
        })
    }
}
