//! API Lambda handler - thin router that delegates to the route handlers.
//!
//! This module handles:
//! - Path and method routing
//! - Body extraction (including base64-encoded bodies)
//! - Events API requests (delegated to `event_handler`)
//! - Direct summarize requests (delegated to `summarize_handler`)

use lambda_runtime::{Error, LambdaEvent};
use serde_json::{Value, json};
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use super::{event_handler, helpers, parsing, summarize_handler};
use crate::bot::ThreadBot;

/// Lambda handler for the API entrypoint.
///
/// # Errors
///
/// Never fails; every outcome is expressed as an HTTP response payload.
pub async fn function_handler(bot: &ThreadBot, event: LambdaEvent<Value>) -> Result<Value, Error> {
    let correlation_id = Uuid::new_v4().to_string();
    let span = info_span!("request", correlation_id = %correlation_id, request_id = %event.context.request_id);
    Ok(route(bot, &event.payload).instrument(span).await)
}

/// Routes one HTTP request payload to its handler.
pub async fn route(bot: &ThreadBot, payload: &Value) -> Value {
    let Some(path) = parsing::request_path(payload) else {
        error!("Request missing path");
        return helpers::err_response(400, "Missing path");
    };
    let method = parsing::request_method(payload);
    info!(raw_path = %path, method = %method, "Request received");

    let is_events = path.ends_with("/slack/events");
    let is_summarize = path.ends_with("/summarize");
    if !is_events && !is_summarize {
        return helpers::err_response(404, "Not found");
    }
    if !method.eq_ignore_ascii_case("POST") {
        return helpers::err_response(405, "Method not allowed");
    }

    let body = match parsing::request_body(payload) {
        Ok(body) => body,
        Err(e) => {
            error!("{}", e);
            return helpers::err_response(400, "Invalid request");
        }
    };

    if is_events {
        let empty = json!({});
        let headers = payload.get("headers").unwrap_or(&empty);
        event_handler::handle_slack_events(bot, headers, &body).await
    } else {
        summarize_handler::handle_summarize(bot, &body).await
    }
}
