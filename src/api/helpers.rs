//! Response builders shared by the route handlers.
//!
//! Responses use the API Gateway / Function URL proxy shape.

use serde_json::{Value, json};

/// Returns a response with the given status code and JSON body.
#[must_use]
pub fn json_response(status_code: u16, body: &Value) -> Value {
    json!({
        "statusCode": status_code,
        "headers": { "content-type": "application/json" },
        "body": body.to_string()
    })
}

/// Returns a 200 OK response with `{"status": "ok"}`.
#[must_use]
pub fn ok_status() -> Value {
    json_response(200, &json!({ "status": "ok" }))
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json_response(status_code, &json!({ "error": message }))
}
