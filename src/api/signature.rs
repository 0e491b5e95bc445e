use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::errors::BotError;

type HmacSha256 = Hmac<Sha256>;

/// Oldest request timestamp accepted, in seconds.
const MAX_REQUEST_AGE_SECS: u64 = 300;
/// Tolerated clock skew for timestamps in the future.
const MAX_FUTURE_SKEW_SECS: u64 = 60;

/// Verifies a Slack `v0` request signature against the current time.
///
/// # Errors
///
/// Returns `BotError::Verification` when the timestamp is stale or malformed,
/// or when the signature does not match.
pub fn verify_slack_signature(
    request_body: &str,
    timestamp: &str,
    signature: &str,
    signing_secret: &str,
) -> Result<(), BotError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| BotError::Verification(format!("System clock error: {e}")))?
        .as_secs();
    verify_slack_signature_at(request_body, timestamp, signature, signing_secret, now)
}

/// Same as [`verify_slack_signature`] with an explicit current time.
///
/// # Errors
///
/// See [`verify_slack_signature`].
pub fn verify_slack_signature_at(
    request_body: &str,
    timestamp: &str,
    signature: &str,
    signing_secret: &str,
    now_secs: u64,
) -> Result<(), BotError> {
    let ts = timestamp
        .trim()
        .parse::<u64>()
        .map_err(|_| BotError::Verification(format!("Malformed timestamp '{timestamp}'")))?;

    if now_secs.saturating_sub(ts) > MAX_REQUEST_AGE_SECS || ts > now_secs + MAX_FUTURE_SKEW_SECS {
        return Err(BotError::Verification(
            "Timestamp out of range, potential replay attack".to_string(),
        ));
    }

    let provided = signature
        .strip_prefix("v0=")
        .and_then(|hex_sig| hex::decode(hex_sig).ok())
        .ok_or_else(|| BotError::Verification("Malformed signature header".to_string()))?;

    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .map_err(|e| BotError::Verification(format!("Failed to create HMAC: {e}")))?;
    mac.update(format!("v0:{timestamp}:{request_body}").as_bytes());

    mac.verify_slice(&provided)
        .map_err(|_| BotError::Verification("Signature mismatch".to_string()))
}

/// Computes the `v0=` signature Slack would send for `request_body`.
#[must_use]
pub fn compute_signature(timestamp: &str, request_body: &str, signing_secret: &str) -> String {
    let Ok(mut mac) = HmacSha256::new_from_slice(signing_secret.as_bytes()) else {
        return String::new();
    };
    mac.update(format!("v0:{timestamp}:{request_body}").as_bytes());
    format!("v0={}", hex::encode(mac.finalize().into_bytes()))
}
