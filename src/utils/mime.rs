//! MIME utilities shared across modules

/// Image types the Claude models accept as base64 content blocks.
pub const SUPPORTED_IMAGE_MIME: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Lowercases, strips parameters and folds `image/jpg` into `image/jpeg`.
#[must_use]
pub fn canonicalize_mime(mime: &str) -> String {
    let main = mime
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    match main.as_str() {
        "image/jpg" => "image/jpeg".to_string(),
        other => other.to_string(),
    }
}

/// Returns whether a given MIME type is supported for model image input.
#[must_use]
pub fn is_supported_image_mime(mime: &str) -> bool {
    let canon = canonicalize_mime(mime);
    SUPPORTED_IMAGE_MIME.contains(&canon.as_str())
}

/// Best guess from a URL path when Slack gives no mimetype.
#[must_use]
pub fn guess_from_path(path: &str) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
