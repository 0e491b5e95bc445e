//! Turns transcript image lines into base64 content blocks.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, info, warn};
use url::Url;

use crate::ai::prompt::MAX_IMAGES;
use crate::core::models::{EncodedImage, Transcript, TranscriptLine};
use crate::errors::BotError;
use crate::slack::ChatPlatform;
use crate::utils::mime::{canonicalize_mime, is_supported_image_mime};

/// Extracts the `pub_secret` from a Slack public permalink.
///
/// Public permalinks carry it either as a query parameter or as the last
/// hyphen-separated part of the path, e.g. `https://slack-files.com/T1-F1-<secret>`.
#[must_use]
pub fn pub_secret(permalink_public: &str) -> Option<String> {
    let url = Url::parse(permalink_public).ok()?;

    if let Some(secret) = url
        .query_pairs()
        .find(|(k, _)| k == "pub_secret")
        .map(|(_, v)| v.to_string())
    {
        return Some(secret);
    }

    url.path_segments()
        .and_then(|mut segs| segs.next_back().map(ToString::to_string))
        .and_then(|last| last.rsplit('-').next().map(ToString::to_string))
        .filter(|s| !s.is_empty())
}

/// Direct asset URL: the private download URL with the permalink's `pub_secret` attached.
///
/// # Errors
///
/// Returns `BotError::AttachmentResolve` when either URL is unusable.
pub fn public_asset_url(download_url: &str, permalink_public: &str) -> Result<String, BotError> {
    let secret = pub_secret(permalink_public).ok_or_else(|| {
        BotError::AttachmentResolve("pub_secret missing in permalink_public".to_string())
    })?;

    let mut direct = Url::parse(download_url)
        .map_err(|e| BotError::AttachmentResolve(format!("Invalid download URL: {e}")))?;
    direct.set_query(Some(&format!("pub_secret={secret}")));
    Ok(direct.to_string())
}

/// Resolves one image: file metadata, public link, download, base64.
///
/// # Errors
///
/// Any failure is reported as `BotError::AttachmentResolve`.
pub async fn resolve_image(
    chat: &dyn ChatPlatform,
    line: &TranscriptLine,
    max_bytes: usize,
) -> Result<EncodedImage, BotError> {
    let TranscriptLine::Image {
        file_id,
        media_type,
        url,
        ..
    } = line
    else {
        return Err(BotError::AttachmentResolve(
            "transcript line is not an image".to_string(),
        ));
    };

    let info = chat
        .file_info(file_id)
        .await
        .map_err(|e| BotError::AttachmentResolve(format!("files.info for {file_id}: {e}")))?;

    let media_type = canonicalize_mime(info.mimetype.as_deref().unwrap_or(media_type));
    if !is_supported_image_mime(&media_type) {
        return Err(BotError::AttachmentResolve(format!(
            "unsupported image type {media_type} for {file_id}"
        )));
    }

    let permalink = if info.public_url_shared {
        info.permalink_public.clone()
    } else {
        chat.share_public_url(file_id)
            .await
            .map_err(|e| {
                BotError::AttachmentResolve(format!("files.sharedPublicURL for {file_id}: {e}"))
            })?
            .or_else(|| info.permalink_public.clone())
    }
    .ok_or_else(|| BotError::AttachmentResolve(format!("no public permalink for {file_id}")))?;

    let download_url = info.download_url.as_deref().unwrap_or(url);
    let direct = public_asset_url(download_url, &permalink)?;
    debug!(file_id = %file_id, media_type = %media_type, "Downloading public image");

    let bytes = chat
        .download_file(&direct, max_bytes)
        .await
        .map_err(|e| BotError::AttachmentResolve(format!("download of {file_id}: {e}")))?;

    Ok(EncodedImage {
        media_type,
        data: STANDARD.encode(bytes),
    })
}

/// Resolves every image line of `transcript`, dropping the ones that fail.
pub async fn resolve_images(
    chat: &dyn ChatPlatform,
    transcript: &Transcript,
    max_bytes: usize,
) -> Vec<EncodedImage> {
    let mut images = Vec::new();

    for line in transcript.images() {
        if images.len() == MAX_IMAGES {
            info!("Image cap of {} reached, skipping remaining images", MAX_IMAGES);
            break;
        }

        match resolve_image(chat, line, max_bytes).await {
            Ok(image) => images.push(image),
            Err(e) => warn!("Skipping image: {}", e),
        }
    }

    images
}
