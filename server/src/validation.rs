use genai_core::EncodedMedia;
use uuid::Uuid;

use crate::error::ApiError;

/// Maximum length for prompts and voice-over scripts
const MAX_TEXT_LENGTH: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Audio,
}

impl MediaKind {
    fn mime_prefix(&self) -> &'static str {
        match self {
            MediaKind::Image => "image/",
            MediaKind::Audio => "audio/",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            MediaKind::Image => "Reference image",
            MediaKind::Audio => "Reference audio",
        }
    }
}

fn validate_text(text: &str, what: &str) -> Result<(), ApiError> {
    if text.trim().is_empty() {
        return Err(ApiError::InvalidInput(format!("{what} cannot be empty")));
    }
    if text.chars().count() > MAX_TEXT_LENGTH {
        return Err(ApiError::InvalidInput(format!(
            "{what} too long (max {MAX_TEXT_LENGTH} characters)"
        )));
    }
    Ok(())
}

/// Validate an image prompt
pub fn validate_prompt(prompt: &str) -> Result<(), ApiError> {
    validate_text(prompt, "Prompt")
}

/// Validate a voice-over script
pub fn validate_speech_text(text: &str) -> Result<(), ApiError> {
    validate_text(text, "Text")
}

/// Thumbnails may be driven by the reference image alone, but not by nothing.
pub fn validate_thumbnail_request(prompt: &str, has_reference: bool) -> Result<(), ApiError> {
    if prompt.trim().is_empty() {
        if has_reference {
            return Ok(());
        }
        return Err(ApiError::InvalidInput(
            "Provide a prompt or a reference image".to_string(),
        ));
    }
    validate_prompt(prompt)
}

/// Parse an optional `data:` URI upload and check its type and decoded size.
pub fn parse_reference(
    uri: Option<&str>,
    kind: MediaKind,
    max_bytes: usize,
) -> Result<Option<EncodedMedia>, ApiError> {
    let Some(uri) = uri.filter(|u| !u.trim().is_empty()) else {
        return Ok(None);
    };

    let media = EncodedMedia::from_data_uri(uri)
        .map_err(|_| ApiError::InvalidInput(format!("{} must be a base64 data URI", kind.label())))?;

    if !media.mime_type().starts_with(kind.mime_prefix()) {
        return Err(ApiError::InvalidInput(format!(
            "{} has unsupported type {}",
            kind.label(),
            media.mime_type()
        )));
    }

    if media.decoded_len() > max_bytes {
        return Err(ApiError::InvalidInput(format!(
            "{} too large (max {} MB)",
            kind.label(),
            max_bytes / (1024 * 1024)
        )));
    }

    media
        .decode()
        .map_err(|_| ApiError::InvalidInput(format!("{} is not valid base64", kind.label())))?;

    Ok(Some(media))
}

/// Validate an audio handle id from the URL path
pub fn parse_handle_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::InvalidInput(format!("Invalid audio id: {id}")))
}
