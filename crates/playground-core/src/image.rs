//! Inline image payloads attached to prompts.
//!
//! Images travel as `data:` URLs. They are validated here, before the
//! generator is ever called, so malformed uploads never leave the client.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use playground_types::{PlaygroundError, Result};

/// A self-describing image: explicit media type plus base64 data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub media_type: String,
    /// Base64 (standard alphabet) encoded bytes
    pub data: String,
}

impl ImagePayload {
    /// Parse and validate a `data:image/<subtype>;base64,<payload>` URL.
    pub fn parse(data_url: &str) -> Result<Self> {
        let rest = data_url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| invalid("Expected a data URL."))?;
        let (media_type, data) = rest
            .split_once(";base64,")
            .ok_or_else(|| invalid("Expected base64-encoded data."))?;

        let subtype = media_type
            .strip_prefix("image/")
            .ok_or_else(|| invalid(&format!("Unsupported media type '{}'.", media_type)))?;
        if subtype.is_empty() || !subtype.chars().all(is_subtype_char) {
            return Err(invalid(&format!("Unsupported media type '{}'.", media_type)));
        }

        if data.is_empty() {
            return Err(invalid("Image payload is empty."));
        }
        BASE64_STANDARD
            .decode(data)
            .map_err(|e| invalid(&format!("Payload is not valid base64: {}", e)))?;

        Ok(Self {
            media_type: media_type.to_string(),
            data: data.to_string(),
        })
    }

    /// Encode raw image bytes, e.g. from a dropped file.
    pub fn from_bytes(media_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            media_type: media_type.into(),
            data: BASE64_STANDARD.encode(bytes),
        }
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// Best-effort media type for an uploaded file name.
pub fn media_type_for_file(name: &str) -> Option<&'static str> {
    let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

fn is_subtype_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-' | '.')
}

fn invalid(reason: &str) -> PlaygroundError {
    PlaygroundError::InvalidImage(reason.to_string())
}
