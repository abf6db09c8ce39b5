//! Vision backend trait and request types.
//!
//! Defines the interface the dispatcher talks to, so the wire protocol
//! can be swapped (or mocked in tests) without touching the curation loop.

use crate::error::CurationResult;
use async_trait::async_trait;
use base64::Engine;
use std::time::Duration;

/// Base64-encoded image ready to send to the inference service.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub media_type: String,
}

impl ImageInput {
    /// Create an `ImageInput` from raw bytes and format string.
    ///
    /// The format is the image format identifier (e.g., "jpeg", "png", "webp").
    pub fn from_bytes(bytes: &[u8], format: &str) -> Self {
        let media_type = match format {
            "jpeg" | "jpg" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            "gif" => "image/gif",
            other => {
                tracing::warn!("Unknown image format '{other}', defaulting to image/jpeg");
                "image/jpeg"
            }
        };

        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: media_type.to_string(),
        }
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// One completion attempt against the inference service.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// The image to describe
    pub image: ImageInput,
    /// Text prompt for the model
    pub prompt: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
}

/// Trait implemented by inference-service backends.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the dispatcher holds a `Box<dyn VisionBackend>` for dynamic dispatch).
#[async_trait]
pub trait VisionBackend: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Run one completion attempt and return the generated text.
    ///
    /// A response that lacks the expected completion text must surface as
    /// `CurationError::RateLimited`; transport failures as
    /// `CurationError::Http`.
    async fn complete(&self, request: &CompletionRequest) -> CurationResult<String>;

    /// Per-request timeout for this backend.
    fn timeout(&self) -> Duration;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_input_from_bytes_jpeg() {
        let input = ImageInput::from_bytes(&[0xFF, 0xD8, 0xFF], "jpeg");
        assert_eq!(input.media_type, "image/jpeg");
        assert!(!input.data.is_empty());
    }

    #[test]
    fn test_image_input_from_bytes_png() {
        let input = ImageInput::from_bytes(&[0x89, 0x50, 0x4E, 0x47], "png");
        assert_eq!(input.media_type, "image/png");
    }

    #[test]
    fn test_image_input_unknown_format_defaults_to_jpeg() {
        let input = ImageInput::from_bytes(&[1, 2, 3], "tiff");
        assert_eq!(input.media_type, "image/jpeg");
    }

    #[test]
    fn test_image_input_data_url() {
        let input = ImageInput::from_bytes(&[1, 2, 3], "jpeg");
        let url = input.data_url();
        assert!(url.starts_with("data:image/jpeg;base64,"));
    }
}
