//! Image upload validator.
//!
//! Checks run in a fixed order and stop at the first failure:
//! presence, MIME allow-list, byte size, full decode, pixel count.

use std::io::Cursor;

use image::{ImageError, ImageReader};
use tracing::debug;

use pinyinlens_core::{ValidatedImage, ValidationError};

use crate::mime_detect::parse_image_mime;

pub const DEFAULT_MAX_FILE_BYTES: u64 = 8 * 1024 * 1024;
pub const DEFAULT_MAX_IMAGE_PIXELS: u64 = 25_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    pub max_file_bytes: u64,
    pub max_image_pixels: u64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_image_pixels: DEFAULT_MAX_IMAGE_PIXELS,
        }
    }
}

/// Stateless validator; one instance is shared by all requests.
#[derive(Debug, Clone, Default)]
pub struct ImageValidator {
    limits: ValidationLimits,
}

impl ImageValidator {
    pub fn new(limits: ValidationLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> ValidationLimits {
        self.limits
    }

    /// Reject a body by its declared `Content-Length` before it is buffered.
    pub fn check_declared_length(&self, declared: Option<u64>) -> Result<(), ValidationError> {
        match declared {
            Some(len) if len > self.limits.max_file_bytes => {
                debug!(declared = len, max = self.limits.max_file_bytes, "Declared length over limit");
                Err(ValidationError::FileTooLarge)
            }
            _ => Ok(()),
        }
    }

    /// Validate an uploaded body against its declared content type.
    pub fn validate(
        &self,
        bytes: &[u8],
        declared_content_type: Option<&str>,
    ) -> Result<ValidatedImage, ValidationError> {
        if bytes.is_empty() {
            return Err(ValidationError::MissingFile);
        }

        let content_type = declared_content_type
            .and_then(parse_image_mime)
            .ok_or(ValidationError::InvalidMimeType)?;

        let size_bytes = bytes.len() as u64;
        if size_bytes > self.limits.max_file_bytes {
            return Err(ValidationError::FileTooLarge);
        }

        let (width, height) = decode_dimensions(bytes)?;

        let pixels = u64::from(width) * u64::from(height);
        if pixels > self.limits.max_image_pixels {
            debug!(width, height, max = self.limits.max_image_pixels, "Pixel count over limit");
            return Err(ValidationError::ImageTooLargePixels);
        }

        Ok(ValidatedImage {
            content_type,
            size_bytes,
            width,
            height,
        })
    }
}

/// Fully decode the image (not just the header) so truncated or corrupt
/// payloads are caught here rather than by the OCR backend.
fn decode_dimensions(bytes: &[u8]) -> Result<(u32, u32), ValidationError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| {
            debug!(error = %e, "Could not sniff image format");
            ValidationError::ImageDecodeFailed
        })?;

    if reader.format().is_none() {
        debug!("Unrecognised image signature");
        return Err(ValidationError::ImageDecodeFailed);
    }

    match reader.decode() {
        Ok(img) => Ok((img.width(), img.height())),
        // The decoder refused to allocate the frame: the image is too big, not corrupt.
        Err(ImageError::Limits(e)) => {
            debug!(error = %e, "Decoder allocation limit hit");
            Err(ValidationError::ImageTooLargePixels)
        }
        Err(e) => {
            debug!(error = %e, "Image decode failed");
            Err(ValidationError::ImageDecodeFailed)
        }
    }
}
