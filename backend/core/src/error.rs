use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Validation,
    Ocr,
    Pinyin,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::Ocr => "ocr",
            ErrorCategory::Pinyin => "pinyin",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error body of an `error` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessError {
    pub category: ErrorCategory,
    pub code: String,
    pub message: String,
}

/// Failure reported by an OCR or pinyin backend.
///
/// The detail string is for logs only and never reaches the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("provider execution failed: {0}")]
    Execution(String),
}

/// Upload rejected by the image validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No image was uploaded. Please take a photo or upload an image file.")]
    MissingFile,

    #[error("Unsupported file type. Please upload a JPG, PNG, or WEBP image.")]
    InvalidMimeType,

    #[error("Image is too large. Please upload a smaller file and try again.")]
    FileTooLarge,

    #[error("The uploaded file could not be read as an image. Please retake the photo.")]
    ImageDecodeFailed,

    #[error("Image dimensions are too large. Please capture a lower-resolution image.")]
    ImageTooLargePixels,
}

impl ValidationError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Validation
    }

    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingFile => "missing_file",
            ValidationError::InvalidMimeType => "invalid_mime_type",
            ValidationError::FileTooLarge => "file_too_large",
            ValidationError::ImageDecodeFailed => "image_decode_failed",
            ValidationError::ImageTooLargePixels => "image_too_large_pixels",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OcrServiceError {
    #[error("Text extraction is temporarily unavailable. Please try again.")]
    ProviderUnavailable,

    #[error("Text extraction encountered an error. Please try again.")]
    ExecutionFailed,

    #[error("No readable Chinese text was detected. Retake the photo and try again.")]
    NoTextDetected,
}

impl OcrServiceError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Ocr
    }

    pub fn code(&self) -> &'static str {
        match self {
            OcrServiceError::ProviderUnavailable => "ocr_provider_unavailable",
            OcrServiceError::ExecutionFailed => "ocr_execution_failed",
            OcrServiceError::NoTextDetected => "ocr_no_text_detected",
        }
    }
}

impl From<&ProviderError> for OcrServiceError {
    fn from(err: &ProviderError) -> Self {
        match err {
            ProviderError::Unavailable(_) => OcrServiceError::ProviderUnavailable,
            ProviderError::Execution(_) => OcrServiceError::ExecutionFailed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PinyinServiceError {
    #[error("Pinyin generation is temporarily unavailable. Please try again.")]
    ProviderUnavailable,

    #[error("Pinyin generation encountered an error. Please try again.")]
    ExecutionFailed,
}

impl PinyinServiceError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Pinyin
    }

    pub fn code(&self) -> &'static str {
        match self {
            PinyinServiceError::ProviderUnavailable => "pinyin_provider_unavailable",
            PinyinServiceError::ExecutionFailed => "pinyin_execution_failed",
        }
    }
}

impl From<&ProviderError> for PinyinServiceError {
    fn from(err: &ProviderError) -> Self {
        match err {
            ProviderError::Unavailable(_) => PinyinServiceError::ProviderUnavailable,
            ProviderError::Execution(_) => PinyinServiceError::ExecutionFailed,
        }
    }
}

macro_rules! impl_into_process_error {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for ProcessError {
                fn from(err: $ty) -> Self {
                    ProcessError {
                        category: err.category(),
                        code: err.code().to_string(),
                        message: err.to_string(),
                    }
                }
            }
        )+
    };
}

impl_into_process_error!(ValidationError, OcrServiceError, PinyinServiceError);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_codes_are_stable() {
        let codes: Vec<_> = [
            ValidationError::MissingFile,
            ValidationError::InvalidMimeType,
            ValidationError::FileTooLarge,
            ValidationError::ImageDecodeFailed,
            ValidationError::ImageTooLargePixels,
        ]
        .iter()
        .map(|e| e.code())
        .collect();
        assert_eq!(
            codes,
            vec![
                "missing_file",
                "invalid_mime_type",
                "file_too_large",
                "image_decode_failed",
                "image_too_large_pixels",
            ]
        );
    }

    #[test]
    fn provider_errors_map_per_stage() {
        let unavailable = ProviderError::Unavailable("not configured".into());
        let failed = ProviderError::Execution("boom".into());

        assert_eq!(OcrServiceError::from(&unavailable).code(), "ocr_provider_unavailable");
        assert_eq!(OcrServiceError::from(&failed).code(), "ocr_execution_failed");
        assert_eq!(PinyinServiceError::from(&unavailable).code(), "pinyin_provider_unavailable");
        assert_eq!(PinyinServiceError::from(&failed).code(), "pinyin_execution_failed");
    }

    #[test]
    fn process_error_carries_safe_message() {
        let err = ProcessError::from(OcrServiceError::NoTextDetected);
        assert_eq!(err.category, ErrorCategory::Ocr);
        assert_eq!(err.code, "ocr_no_text_detected");
        assert!(err.message.contains("Chinese text"));

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["category"], "ocr");
    }
}
