//! OCR normaliser: calls the injected provider, normalises every segment and
//! keeps only those usable as Chinese text.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use pinyinlens_core::{
    call_with_deadline, ImageFormat, OcrProvider, OcrSegment, OcrServiceError,
};
use pinyinlens_logging::redact_sensitive_data;

use crate::normalize::{is_usable_chinese_segment, normalize_segment};

#[derive(Clone)]
pub struct OcrService {
    provider: Arc<dyn OcrProvider>,
    timeout: Option<Duration>,
}

impl OcrService {
    pub fn new(provider: Arc<dyn OcrProvider>) -> Self {
        Self {
            provider,
            timeout: None,
        }
    }

    /// Bound each provider call. `None` leaves it unbounded.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Extract the usable Chinese segments from an image.
    ///
    /// Fails with `NoTextDetected` when the provider succeeded but nothing
    /// survived normalisation and filtering.
    pub async fn extract(
        &self,
        image: &[u8],
        content_type: ImageFormat,
    ) -> Result<Vec<OcrSegment>, OcrServiceError> {
        let raw_segments = call_with_deadline(self.timeout, self.provider.extract(image, content_type))
            .await
            .map_err(|e| {
                warn!(
                    provider = self.provider.name(),
                    error = %redact_sensitive_data(&e.to_string()),
                    "OCR provider call failed"
                );
                OcrServiceError::from(&e)
            })?;

        let received = raw_segments.len();
        let usable: Vec<OcrSegment> = raw_segments
            .into_iter()
            .map(normalize_segment)
            .filter(is_usable_chinese_segment)
            .collect();

        debug!(
            provider = self.provider.name(),
            received,
            usable = usable.len(),
            "OCR segments normalised"
        );

        if usable.is_empty() {
            return Err(OcrServiceError::NoTextDetected);
        }
        Ok(usable)
    }
}
