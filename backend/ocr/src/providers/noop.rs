use async_trait::async_trait;

use pinyinlens_core::{ImageFormat, OcrProvider, ProviderError, RawOcrSegment};

/// Stand-in used when no OCR backend is configured. Every call reports the
/// backend as unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpOcrProvider;

#[async_trait]
impl OcrProvider for NoOpOcrProvider {
    fn name(&self) -> &str {
        "noop"
    }

    async fn extract(
        &self,
        _image: &[u8],
        _content_type: ImageFormat,
    ) -> Result<Vec<RawOcrSegment>, ProviderError> {
        Err(ProviderError::Unavailable("OCR provider is not configured".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_unavailable() {
        let err = NoOpOcrProvider.extract(b"x", ImageFormat::Png).await.unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(_)));
    }
}
