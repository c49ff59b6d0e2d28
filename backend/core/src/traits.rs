use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::{ImageFormat, RawOcrSegment, RawPinyinSegment};

/// A text-detection backend.
///
/// Implementations are shared by every in-flight request and must be safe to
/// call concurrently. Blocking work belongs on the blocking pool, not on the
/// async worker that called `extract`.
#[async_trait]
pub trait OcrProvider: Send + Sync {
    /// Provider name (e.g., "vision", "noop").
    fn name(&self) -> &str;

    /// Detect text lines in an encoded image.
    async fn extract(
        &self,
        image: &[u8],
        content_type: ImageFormat,
    ) -> Result<Vec<RawOcrSegment>, ProviderError>;
}

/// A character-to-reading backend.
#[async_trait]
pub trait PinyinProvider: Send + Sync {
    fn name(&self) -> &str;

    /// One entry per input character. Characters without a reading come back
    /// with `pinyin` equal to the character itself.
    async fn generate(&self, text: &str) -> Result<Vec<RawPinyinSegment>, ProviderError>;
}
