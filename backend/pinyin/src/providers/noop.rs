use async_trait::async_trait;

use pinyinlens_core::{PinyinProvider, ProviderError, RawPinyinSegment};

/// Stand-in used when pinyin generation is switched off.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpPinyinProvider;

#[async_trait]
impl PinyinProvider for NoOpPinyinProvider {
    fn name(&self) -> &str {
        "noop"
    }

    async fn generate(&self, _text: &str) -> Result<Vec<RawPinyinSegment>, ProviderError> {
        Err(ProviderError::Unavailable("Pinyin provider is not configured".into()))
    }
}
