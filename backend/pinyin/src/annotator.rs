use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use pinyinlens_core::{
    call_with_deadline, OcrSegment, PinyinProvider, PinyinSegment, PinyinServiceError,
};
use pinyinlens_logging::redact_sensitive_data;

/// Annotates OCR segments with per-character readings.
#[derive(Clone)]
pub struct PinyinAnnotator {
    provider: Arc<dyn PinyinProvider>,
    timeout: Option<Duration>,
}

impl PinyinAnnotator {
    pub fn new(provider: Arc<dyn PinyinProvider>) -> Self {
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

    /// Call the provider once per non-empty segment and concatenate the pairs
    /// in input order. An empty result is not an error.
    pub async fn annotate(
        &self,
        segments: &[OcrSegment],
    ) -> Result<Vec<PinyinSegment>, PinyinServiceError> {
        let mut pairs = Vec::new();

        for segment in segments.iter().filter(|s| !s.text.is_empty()) {
            let raw = call_with_deadline(self.timeout, self.provider.generate(&segment.text))
                .await
                .map_err(|e| {
                    warn!(
                        provider = self.provider.name(),
                        error = %redact_sensitive_data(&e.to_string()),
                        "Pinyin provider call failed"
                    );
                    PinyinServiceError::from(&e)
                })?;
            pairs.extend(raw.into_iter().map(PinyinSegment::from));
        }

        debug!(
            provider = self.provider.name(),
            segments = segments.len(),
            pairs = pairs.len(),
            "Pinyin annotation complete"
        );
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pinyinlens_core::{ProviderError, RawPinyinSegment};
    use std::sync::Mutex;

    /// Echoes each character with a numbered reading and records the texts it saw.
    #[derive(Default)]
    struct RecordingProvider {
        seen: Mutex<Vec<String>>,
        fail_with: Option<ProviderError>,
    }

    #[async_trait]
    impl PinyinProvider for RecordingProvider {
        fn name(&self) -> &str {
            "recording"
        }

        async fn generate(&self, text: &str) -> Result<Vec<RawPinyinSegment>, ProviderError> {
            self.seen.lock().unwrap().push(text.to_string());
            if let Some(err) = &self.fail_with {
                return Err(err.clone());
            }
            Ok(text
                .chars()
                .enumerate()
                .map(|(i, c)| RawPinyinSegment::new(c.to_string(), format!("r{i}")))
                .collect())
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl PinyinProvider for SlowProvider {
        fn name(&self) -> &str {
            "slow"
        }

        async fn generate(&self, text: &str) -> Result<Vec<RawPinyinSegment>, ProviderError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec![RawPinyinSegment::new(text, text)])
        }
    }

    fn segment(text: &str) -> OcrSegment {
        OcrSegment {
            text: text.to_string(),
            language: "zh".to_string(),
            confidence: 0.9,
        }
    }

    #[tokio::test]
    async fn returns_per_character_pairs() {
        let annotator = PinyinAnnotator::new(Arc::new(RecordingProvider::default()));
        let pairs = annotator.annotate(&[segment("你好")]).await.unwrap();
        let hanzi: Vec<_> = pairs.iter().map(|p| p.hanzi.as_str()).collect();
        assert_eq!(hanzi, vec!["你", "好"]);
    }

    #[tokio::test]
    async fn concatenates_segments_in_order() {
        let provider = Arc::new(RecordingProvider::default());
        let annotator = PinyinAnnotator::new(provider.clone());

        let pairs = annotator
            .annotate(&[segment("你好"), segment("世界")])
            .await
            .unwrap();

        let hanzi: String = pairs.iter().map(|p| p.hanzi.as_str()).collect();
        assert_eq!(hanzi, "你好世界");
        assert_eq!(pairs[2].pinyin, "r0");
        assert_eq!(*provider.seen.lock().unwrap(), vec!["你好", "世界"]);
    }

    #[tokio::test]
    async fn skips_empty_segments_without_calling_provider() {
        let provider = Arc::new(RecordingProvider::default());
        let annotator = PinyinAnnotator::new(provider.clone());

        let pairs = annotator.annotate(&[segment(""), segment("中")]).await.unwrap();

        assert_eq!(pairs.len(), 1);
        assert_eq!(*provider.seen.lock().unwrap(), vec!["中"]);
    }

    #[tokio::test]
    async fn no_input_is_empty_output() {
        let annotator = PinyinAnnotator::new(Arc::new(RecordingProvider::default()));
        assert!(annotator.annotate(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unavailable_provider() {
        let provider = RecordingProvider {
            fail_with: Some(ProviderError::Unavailable("off".into())),
            ..Default::default()
        };
        let err = PinyinAnnotator::new(Arc::new(provider))
            .annotate(&[segment("你好")])
            .await
            .unwrap_err();
        assert_eq!(err.code(), "pinyin_provider_unavailable");
    }

    #[tokio::test]
    async fn execution_failure_stops_at_first_segment() {
        let provider = Arc::new(RecordingProvider {
            fail_with: Some(ProviderError::Execution("bad table".into())),
            ..Default::default()
        });
        let err = PinyinAnnotator::new(provider.clone())
            .annotate(&[segment("你"), segment("好")])
            .await
            .unwrap_err();
        assert_eq!(err, PinyinServiceError::ExecutionFailed);
        assert_eq!(provider.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn timeout_maps_to_execution_failed() {
        let annotator = PinyinAnnotator::new(Arc::new(SlowProvider))
            .with_timeout(Some(Duration::from_millis(20)));
        let err = annotator.annotate(&[segment("你好")]).await.unwrap_err();
        assert_eq!(err, PinyinServiceError::ExecutionFailed);
        assert_eq!(err.code(), "pinyin_execution_failed");
    }
}
