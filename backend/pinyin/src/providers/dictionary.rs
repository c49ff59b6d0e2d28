//! Dictionary-backed pinyin using the `pinyin` crate's embedded tables.

use async_trait::async_trait;
use pinyin::ToPinyin;
use tracing::debug;

use pinyinlens_core::{PinyinProvider, ProviderError, RawPinyinSegment};

/// Tone-marked readings, most common reading per character.
#[derive(Debug, Default, Clone, Copy)]
pub struct DictionaryPinyinProvider;

impl DictionaryPinyinProvider {
    pub fn new() -> Self {
        Self
    }
}

/// One pair per character; characters without a reading pass through as-is.
pub fn readings_for(text: &str) -> Vec<RawPinyinSegment> {
    text.chars()
        .map(|c| {
            let hanzi = c.to_string();
            let pinyin = match c.to_pinyin() {
                Some(reading) => reading.with_tone().to_string(),
                None => hanzi.clone(),
            };
            RawPinyinSegment { hanzi, pinyin }
        })
        .collect()
}

#[async_trait]
impl PinyinProvider for DictionaryPinyinProvider {
    fn name(&self) -> &str {
        "dictionary"
    }

    async fn generate(&self, text: &str) -> Result<Vec<RawPinyinSegment>, ProviderError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let owned = text.to_owned();
        let segments = tokio::task::spawn_blocking(move || readings_for(&owned))
            .await
            .map_err(|e| ProviderError::Execution(format!("pinyin lookup task failed: {e}")))?;
        debug!(chars = segments.len(), "Dictionary pinyin generated");
        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn per_character_readings() {
        let result = DictionaryPinyinProvider::new().generate("你好").await.unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0], RawPinyinSegment::new("你", "nǐ"));
        assert_eq!(result[1], RawPinyinSegment::new("好", "hǎo"));
    }

    #[tokio::test]
    async fn empty_text_yields_nothing() {
        assert!(DictionaryPinyinProvider.generate("").await.unwrap().is_empty());
    }

    #[test]
    fn non_chinese_passes_through() {
        assert_eq!(readings_for("A"), vec![RawPinyinSegment::new("A", "A")]);
        assert_eq!(
            readings_for("中1"),
            vec![RawPinyinSegment::new("中", "zhōng"), RawPinyinSegment::new("1", "1")]
        );
    }

    #[test]
    fn readings_carry_tone_marks() {
        let joined: String = readings_for("你好").into_iter().map(|s| s.pinyin).collect();
        assert!(joined.chars().any(|c| !c.is_ascii()));
    }
}
