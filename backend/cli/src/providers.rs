//! Composition root: the only place providers are chosen.

use std::sync::Arc;

use tracing::{info, warn};

use pinyinlens_core::{OcrProvider, PinyinProvider};
use pinyinlens_media::ImageValidator;
use pinyinlens_ocr::{NoOpOcrProvider, OcrService, VisionOcrProvider};
use pinyinlens_pinyin::{DictionaryPinyinProvider, NoOpPinyinProvider, PinyinAnnotator};
use pinyinlens_pipeline::ResponseAssembler;

use crate::config::Config;

pub fn build_ocr_provider(config: &Config) -> Arc<dyn OcrProvider> {
    match config.ocr_provider.as_deref() {
        Some("vision") => {
            let key = config.ocr_api_key.clone().unwrap_or_default();
            match VisionOcrProvider::new(key) {
                Ok(provider) => {
                    let provider = provider
                        .with_base_url(&config.ocr_base_url)
                        .with_model(&config.ocr_model);
                    info!(model = %provider.model(), "Registered vision OCR provider");
                    Arc::new(provider)
                }
                Err(e) => {
                    warn!(error = %e, "Vision OCR selected but not usable; OCR disabled");
                    Arc::new(NoOpOcrProvider)
                }
            }
        }
        Some(other) => {
            warn!(provider = other, "Unknown OCR provider; OCR disabled");
            Arc::new(NoOpOcrProvider)
        }
        None => {
            info!("No OCR provider configured");
            Arc::new(NoOpOcrProvider)
        }
    }
}

pub fn build_pinyin_provider(config: &Config) -> Arc<dyn PinyinProvider> {
    if config.pinyin_provider == "dictionary" {
        info!("Registered dictionary pinyin provider");
        Arc::new(DictionaryPinyinProvider::new())
    } else {
        warn!(provider = %config.pinyin_provider, "Pinyin provider disabled");
        Arc::new(NoOpPinyinProvider)
    }
}

pub fn build_assembler(config: &Config) -> ResponseAssembler {
    let timeout = config.provider_timeout();
    ResponseAssembler::new(
        ImageValidator::new(config.validation_limits()),
        OcrService::new(build_ocr_provider(config)).with_timeout(timeout),
        PinyinAnnotator::new(build_pinyin_provider(config)).with_timeout(timeout),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_noop_ocr_and_dictionary_pinyin() {
        let config = Config::default();
        assert_eq!(build_ocr_provider(&config).name(), "noop");
        assert_eq!(build_pinyin_provider(&config).name(), "dictionary");
    }

    #[test]
    fn vision_without_key_falls_back_to_noop() {
        let config = Config {
            ocr_provider: Some("vision".into()),
            ..Config::default()
        };
        assert_eq!(build_ocr_provider(&config).name(), "noop");
    }

    #[test]
    fn vision_with_key_is_selected() {
        let config = Config {
            ocr_provider: Some("vision".into()),
            ocr_api_key: Some("sk-test".into()),
            ..Config::default()
        };
        assert_eq!(build_ocr_provider(&config).name(), "vision");
    }

    #[test]
    fn unknown_pinyin_provider_is_noop() {
        let config = Config {
            pinyin_provider: "pypinyin".into(),
            ..Config::default()
        };
        assert_eq!(build_pinyin_provider(&config).name(), "noop");
    }

    #[test]
    fn assembler_uses_configured_limits() {
        let config = Config {
            max_file_bytes: 1024,
            ..Config::default()
        };
        assert_eq!(build_assembler(&config).validator().limits().max_file_bytes, 1024);
    }
}
