//! OCR stage: provider invocation, segment normalisation and the
//! Chinese-text usability filter.

pub mod normalize;
pub mod providers;
pub mod service;

pub use normalize::{
    contains_cjk, is_usable_chinese_segment, normalize_confidence, normalize_language,
    normalize_segment,
};
pub use providers::{noop::NoOpOcrProvider, vision::VisionOcrProvider};
pub use service::OcrService;
