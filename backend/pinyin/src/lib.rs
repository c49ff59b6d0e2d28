//! Pinyin stage: per-character readings for every OCR segment.

pub mod annotator;
pub mod providers;

pub use annotator::PinyinAnnotator;
pub use providers::{dictionary::DictionaryPinyinProvider, noop::NoOpPinyinProvider};
