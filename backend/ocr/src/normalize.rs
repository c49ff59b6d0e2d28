use pinyinlens_core::{OcrSegment, RawOcrSegment};

/// Language tag used when the backend reports none.
pub const UNDETERMINED_LANGUAGE: &str = "und";

/// CJK Unified Ideographs Extension A through the end of the main block.
const CJK_RANGE: std::ops::RangeInclusive<char> = '\u{3400}'..='\u{9FFF}';

/// Map a backend confidence onto `[0, 1]`.
///
/// Missing values become 0. Values in `(1, 100]` are read as percentages.
pub fn normalize_confidence(confidence: Option<f64>) -> f64 {
    let Some(mut value) = confidence else {
        return 0.0;
    };
    if value.is_nan() {
        return 0.0;
    }
    if value > 1.0 && value <= 100.0 {
        value /= 100.0;
    }
    value.clamp(0.0, 1.0)
}

/// Trimmed, lowercased language tag; blank or missing becomes `"und"`.
pub fn normalize_language(language: Option<&str>) -> String {
    let value = language.unwrap_or(UNDETERMINED_LANGUAGE).trim().to_lowercase();
    if value.is_empty() {
        UNDETERMINED_LANGUAGE.to_string()
    } else {
        value
    }
}

pub fn normalize_segment(raw: RawOcrSegment) -> OcrSegment {
    OcrSegment {
        text: raw.text.trim().to_string(),
        language: normalize_language(raw.language.as_deref()),
        confidence: normalize_confidence(raw.confidence),
    }
}

pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(|c| CJK_RANGE.contains(&c))
}

/// A segment is usable when it has text and either contains ideographs or is
/// tagged as Chinese.
pub fn is_usable_chinese_segment(segment: &OcrSegment) -> bool {
    !segment.text.is_empty() && (contains_cjk(&segment.text) || segment.language.starts_with("zh"))
}
