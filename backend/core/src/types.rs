use std::fmt;

use serde::{Deserialize, Serialize};

/// Image encodings accepted by the process endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
}

impl ImageFormat {
    /// Canonical MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Webp => "image/webp",
        }
    }

    /// Look up a format from an already-normalised MIME essence
    /// (lowercase, no parameters).
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/jpeg" => Some(ImageFormat::Jpeg),
            "image/png" => Some(ImageFormat::Png),
            "image/webp" => Some(ImageFormat::Webp),
            _ => None,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// An upload that passed every validation check.
///
/// Only the validator constructs one; it lives for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedImage {
    pub content_type: ImageFormat,
    pub size_bytes: u64,
    pub width: u32,
    pub height: u32,
}

impl ValidatedImage {
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// A segment exactly as an OCR backend reported it. Nothing here is trusted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawOcrSegment {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl RawOcrSegment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: None,
            confidence: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// A normalised OCR segment: trimmed text, lowercase language tag
/// (`"und"` when unknown) and confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrSegment {
    pub text: String,
    pub language: String,
    pub confidence: f64,
}

/// One character and its reading, as returned by a pinyin backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPinyinSegment {
    pub hanzi: String,
    pub pinyin: String,
}

impl RawPinyinSegment {
    pub fn new(hanzi: impl Into<String>, pinyin: impl Into<String>) -> Self {
        Self {
            hanzi: hanzi.into(),
            pinyin: pinyin.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinyinSegment {
    pub hanzi: String,
    pub pinyin: String,
}

impl From<RawPinyinSegment> for PinyinSegment {
    fn from(raw: RawPinyinSegment) -> Self {
        Self {
            hanzi: raw.hanzi,
            pinyin: raw.pinyin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrData {
    pub segments: Vec<OcrSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinyinData {
    pub segments: Vec<PinyinSegment>,
}

/// Payload carried by `success` and `partial` envelopes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr: Option<OcrData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinyin: Option<PinyinData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
}

impl ProcessData {
    pub fn new(ocr: Vec<OcrSegment>, pinyin: Vec<PinyinSegment>) -> Self {
        Self {
            ocr: Some(OcrData { segments: ocr }),
            pinyin: Some(PinyinData { segments: pinyin }),
            message: None,
            job_id: None,
        }
    }
}

/// A non-fatal issue attached to a `partial` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessWarning {
    pub code: String,
    pub message: String,
}

impl ProcessWarning {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_format_mime_lookup() {
        assert_eq!(ImageFormat::from_mime("image/png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_mime("image/jpg"), None);
        assert_eq!(ImageFormat::Webp.mime_type(), "image/webp");
    }

    #[test]
    fn process_data_omits_absent_fields() {
        let data = ProcessData::new(vec![], vec![]);
        let json = serde_json::to_value(&data).unwrap();
        assert!(json.get("ocr").is_some());
        assert!(json.get("message").is_none());
        assert!(json.get("job_id").is_none());
    }

    #[test]
    fn raw_segment_tolerates_missing_fields() {
        let raw: RawOcrSegment = serde_json::from_str(r#"{"text":"你好"}"#).unwrap();
        assert_eq!(raw.language, None);
        assert_eq!(raw.confidence, None);
    }
}
