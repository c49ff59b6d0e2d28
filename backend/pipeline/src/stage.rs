use std::fmt;

/// Where a request is in the pipeline. Stages only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    ExtractingOcr,
    AnnotatingPinyin,
    Assembled,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validating => "validating",
            Stage::ExtractingOcr => "extracting_ocr",
            Stage::AnnotatingPinyin => "annotating_pinyin",
            Stage::Assembled => "assembled",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
