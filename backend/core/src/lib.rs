pub mod deadline;
pub mod envelope;
pub mod error;
pub mod traits;
pub mod types;

pub use deadline::call_with_deadline;
pub use envelope::{new_request_id, EnvelopeError, Outcome, ProcessResponse, ProcessStatus, Warnings};
pub use error::{
    ErrorCategory, OcrServiceError, PinyinServiceError, ProcessError, ProviderError,
    ValidationError,
};
pub use traits::{OcrProvider, PinyinProvider};
pub use types::{
    ImageFormat, OcrData, OcrSegment, PinyinData, PinyinSegment, ProcessData, ProcessWarning,
    RawOcrSegment, RawPinyinSegment, ValidatedImage,
};
