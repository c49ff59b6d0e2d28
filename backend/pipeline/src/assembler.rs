//! Response assembler.
//!
//! Runs `Validating -> ExtractingOcr -> AnnotatingPinyin` and turns the first
//! failure into an `error` envelope. A pinyin failure after a successful OCR
//! still fails the whole request; no stage degrades to `partial`.

use bytes::Bytes;
use tracing::{debug, info, info_span, warn, Instrument};

use pinyinlens_core::{
    new_request_id, ProcessData, ProcessError, ProcessResponse, ValidatedImage, ValidationError,
};
use pinyinlens_media::ImageValidator;
use pinyinlens_ocr::OcrService;
use pinyinlens_pinyin::PinyinAnnotator;

use crate::stage::Stage;

/// One upload, owned by the request that carries it.
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    pub request_id: String,
    pub body: Bytes,
    pub content_type: Option<String>,
}

impl ProcessRequest {
    /// Wrap an upload under a fresh request id.
    pub fn new(body: impl Into<Bytes>, content_type: Option<String>) -> Self {
        Self {
            request_id: new_request_id(),
            body: body.into(),
            content_type,
        }
    }
}

/// Composition of the three stages. Providers arrive already chosen; nothing
/// here reads configuration or global state.
#[derive(Clone)]
pub struct ResponseAssembler {
    validator: ImageValidator,
    ocr: OcrService,
    pinyin: PinyinAnnotator,
}

impl ResponseAssembler {
    pub fn new(validator: ImageValidator, ocr: OcrService, pinyin: PinyinAnnotator) -> Self {
        Self {
            validator,
            ocr,
            pinyin,
        }
    }

    pub fn validator(&self) -> &ImageValidator {
        &self.validator
    }

    /// Envelope for a body whose declared length is already over the limit,
    /// so the caller can answer without buffering it.
    pub fn reject_declared_length(
        &self,
        request_id: &str,
        declared: Option<u64>,
    ) -> Option<ProcessResponse> {
        let err: ValidationError = self.validator.check_declared_length(declared).err()?;
        warn!(
            request_id,
            stage = %Stage::Validating,
            code = err.code(),
            "Rejected upload by declared length"
        );
        Some(ProcessResponse::error(request_id, err))
    }

    /// Run the full pipeline. Always yields exactly one envelope.
    pub async fn process(&self, request: ProcessRequest) -> ProcessResponse {
        let span = info_span!("process", request_id = %request.request_id);
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: ProcessRequest) -> ProcessResponse {
        let ProcessRequest {
            request_id,
            body,
            content_type,
        } = request;

        match self.run_stages(body, content_type).await {
            Ok(data) => {
                info!(
                    status = "success",
                    ocr_segments = data.ocr.as_ref().map_or(0, |o| o.segments.len()),
                    pinyin_segments = data.pinyin.as_ref().map_or(0, |p| p.segments.len()),
                    "Request processed"
                );
                ProcessResponse::success(request_id, data)
            }
            Err((stage, error)) => {
                warn!(
                    status = "error",
                    stage = %stage,
                    category = %error.category,
                    code = %error.code,
                    "Request failed"
                );
                ProcessResponse::error(request_id, error)
            }
        }
    }

    async fn run_stages(
        &self,
        body: Bytes,
        content_type: Option<String>,
    ) -> Result<ProcessData, (Stage, ProcessError)> {
        let fail = |stage: Stage| move |err: ProcessError| (stage, err);

        debug!(stage = %Stage::Validating, bytes = body.len());
        let image = self
            .validate_on_blocking_pool(body.clone(), content_type)
            .await
            .map_err(ProcessError::from)
            .map_err(fail(Stage::Validating))?;

        debug!(
            stage = %Stage::ExtractingOcr,
            provider = self.ocr.provider_name(),
            width = image.width,
            height = image.height
        );
        let segments = self
            .ocr
            .extract(&body, image.content_type)
            .await
            .map_err(ProcessError::from)
            .map_err(fail(Stage::ExtractingOcr))?;

        debug!(
            stage = %Stage::AnnotatingPinyin,
            provider = self.pinyin.provider_name(),
            segments = segments.len()
        );
        let pinyin = self
            .pinyin
            .annotate(&segments)
            .await
            .map_err(ProcessError::from)
            .map_err(fail(Stage::AnnotatingPinyin))?;

        debug!(stage = %Stage::Assembled);
        Ok(ProcessData::new(segments, pinyin))
    }

    /// Full decode is CPU-bound and runs on the blocking pool.
    async fn validate_on_blocking_pool(
        &self,
        body: Bytes,
        content_type: Option<String>,
    ) -> Result<ValidatedImage, ValidationError> {
        let validator = self.validator.clone();
        tokio::task::spawn_blocking(move || validator.validate(&body, content_type.as_deref()))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Image validation task failed");
                Err(ValidationError::ImageDecodeFailed)
            })
    }
}
