//! The process response envelope.
//!
//! The status/field invariant lives in the type: `Outcome` is a sum over the
//! three shapes, so a `success` envelope cannot hold an error and a `partial`
//! envelope cannot exist without warnings. The flat JSON form
//! (`status`, `request_id`, `data`, `warnings`, `error`) is produced and
//! parsed through [`WireEnvelope`], which applies the same rules on the way in.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::error::ProcessError;
use crate::types::{ProcessData, ProcessWarning};

/// Fresh random identifier for one request.
pub fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    Success,
    Partial,
    Error,
}

impl ProcessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessStatus::Success => "success",
            ProcessStatus::Partial => "partial",
            ProcessStatus::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("request_id must not be empty")]
    EmptyRequestId,

    #[error("partial envelope requires at least one warning")]
    EmptyWarnings,

    #[error("{status} envelope requires `{field}`")]
    MissingField { status: &'static str, field: &'static str },

    #[error("{status} envelope must not carry `{field}`")]
    UnexpectedField { status: &'static str, field: &'static str },
}

/// A non-empty list of warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warnings(Vec<ProcessWarning>);

impl Warnings {
    pub fn new(first: ProcessWarning) -> Self {
        Self(vec![first])
    }

    pub fn as_slice(&self) -> &[ProcessWarning] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<ProcessWarning> {
        self.0
    }
}

impl TryFrom<Vec<ProcessWarning>> for Warnings {
    type Error = EnvelopeError;

    fn try_from(warnings: Vec<ProcessWarning>) -> Result<Self, Self::Error> {
        if warnings.is_empty() {
            return Err(EnvelopeError::EmptyWarnings);
        }
        Ok(Self(warnings))
    }
}

/// Terminal result of one request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(ProcessData),
    Partial { data: ProcessData, warnings: Warnings },
    Error(ProcessError),
}

impl Outcome {
    pub fn status(&self) -> ProcessStatus {
        match self {
            Outcome::Success(_) => ProcessStatus::Success,
            Outcome::Partial { .. } => ProcessStatus::Partial,
            Outcome::Error(_) => ProcessStatus::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "WireEnvelope", try_from = "WireEnvelope")]
pub struct ProcessResponse {
    request_id: String,
    outcome: Outcome,
}

impl ProcessResponse {
    pub fn success(request_id: impl Into<String>, data: ProcessData) -> Self {
        Self {
            request_id: request_id.into(),
            outcome: Outcome::Success(data),
        }
    }

    pub fn partial(request_id: impl Into<String>, data: ProcessData, warnings: Warnings) -> Self {
        Self {
            request_id: request_id.into(),
            outcome: Outcome::Partial { data, warnings },
        }
    }

    pub fn error(request_id: impl Into<String>, error: impl Into<ProcessError>) -> Self {
        Self {
            request_id: request_id.into(),
            outcome: Outcome::Error(error.into()),
        }
    }

    pub fn status(&self) -> ProcessStatus {
        self.outcome.status()
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn data(&self) -> Option<&ProcessData> {
        match &self.outcome {
            Outcome::Success(data) | Outcome::Partial { data, .. } => Some(data),
            Outcome::Error(_) => None,
        }
    }

    pub fn warnings(&self) -> Option<&[ProcessWarning]> {
        match &self.outcome {
            Outcome::Partial { warnings, .. } => Some(warnings.as_slice()),
            _ => None,
        }
    }

    pub fn error_body(&self) -> Option<&ProcessError> {
        match &self.outcome {
            Outcome::Error(err) => Some(err),
            _ => None,
        }
    }
}

/// Flat JSON form of the envelope. Absent fields are omitted, never `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireEnvelope {
    status: ProcessStatus,
    request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<ProcessData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<ProcessWarning>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<ProcessError>,
}

impl From<ProcessResponse> for WireEnvelope {
    fn from(response: ProcessResponse) -> Self {
        let status = response.status();
        let (data, warnings, error) = match response.outcome {
            Outcome::Success(data) => (Some(data), None, None),
            Outcome::Partial { data, warnings } => (Some(data), Some(warnings.into_vec()), None),
            Outcome::Error(error) => (None, None, Some(error)),
        };
        WireEnvelope {
            status,
            request_id: response.request_id,
            data,
            warnings,
            error,
        }
    }
}

impl TryFrom<WireEnvelope> for ProcessResponse {
    type Error = EnvelopeError;

    fn try_from(wire: WireEnvelope) -> Result<Self, Self::Error> {
        if wire.request_id.is_empty() {
            return Err(EnvelopeError::EmptyRequestId);
        }
        let status = wire.status.as_str();
        let missing = |field| EnvelopeError::MissingField { status, field };
        let unexpected = |field| EnvelopeError::UnexpectedField { status, field };

        let outcome = match wire.status {
            ProcessStatus::Success => {
                if wire.warnings.is_some() {
                    return Err(unexpected("warnings"));
                }
                if wire.error.is_some() {
                    return Err(unexpected("error"));
                }
                Outcome::Success(wire.data.ok_or_else(|| missing("data"))?)
            }
            ProcessStatus::Partial => {
                if wire.error.is_some() {
                    return Err(unexpected("error"));
                }
                let data = wire.data.ok_or_else(|| missing("data"))?;
                let warnings = wire.warnings.ok_or_else(|| missing("warnings"))?;
                Outcome::Partial {
                    data,
                    warnings: Warnings::try_from(warnings)?,
                }
            }
            ProcessStatus::Error => {
                if wire.data.is_some() {
                    return Err(unexpected("data"));
                }
                if wire.warnings.is_some() {
                    return Err(unexpected("warnings"));
                }
                Outcome::Error(wire.error.ok_or_else(|| missing("error"))?)
            }
        };

        Ok(ProcessResponse {
            request_id: wire.request_id,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCategory, OcrServiceError};
    use crate::types::OcrSegment;
    use serde_json::{json, Value};

    fn sample_data() -> ProcessData {
        ProcessData::new(
            vec![OcrSegment {
                text: "你好".into(),
                language: "zh".into(),
                confidence: 0.88,
            }],
            vec![],
        )
    }

    fn all_shapes() -> Vec<ProcessResponse> {
        vec![
            ProcessResponse::success("req-1", sample_data()),
            ProcessResponse::partial(
                "req-2",
                sample_data(),
                Warnings::new(ProcessWarning::new("ocr-low-confidence", "Low confidence")),
            ),
            ProcessResponse::error("req-3", OcrServiceError::NoTextDetected),
        ]
    }

    #[test]
    fn constructed_envelopes_serialize_exclusive_fields() {
        for response in all_shapes() {
            let json = serde_json::to_value(&response).unwrap();
            let has = |key: &str| json.get(key).is_some();
            assert!(has("status") && has("request_id"));
            assert!(!has("payload"));
            match response.status() {
                ProcessStatus::Success => assert!(has("data") && !has("warnings") && !has("error")),
                ProcessStatus::Partial => assert!(has("data") && has("warnings") && !has("error")),
                ProcessStatus::Error => assert!(!has("data") && !has("warnings") && has("error")),
            }
            for value in json.as_object().unwrap().values() {
                assert!(!value.is_null());
            }
        }
    }

    #[test]
    fn wire_form_accepts_exactly_the_valid_combinations() {
        let data = serde_json::to_value(sample_data()).unwrap();
        let warnings = json!([{ "code": "w", "message": "m" }]);
        let error = json!({ "category": "ocr", "code": "ocr_execution_failed", "message": "m" });

        for status in ["success", "partial", "error"] {
            for mask in 0u8..8 {
                let mut obj = serde_json::Map::new();
                obj.insert("status".into(), Value::from(status));
                obj.insert("request_id".into(), Value::from("req"));
                let with_data = mask & 1 != 0;
                let with_warnings = mask & 2 != 0;
                let with_error = mask & 4 != 0;
                if with_data {
                    obj.insert("data".into(), data.clone());
                }
                if with_warnings {
                    obj.insert("warnings".into(), warnings.clone());
                }
                if with_error {
                    obj.insert("error".into(), error.clone());
                }

                let expected_ok = match status {
                    "success" => with_data && !with_warnings && !with_error,
                    "partial" => with_data && with_warnings && !with_error,
                    _ => !with_data && !with_warnings && with_error,
                };
                let parsed = serde_json::from_value::<ProcessResponse>(Value::Object(obj));
                assert_eq!(parsed.is_ok(), expected_ok, "status={status} mask={mask}");
            }
        }
    }

    #[test]
    fn partial_rejects_empty_warning_list() {
        let parsed = serde_json::from_value::<ProcessResponse>(json!({
            "status": "partial",
            "request_id": "req",
            "data": {},
            "warnings": [],
        }));
        assert!(parsed.is_err());
        assert_eq!(Warnings::try_from(Vec::<ProcessWarning>::new()), Err(EnvelopeError::EmptyWarnings));
    }

    #[test]
    fn legacy_payload_key_is_rejected() {
        let parsed = serde_json::from_value::<ProcessResponse>(json!({
            "status": "success",
            "request_id": "req",
            "data": {},
            "payload": { "message": "hi" },
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn request_ids_are_unique() {
        let a = new_request_id();
        let b = new_request_id();
        assert!(!a.is_empty());
        assert_ne!(a, b);
    }

    #[test]
    fn error_envelope_round_trips() {
        let response = ProcessResponse::error("req-9", OcrServiceError::ExecutionFailed);
        let text = serde_json::to_string(&response).unwrap();
        let back: ProcessResponse = serde_json::from_str(&text).unwrap();
        assert_eq!(back, response);
        let err = back.error_body().unwrap();
        assert_eq!(err.category, ErrorCategory::Ocr);
        assert!(back.data().is_none());
        assert!(back.warnings().is_none());
    }
}
