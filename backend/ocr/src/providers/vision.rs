//! Vision-model OCR backend.
//!
//! Sends the image to an OpenAI-compatible chat-completions endpoint as a
//! base64 data URL and asks for the detected lines back as JSON.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use pinyinlens_core::{ImageFormat, OcrProvider, ProviderError, RawOcrSegment};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const OCR_PROMPT: &str = "Transcribe every line of text visible in this image. \
Reply with only a JSON array, one object per line in reading order: \
{\"text\": string, \"language\": BCP-47 tag or null, \"confidence\": number between 0 and 1}. \
Reply with [] if there is no text.";

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\s*```[a-zA-Z]*\s*(.*?)\s*```\s*$").unwrap());

pub struct VisionOcrProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl VisionOcrProvider {
    /// A blank key means the backend is not configured.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::Unavailable("vision OCR API key is not set".into()));
        }
        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct VisionLine {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VisionPayload {
    Lines(Vec<VisionLine>),
    Wrapped { lines: Vec<VisionLine> },
}

/// Parse the model's reply into raw segments. Lines without text are dropped.
pub fn parse_segments(content: &str) -> Result<Vec<RawOcrSegment>, ProviderError> {
    let body = CODE_FENCE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map_or(content, |m| m.as_str())
        .trim();

    let payload: VisionPayload = serde_json::from_str(body)
        .map_err(|e| ProviderError::Execution(format!("unparsable OCR reply: {e}")))?;

    let lines = match payload {
        VisionPayload::Lines(lines) | VisionPayload::Wrapped { lines } => lines,
    };

    Ok(lines
        .into_iter()
        .filter_map(|line| {
            let text = line.text.filter(|t| !t.is_empty())?;
            Some(RawOcrSegment {
                text,
                language: line.language,
                confidence: line.confidence,
            })
        })
        .collect())
}

fn transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_connect() {
        ProviderError::Unavailable(format!("vision OCR endpoint unreachable: {e}"))
    } else {
        ProviderError::Execution(format!("vision OCR request failed: {e}"))
    }
}

#[async_trait]
impl OcrProvider for VisionOcrProvider {
    fn name(&self) -> &str {
        "vision"
    }

    async fn extract(
        &self,
        image: &[u8],
        content_type: ImageFormat,
    ) -> Result<Vec<RawOcrSegment>, ProviderError> {
        info!(model = %self.model, bytes = image.len(), "[VisionOcr] Extracting text");
        let b64 = STANDARD.encode(image);
        let body = serde_json::json!({
            "model": self.model,
            "temperature": 0,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": OCR_PROMPT },
                    { "type": "image_url",
                      "image_url": { "url": format!("data:{};base64,{}", content_type.mime_type(), b64) } }
                ]
            }],
            "max_tokens": 2048
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Execution(format!(
                "vision OCR returned {status}: {detail}"
            )));
        }

        let chat: ChatResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Execution(format!("malformed vision OCR response: {e}")))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        let segments = parse_segments(&content)?;
        debug!(lines = segments.len(), "[VisionOcr] Reply parsed");
        Ok(segments)
    }
}
