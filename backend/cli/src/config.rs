use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use pinyinlens_logging::LogFormat;
use pinyinlens_media::{ValidationLimits, DEFAULT_MAX_FILE_BYTES, DEFAULT_MAX_IMAGE_PIXELS};
use pinyinlens_ocr::providers::vision::{DEFAULT_BASE_URL, DEFAULT_MODEL};

const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:5173", "http://127.0.0.1:5173"];

/// pinyinlens runtime configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    #[serde(skip)]
    pub log_format: LogFormat,
    /// Directory for rolling NDJSON logs; console only when unset
    pub log_dir: Option<PathBuf>,

    pub max_file_bytes: u64,
    pub max_image_pixels: u64,
    /// Per provider call; 0 disables the bound
    pub provider_timeout_secs: u64,

    // OCR
    pub ocr_provider: Option<String>,
    pub ocr_api_key: Option<String>,
    pub ocr_base_url: String,
    pub ocr_model: String,

    // Pinyin
    pub pinyin_provider: String,

    pub cors_allow_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8000,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            log_dir: None,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_image_pixels: DEFAULT_MAX_IMAGE_PIXELS,
            provider_timeout_secs: 30,
            ocr_provider: None,
            ocr_api_key: None,
            ocr_base_url: DEFAULT_BASE_URL.to_string(),
            ocr_model: DEFAULT_MODEL.to_string(),
            pinyin_provider: "dictionary".to_string(),
            cors_allow_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary lookup (useful for testing).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            bind_address: var("PINYINLENS_BIND").unwrap_or(defaults.bind_address),
            port: var("PINYINLENS_PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),
            log_level: var("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: var("PINYINLENS_LOG_FORMAT")
                .and_then(|f| f.parse().ok())
                .unwrap_or(defaults.log_format),
            log_dir: var("PINYINLENS_LOG_DIR").map(PathBuf::from),
            max_file_bytes: var("MAX_FILE_SIZE_BYTES")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.max_file_bytes),
            max_image_pixels: var("MAX_IMAGE_PIXELS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.max_image_pixels),
            provider_timeout_secs: var("PROVIDER_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.provider_timeout_secs),
            ocr_provider: var("OCR_PROVIDER").map(|p| p.trim().to_lowercase()),
            ocr_api_key: var("OCR_API_KEY").or_else(|| var("OPENAI_API_KEY")),
            ocr_base_url: var("OCR_BASE_URL").unwrap_or(defaults.ocr_base_url),
            ocr_model: var("OCR_MODEL").unwrap_or(defaults.ocr_model),
            pinyin_provider: var("PINYIN_PROVIDER")
                .map(|p| p.trim().to_lowercase())
                .unwrap_or(defaults.pinyin_provider),
            cors_allow_origins: var("CORS_ALLOW_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or(defaults.cors_allow_origins),
        }
    }

    pub fn validation_limits(&self) -> ValidationLimits {
        ValidationLimits {
            max_file_bytes: self.max_file_bytes,
            max_image_pixels: self.max_image_pixels,
        }
    }

    pub fn provider_timeout(&self) -> Option<Duration> {
        (self.provider_timeout_secs > 0).then(|| Duration::from_secs(self.provider_timeout_secs))
    }

    /// Copy safe to print or log.
    pub fn redacted(&self) -> Self {
        Self {
            ocr_api_key: self.ocr_api_key.as_ref().map(|_| "[REDACTED]".to_string()),
            ..self.clone()
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
