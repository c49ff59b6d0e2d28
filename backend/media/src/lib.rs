//! Upload validation for the process endpoint.

pub mod mime_detect;
pub mod validator;

pub use mime_detect::{detect_mime_type, normalize_content_type, parse_image_mime};
pub use validator::{ImageValidator, ValidationLimits, DEFAULT_MAX_FILE_BYTES, DEFAULT_MAX_IMAGE_PIXELS};
