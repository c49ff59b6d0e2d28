//! MIME type handling for uploaded images.
//!
//! Only the declared `Content-Type` is consulted here; the bytes themselves are
//! checked by a full decode in the validator.

use std::path::Path;

use pinyinlens_core::ImageFormat;

/// Guess an upload content type from a file extension.
pub fn detect_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png"          => Some("image/png"),
        "webp"         => Some("image/webp"),
        _              => None,
    }
}

/// Reduce a `Content-Type` header value to its lowercase essence,
/// dropping parameters such as `; charset=binary`.
pub fn normalize_content_type(raw: &str) -> String {
    raw.split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Map a declared content type onto the allow-list.
pub fn parse_image_mime(raw: &str) -> Option<ImageFormat> {
    ImageFormat::from_mime(&normalize_content_type(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_by_extension() {
        assert_eq!(detect_mime_type(Path::new("menu.JPG")), Some("image/jpeg"));
        assert_eq!(detect_mime_type(Path::new("sign.webp")), Some("image/webp"));
        assert_eq!(detect_mime_type(Path::new("scan.tiff")), None);
        assert_eq!(detect_mime_type(Path::new("noext")), None);
    }

    #[test]
    fn strips_parameters_and_case() {
        assert_eq!(normalize_content_type(" Image/PNG ; charset=binary"), "image/png");
        assert_eq!(parse_image_mime("IMAGE/JPEG"), Some(ImageFormat::Jpeg));
    }

    #[test]
    fn rejects_formats_outside_allow_list() {
        assert_eq!(parse_image_mime("image/gif"), None);
        assert_eq!(parse_image_mime("image/jpg"), None);
        assert_eq!(parse_image_mime(""), None);
        assert_eq!(parse_image_mime("image/webp"), Some(ImageFormat::Webp));
    }
}
