use std::path::Path;

use crate::errors::BlogError;

const NAME_SUFFIX_LEN: usize = 7;

/// Maps an allowed image content type to the extension stored files get.
pub fn guess_format(content_type: Option<&str>) -> Option<&'static str> {
    let m = content_type?.parse::<mime::Mime>().ok()?;
    if m.type_() != mime::IMAGE {
        return None;
    }
    match m.subtype().as_str() {
        "jpeg" | "jpg" => Some("jpg"),
        "png" => Some("png"),
        "gif" => Some("gif"),
        "webp" => Some("webp"),
        _ => None,
    }
}

pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Checks the declared type against the allow-list and returns the extension.
pub fn validate_image_type(content_type: Option<&str>) -> Result<&'static str, BlogError> {
    let declared = content_type
        .and_then(|ct| ct.parse::<mime::Mime>().ok())
        .map(|m| m.essence_str().to_ascii_lowercase());
    let allowed = declared
        .as_deref()
        .map(|ct| crate::ALLOWED_IMAGE_TYPES.contains(&ct))
        .unwrap_or(false);
    if !allowed {
        return Err(BlogError::Validation(
            "Only JPG, PNG, GIF and WebP images are supported".into(),
        ));
    }
    guess_format(content_type).ok_or_else(|| BlogError::Validation("Unsupported image type".into()))
}

pub fn too_large(max_bytes: usize) -> BlogError {
    BlogError::Validation(format!(
        "Images may not be larger than {} MB",
        max_bytes / (1024 * 1024)
    ))
}

/// `<unix millis>-<7 random chars>.<ext>`
pub fn random_file_name(now_millis: i64, ext: &str) -> String {
    let suffix: String = std::iter::repeat_with(|| {
        let c = fastrand::alphanumeric();
        c.to_ascii_lowercase()
    })
    .take(NAME_SUFFIX_LEN)
    .collect();
    format!("{}-{}.{}", now_millis, suffix, ext)
}

/// Names that come from the URL must stay inside the upload directory.
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty() && !name.contains("..") && !name.contains('/') && !name.contains('\\')
}
