//! Media file naming utilities.

use crate::fs::naming::{sanitize_file_name, DEFAULT_ATTACHMENT_NAME};

/// Derive the local file name of a link.
///
/// An explicit title wins; otherwise the last path segment of the URL is
/// used. Whitespace becomes `_` and illegal characters are replaced.
pub fn derive_file_name(title: Option<&str>, url: &str) -> String {
    match title.filter(|t| !t.is_empty()) {
        Some(title) => sanitize_file_name(title),
        None => sanitize_file_name(&file_name_from_url(url)),
    }
}

/// Last path segment of a URL, without query string or fragment.
pub fn file_name_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segment = path.trim_end_matches('/').rsplit('/').next().unwrap_or("");

    if segment.is_empty() || segment.ends_with(':') {
        DEFAULT_ATTACHMENT_NAME.to_string()
    } else {
        segment.to_string()
    }
}

/// Rename an attachment to carry the extension implied by the content type
/// the server reported: `<name before first dot>.<ext>`.
///
/// Without a usable content type the name is kept.
pub fn corrected_file_name(file_name: &str, content_type: Option<&str>) -> String {
    let Some(ext) = content_type.and_then(mime_to_extension) else {
        return file_name.to_string();
    };

    let base = file_name.split('.').next().unwrap_or("");
    let base = if base.is_empty() {
        DEFAULT_ATTACHMENT_NAME
    } else {
        base
    };

    format!("{}.{}", base, ext)
}

/// Convert a MIME type (parameters allowed) to a file extension.
pub fn mime_to_extension(content_type: &str) -> Option<String> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    let known = match essence.as_str() {
        // Images
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/svg+xml" => Some("svg"),
        "image/avif" => Some("avif"),

        // Videos
        "video/mp4" => Some("mp4"),
        "video/webm" => Some("webm"),
        "video/quicktime" => Some("mov"),

        // Audio
        "audio/mpeg" => Some("mp3"),
        "audio/mp4" => Some("m4a"),
        "audio/ogg" => Some("ogg"),
        "audio/wav" => Some("wav"),

        "application/octet-stream" => Some("bin"),
        _ => None,
    };
    if let Some(ext) = known {
        return Some(ext.to_string());
    }

    if let Some(ext) = mime_guess::get_mime_extensions_str(&essence).and_then(|exts| exts.first()) {
        return Some(ext.to_string());
    }

    // Unregistered types fall back to their subtype.
    let subtype = essence.split_once('/').map(|(_, sub)| sub)?;
    if !subtype.is_empty()
        && subtype
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        Some(subtype.to_string())
    } else {
        None
    }
}
