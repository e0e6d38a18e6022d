use aws_sdk_s3::types::StorageClass;
use std::path::Path;

/// Per-object transfer metadata passed to S3 alongside the body.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMetadata {
    pub content_type: Option<&'static str>,
    pub cache_control: Option<&'static str>,
    pub storage_class: StorageClass,
}

/// Derive transfer metadata from a file's name and extension.
///
/// Everything goes to the standard storage tier. `index.html` is marked
/// `no-cache` so a redeployed site takes effect immediately; files with an
/// unrecognized extension get no Content-Type and S3 applies its default.
pub fn resolve_metadata(path: &Path) -> ObjectMetadata {
    let content_type = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(|e| content_type_for(&e.to_ascii_lowercase()));

    let cache_control = match path.file_name().and_then(|n| n.to_str()) {
        Some("index.html") => Some("no-cache"),
        _ => None,
    };

    ObjectMetadata {
        content_type,
        cache_control,
        storage_class: StorageClass::Standard,
    }
}

fn content_type_for(ext: &str) -> Option<&'static str> {
    match ext {
        // Web assets
        "html" => Some("text/html"),
        "css" => Some("text/css"),
        "js" => Some("application/javascript"),
        "json" => Some("application/json"),

        // Images
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "svg" => Some("image/svg+xml"),
        "ico" => Some("image/x-icon"),
        "webp" => Some("image/webp"),

        // Text and documents
        "txt" => Some("text/plain"),
        "md" => Some("text/markdown"),
        "xml" => Some("application/xml"),
        "pdf" => Some("application/pdf"),
        "zip" => Some("application/zip"),

        // Fonts
        "woff" => Some("font/woff"),
        "woff2" => Some("font/woff2"),
        "ttf" => Some("font/ttf"),
        "eot" => Some("application/vnd.ms-fontobject"),

        _ => None,
    }
}
