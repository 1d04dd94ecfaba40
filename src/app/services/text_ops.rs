use std::path::Path;

/// Display name for a document stored at `path`.
///
/// Falls back to "Untitled" when the path has no usable file name.
pub fn extract_filename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != ".")
        .map(|s| s.to_string())
        .unwrap_or_else(|| "Untitled".to_string())
}

/// Number of whitespace-separated words, as shown in a document's info.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
