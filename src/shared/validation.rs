use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationErrors;

use crate::shared::constants::ALLOWED_DOCUMENT_EXTENSIONS;

lazy_static! {
    /// Runs of characters that are not safe inside an object key
    /// - "surat permohonan (1).pdf" -> "surat_permohonan_1_.pdf"
    static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._-]+").unwrap();
}

const MAX_FILENAME_LEN: usize = 120;
const FALLBACK_FILENAME: &str = "dokumen";

/// Reduce an uploaded filename to a key-safe form, keeping its extension
pub fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(base, "_");
    let cleaned = cleaned.trim_start_matches(['.', '_']);

    if cleaned.is_empty() {
        return FALLBACK_FILENAME.to_string();
    }

    if cleaned.len() <= MAX_FILENAME_LEN {
        return cleaned.to_string();
    }

    // Keep the tail so the extension survives truncation; the string is ASCII here
    cleaned[cleaned.len() - MAX_FILENAME_LEN..].to_string()
}

/// Lowercased extension, if any
pub fn file_extension(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

pub fn is_allowed_document(name: &str) -> bool {
    file_extension(name).is_some_and(|ext| ALLOWED_DOCUMENT_EXTENSIONS.contains(&ext.as_str()))
}

/// Object name for an upload: `{unix_millis}_{sanitized name}`
pub fn timestamped_object_name(unix_millis: i64, original: &str) -> String {
    format!("{}_{}", unix_millis, sanitize_file_name(original))
}

/// Flatten validator output into one operator-readable line
pub fn describe_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} tidak valid", field))
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}
