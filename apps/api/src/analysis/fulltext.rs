//! Manuscript full-text handling: decoding uploaded files and bounding what reaches the model.

use axum::body::Bytes;
use tracing::{debug, warn};

use crate::errors::AppError;

/// Only this many characters of the full text are ever sent to the model.
pub const MAX_FULL_TEXT_CHARS: usize = 3000;

/// Returns the first `max_chars` characters of `text` without splitting a character.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Decodes an uploaded manuscript file into text, bounded to `MAX_FULL_TEXT_CHARS`.
///
/// `.pdf` files go through text extraction; anything else is read as UTF-8
/// (invalid sequences are replaced rather than rejected).
pub fn extract_full_text(file_name: &str, bytes: &[u8]) -> Result<String, AppError> {
    let is_pdf = file_name.to_lowercase().ends_with(".pdf") || bytes.starts_with(b"%PDF");

    let text = if is_pdf {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            warn!("PDF extraction failed for {file_name}: {e}");
            AppError::UnprocessableEntity(format!("Could not extract text from {file_name}"))
        })?
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    };

    let excerpt = truncate_chars(&text, MAX_FULL_TEXT_CHARS).to_string();
    debug!(
        "Extracted {} chars from {file_name} (kept {})",
        text.chars().count(),
        excerpt.chars().count()
    );
    Ok(excerpt)
}

/// Runs `extract_full_text` on the blocking pool; PDF parsing is CPU-bound and can take
/// seconds on a large upload. A panic inside the extractor is reported as an unreadable file.
pub async fn extract_upload_text(file_name: String, bytes: Bytes) -> Result<String, AppError> {
    let name = file_name.clone();
    tokio::task::spawn_blocking(move || extract_full_text(&file_name, &bytes))
        .await
        .map_err(|e| {
            warn!("Text extraction task for {name} did not complete: {e}");
            AppError::UnprocessableEntity(format!("Could not extract text from {name}"))
        })?
}
