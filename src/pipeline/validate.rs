//! Selection validation: declared MIME type and size.
//!
//! Rules run in order and stop at the first failure:
//!
//! 1. the declared MIME type must mention `pdf`
//! 2. the size must not exceed the configured limit
//!
//! Only metadata is inspected here. [`sniff_pdf`] is the optional content
//! check applied after the bytes are read.

use crate::config::IntakeConfig;
use crate::error::ValidationError;
use crate::types::Selection;

/// Magic number every PDF file starts with.
pub const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// Check a selection's declared metadata against the configured constraints.
pub fn validate(selection: &Selection, config: &IntakeConfig) -> Result<(), ValidationError> {
    if !is_pdf_mime(&selection.mime_type) {
        return Err(ValidationError::NotPdf {
            mime_type: selection.mime_type.clone(),
        });
    }

    if selection.size_bytes > config.max_size_bytes {
        return Err(ValidationError::TooLarge {
            size_bytes: selection.size_bytes,
            limit_bytes: config.max_size_bytes,
        });
    }

    Ok(())
}

/// Whether a declared MIME type indicates a PDF document.
///
/// Matches any type containing `pdf` (`application/pdf`, `application/x-pdf`).
pub fn is_pdf_mime(mime_type: &str) -> bool {
    mime_type.to_ascii_lowercase().contains("pdf")
}

/// Verify the `%PDF` signature at the start of the content.
pub fn sniff_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}
