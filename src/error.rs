//! Error types for the resume-intake library.
//!
//! Three error types reflect three distinct failure modes:
//!
//! * [`IntakeError`] — **Operation-level**: the requested operation cannot
//!   proceed at all (file missing, submit called outside `Ready`, extractor
//!   not configured). Returned as `Err(IntakeError)`.
//!
//! * [`ValidationError`] — **Session-level**: the selected file was rejected
//!   or could not be read. Stored inside the session snapshot so the
//!   presentation layer can render it; it blocks progression but never
//!   crashes the session.
//!
//! * [`ExtractorError`] — **Collaborator-level**: the extraction service
//!   failed. The invoker folds it into an
//!   [`crate::types::ExtractionResult`] with `succeeded = false`, so callers
//!   of `submit` always get a result rather than an error.

use crate::session::Phase;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by library operations.
#[derive(Debug, Error)]
pub enum IntakeError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    // ── Session errors ────────────────────────────────────────────────────
    /// `submit` was called while no payload is ready (or one is in flight).
    #[error("Cannot submit while the session is {phase}")]
    SubmitUnavailable { phase: Phase },

    // ── Extractor errors ──────────────────────────────────────────────────
    /// No usable extraction collaborator could be built.
    #[error("Extractor '{extractor}' is not configured.\n{hint}")]
    ExtractorNotConfigured { extractor: String, hint: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Why a selected file was rejected or could not be turned into a payload.
///
/// The display strings are the messages shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// Declared type (or, when sniffing is enabled, the content) is not PDF.
    #[error("Please select a valid PDF file")]
    NotPdf { mime_type: String },

    /// File exceeds the configured size limit.
    #[error("File size must be under {}", size_limit_label(*limit_bytes))]
    TooLarge { size_bytes: u64, limit_bytes: u64 },

    /// The file content could not be read.
    #[error("Error reading the file: {detail}")]
    ReadFailure { detail: String },
}

/// Render a byte limit the way users read it: "10MB", "1.5MB", "100KB".
///
/// Fractions are truncated to one decimal so the label never overstates the
/// limit.
pub fn size_limit_label(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;

    fn scaled(bytes: u64, unit: u64, suffix: &str) -> String {
        if bytes % unit == 0 {
            format!("{}{suffix}", bytes / unit)
        } else {
            let tenths = (u128::from(bytes) * 10 / u128::from(unit)) as u64;
            format!("{}.{}{suffix}", tenths / 10, tenths % 10)
        }
    }

    if bytes >= MIB {
        scaled(bytes, MIB, "MB")
    } else if bytes >= KIB {
        scaled(bytes, KIB, "KB")
    } else {
        format!("{bytes} bytes")
    }
}

/// Failures reported by an extraction collaborator.
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// The request never produced a response.
    #[error("Extraction request failed: {0}")]
    Request(String),

    /// The collaborator gave up after its own timeout.
    #[error("Extraction timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The service answered with a non-success HTTP status.
    #[error("Extraction service returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    /// The response could not be understood.
    #[error("Invalid extraction response: {0}")]
    InvalidResponse(String),

    /// The LLM provider reported an error.
    #[error("LLM provider error: {0}")]
    Provider(String),

    /// The document could not be rasterised for a vision model.
    #[error("Could not render the PDF: {0}")]
    Render(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_pdf_display_matches_user_message() {
        let e = ValidationError::NotPdf {
            mime_type: "image/png".into(),
        };
        assert_eq!(e.to_string(), "Please select a valid PDF file");
    }

    #[test]
    fn too_large_display_renders_limit_in_mb() {
        let e = ValidationError::TooLarge {
            size_bytes: 12 * 1024 * 1024,
            limit_bytes: 10 * 1024 * 1024,
        };
        assert_eq!(e.to_string(), "File size must be under 10MB");
    }

    #[test]
    fn too_large_display_handles_partial_and_small_limits() {
        let msg = |limit_bytes| {
            ValidationError::TooLarge {
                size_bytes: u64::MAX,
                limit_bytes,
            }
            .to_string()
        };
        assert_eq!(msg(100), "File size must be under 100 bytes");
        assert_eq!(msg(512 * 1024), "File size must be under 512KB");
        assert_eq!(msg(1536), "File size must be under 1.5KB");
        assert_eq!(msg(3 * 1024 * 1024 / 2), "File size must be under 1.5MB");
        assert_eq!(msg(10 * 1024 * 1024 - 1), "File size must be under 9.9MB");
    }

    #[test]
    fn read_failure_display_includes_detail() {
        let e = ValidationError::ReadFailure {
            detail: "unexpected end of file".into(),
        };
        assert!(e.to_string().starts_with("Error reading the file"));
        assert!(e.to_string().contains("unexpected end of file"));
    }

    #[test]
    fn submit_unavailable_names_phase() {
        let e = IntakeError::SubmitUnavailable {
            phase: Phase::Submitting,
        };
        assert!(e.to_string().contains("submitting"), "got: {e}");
    }

    #[test]
    fn validation_error_serialises_with_kind_tag() {
        let e = ValidationError::TooLarge {
            size_bytes: 11,
            limit_bytes: 10,
        };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["kind"], "too_large");
        assert_eq!(json["size_bytes"], 11);
    }

    #[test]
    fn status_error_display() {
        let e = ExtractorError::Status {
            code: 502,
            body: "bad gateway".into(),
        };
        assert!(e.to_string().contains("502"));
        assert!(e.to_string().contains("bad gateway"));
    }
}
