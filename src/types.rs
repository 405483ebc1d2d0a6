//! Value types that flow through the intake pipeline.
//!
//! ```text
//! Selection ──validate──▶ BinaryPayload ──extract──▶ ExtractionResult
//! (metadata)              (bytes)                    (succeeded, message)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Declared metadata of a user-chosen file, before any content is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// File name as shown to the user (no directory components).
    pub name: String,
    /// Size in bytes as reported by the source.
    pub size_bytes: u64,
    /// Declared MIME type, e.g. `application/pdf`.
    pub mime_type: String,
}

impl Selection {
    pub fn new(name: impl Into<String>, size_bytes: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Size rendered in KiB with one decimal, e.g. `"2048.0 KB"`.
    pub fn size_label(&self) -> String {
        format!("{:.1} KB", self.size_bytes as f64 / 1024.0)
    }
}

/// Fully-read content of a validated selection.
///
/// Cloning is cheap (reference-counted); the bytes are never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct BinaryPayload(Arc<[u8]>);

impl BinaryPayload {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for BinaryPayload {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Arc::from(bytes))
    }
}

impl From<&[u8]> for BinaryPayload {
    fn from(bytes: &[u8]) -> Self {
        Self(Arc::from(bytes))
    }
}

impl Deref for BinaryPayload {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for BinaryPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryPayload")
            .field("len", &self.0.len())
            .finish()
    }
}

/// Outcome of one extraction call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub succeeded: bool,
    pub message: String,
}

impl ExtractionResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            message: message.into(),
        }
    }
}
