//! Progress-callback trait for intake session events.
//!
//! Inject an [`Arc<dyn IntakeProgressCallback>`] via
//! [`crate::config::IntakeConfigBuilder::progress_callback`] to receive
//! events as a session moves through its phases.
//!
//! Callers can forward events to a channel, a terminal spinner or a log
//! without the library knowing how the host application renders them. Events
//! for completions that were superseded by a newer selection (or a `clear`)
//! are never emitted.
//!
//! # Example
//!
//! ```rust
//! use resume_intake::{IntakeConfig, IntakeProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct Counter {
//!     ready: AtomicUsize,
//! }
//!
//! impl IntakeProgressCallback for Counter {
//!     fn on_payload_ready(&self, name: &str, len: usize) {
//!         self.ready.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{name}: {len} bytes ready");
//!     }
//! }
//!
//! let config = IntakeConfig::builder()
//!     .progress_callback(Arc::new(Counter { ready: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::{ExtractionResult, Selection};
use std::sync::Arc;

/// Called by [`crate::session::UploadSession`] as it changes phase.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync`; sessions are
/// cloned into spawned tasks.
pub trait IntakeProgressCallback: Send + Sync {
    /// A file was selected and passed validation; its content is being read.
    fn on_file_selected(&self, selection: &Selection) {
        let _ = selection;
    }

    /// The selection was rejected, or its content could not be read.
    fn on_validation_failed(&self, selection: &Selection, error: &ValidationError) {
        let _ = (selection, error);
    }

    /// The content was read and the session is ready to submit.
    ///
    /// # Arguments
    /// * `name` — file name of the selection
    /// * `len`  — payload length in bytes
    fn on_payload_ready(&self, name: &str, len: usize) {
        let _ = (name, len);
    }

    /// The payload was handed to the extraction collaborator.
    fn on_extraction_start(&self, name: &str) {
        let _ = name;
    }

    /// The extraction call resolved (successfully or not).
    fn on_extraction_complete(&self, result: &ExtractionResult) {
        let _ = result;
    }

    /// The session was cleared or reset.
    fn on_session_cleared(&self) {}
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl IntakeProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::IntakeConfig`].
pub type ProgressCallback = Arc<dyn IntakeProgressCallback>;
