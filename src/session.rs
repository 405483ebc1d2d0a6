//! The upload session: selection, payload, error and result state.
//!
//! ```text
//!            select_file                 read ok            submit
//!   Empty ──────────────▶ Converting ─────────────▶ Ready ─────────▶ Submitting
//!     ▲         │                │ read failed                           │
//!     │         │ rejected       ▼                                       │ resolved
//!     │         └──────────▶ Invalid                          Done ◀─────┘
//!     │
//!     └──── clear / reset (from any phase); select_file restarts from any phase
//! ```
//!
//! ## Stale completions
//!
//! Reads and extraction calls suspend the caller, and the user may select
//! another file or clear the session meanwhile. Every `select_file` and
//! `clear` bumps a generation counter; each asynchronous step captures the
//! generation when it starts and its completion is applied only if the
//! counter has not moved. Superseded completions are logged and dropped.
//!
//! The state lock is a plain `std::sync::Mutex` and is never held across an
//! `.await` or while progress callbacks run.

use crate::config::IntakeConfig;
use crate::error::{IntakeError, ValidationError};
use crate::extractors;
use crate::pipeline::extract::{ExtractionInvoker, Extractor};
use crate::pipeline::read::{self, FileHandle};
use crate::pipeline::validate;
use crate::progress::IntakeProgressCallback;
use crate::types::{BinaryPayload, ExtractionResult, Selection};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

/// Message recorded when a submission future is dropped before resolving.
pub const CANCELLED_MESSAGE: &str = "Extraction was cancelled";

/// Where a session currently is in the intake cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing selected.
    Empty,
    /// A selection exists but was rejected or could not be read.
    Invalid,
    /// A valid selection is being read.
    Converting,
    /// The payload is ready to submit.
    Ready,
    /// An extraction call is outstanding.
    Submitting,
    /// The latest extraction call resolved; the result is available.
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Empty => "empty",
            Phase::Invalid => "invalid",
            Phase::Converting => "converting",
            Phase::Ready => "ready",
            Phase::Submitting => "submitting",
            Phase::Done => "done",
        };
        f.write_str(s)
    }
}

/// Severity of the single status line the presentation layer shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLevel {
    Success,
    Error,
}

/// The one message to render for the current session, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub level: StatusLevel,
    pub message: String,
}

impl Status {
    /// Heading for the message ("Success" or "Error").
    pub fn title(&self) -> &'static str {
        match self.level {
            StatusLevel::Success => "Success",
            StatusLevel::Error => "Error",
        }
    }
}

/// Read-only view of a session for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub generation: u64,
    pub phase: Phase,
    pub selection: Option<Selection>,
    /// Length of the payload, when one is present.
    pub payload_len: Option<usize>,
    pub error: Option<ValidationError>,
    pub result: Option<ExtractionResult>,
    pub pending: bool,
}

impl SessionSnapshot {
    /// Whether `submit` would be accepted right now.
    pub fn can_submit(&self) -> bool {
        self.phase == Phase::Ready
    }

    /// The status line: a validation error, else the latest extraction result.
    pub fn status(&self) -> Option<Status> {
        if let Some(ref e) = self.error {
            return Some(Status {
                level: StatusLevel::Error,
                message: e.to_string(),
            });
        }
        self.result.as_ref().map(|r| Status {
            level: if r.succeeded {
                StatusLevel::Success
            } else {
                StatusLevel::Error
            },
            message: r.message.clone(),
        })
    }
}

#[derive(Debug, Default)]
struct SessionState {
    generation: u64,
    selection: Option<Selection>,
    payload: Option<BinaryPayload>,
    error: Option<ValidationError>,
    result: Option<ExtractionResult>,
    converting: bool,
    pending: bool,
}

impl SessionState {
    fn phase(&self) -> Phase {
        if self.selection.is_none() {
            Phase::Empty
        } else if self.error.is_some() {
            Phase::Invalid
        } else if self.converting {
            Phase::Converting
        } else if self.pending {
            Phase::Submitting
        } else if self.result.is_some() {
            Phase::Done
        } else if self.payload.is_some() {
            Phase::Ready
        } else {
            // A selection with neither error, payload nor read in progress
            // cannot be produced by the transitions below.
            Phase::Invalid
        }
    }

    /// Drop everything and start a new generation.
    fn reset(&mut self) -> u64 {
        let generation = self.generation + 1;
        *self = SessionState {
            generation,
            ..SessionState::default()
        };
        generation
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            generation: self.generation,
            phase: self.phase(),
            selection: self.selection.clone(),
            payload_len: self.payload.as_ref().map(BinaryPayload::len),
            error: self.error.clone(),
            result: self.result.clone(),
            pending: self.pending,
        }
    }
}

/// One intake session: select a file, read it, submit it, show the result.
///
/// Cloning is cheap and every clone drives the same session, so a UI can
/// hand clones to spawned tasks.
///
/// # Example
///
/// ```rust,no_run
/// use resume_intake::{FileHandle, IntakeConfig, UploadSession};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = IntakeConfig::builder()
///     .endpoint("https://extract.example.com/resume")
///     .build()?;
/// let session = UploadSession::from_config(config)?;
///
/// let snapshot = session.select_file(FileHandle::from_path("cv.pdf").await?).await;
/// if snapshot.can_submit() {
///     let result = session.submit().await?;
///     println!("{}", result.message);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct UploadSession {
    state: Arc<Mutex<SessionState>>,
    invoker: ExtractionInvoker,
    config: IntakeConfig,
}

impl UploadSession {
    /// Create an empty session submitting to `extractor`.
    pub fn new(config: IntakeConfig, extractor: Arc<dyn Extractor>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            invoker: ExtractionInvoker::new(extractor),
            config,
        }
    }

    /// Create an empty session, building the extractor from the config.
    ///
    /// See [`crate::extractors::resolve_extractor`] for the lookup order.
    pub fn from_config(config: IntakeConfig) -> Result<Self, IntakeError> {
        let extractor = extractors::resolve_extractor(&config)?;
        Ok(Self::new(config, extractor))
    }

    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    /// Current state for rendering.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().snapshot()
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase()
    }

    /// The ready payload, if any.
    pub fn payload(&self) -> Option<BinaryPayload> {
        self.lock().payload.clone()
    }

    /// Replace the selection with `handle`, validate it and read it.
    ///
    /// Prior selection, payload, error and result are discarded first. A
    /// rejected selection is never read. The returned snapshot reflects the
    /// session after this call; if another `select_file` or `clear` ran while
    /// the read was suspended, the read is discarded and the snapshot shows
    /// the newer state.
    pub async fn select_file(&self, handle: FileHandle) -> SessionSnapshot {
        let selection = handle.selection.clone();
        let validation = validate::validate(&selection, &self.config);

        let generation = {
            let mut state = self.lock();
            let generation = state.reset();
            state.selection = Some(selection.clone());
            match validation {
                Err(ref e) => state.error = Some(e.clone()),
                Ok(()) => state.converting = true,
            }
            generation
        };

        if let Err(e) = validation {
            info!("Rejected {}: {}", selection.name, e);
            self.notify(|cb| cb.on_validation_failed(&selection, &e));
            return self.snapshot();
        }

        info!(
            "Selected {} ({}, {}) [generation {}]",
            selection.name,
            selection.size_label(),
            selection.mime_type,
            generation
        );
        self.notify(|cb| cb.on_file_selected(&selection));

        let outcome = read::read_payload(&handle)
            .await
            .and_then(|payload| self.check_signature(&selection, payload));

        let snapshot = {
            let mut state = self.lock();
            if state.generation != generation {
                debug!(
                    "Discarding read of {}: generation {} superseded by {}",
                    selection.name, generation, state.generation
                );
                return state.snapshot();
            }
            state.converting = false;
            match outcome {
                Ok(ref payload) => state.payload = Some(payload.clone()),
                Err(ref e) => state.error = Some(e.clone()),
            }
            state.snapshot()
        };

        match outcome {
            Ok(payload) => {
                info!("{} ready: {} bytes", selection.name, payload.len());
                self.notify(|cb| cb.on_payload_ready(&selection.name, payload.len()));
            }
            Err(e) => {
                warn!("Could not read {}: {}", selection.name, e);
                self.notify(|cb| cb.on_validation_failed(&selection, &e));
            }
        }
        snapshot
    }

    /// Discard everything and return to `Empty`.
    ///
    /// Outstanding reads and extraction calls keep running but their results
    /// are ignored.
    pub fn clear(&self) {
        let generation = self.lock().reset();
        info!("Session cleared [generation {}]", generation);
        self.notify(|cb| cb.on_session_cleared());
    }

    /// Reset on dialog close. Same effect as [`UploadSession::clear`].
    pub fn reset(&self) {
        debug!("Resetting session on close");
        self.clear();
    }

    /// Submit the ready payload to the extraction collaborator.
    ///
    /// Accepted only in [`Phase::Ready`]; anything else, including
    /// [`Phase::Done`], is rejected with [`IntakeError::SubmitUnavailable`] and leaves the session
    /// untouched. Collaborator failures come back as a result with
    /// `succeeded = false`, never as `Err`.
    ///
    /// The result is returned even if the session was cleared or given a new
    /// file meanwhile, but it is only recorded in the session when it still
    /// belongs to the current generation.
    pub async fn submit(&self) -> Result<ExtractionResult, IntakeError> {
        let (generation, payload, name) = {
            let mut state = self.lock();
            let phase = state.phase();
            if phase != Phase::Ready {
                debug!("Submit rejected in phase {}", phase);
                return Err(IntakeError::SubmitUnavailable { phase });
            }
            let payload = state.payload.clone().ok_or_else(|| {
                IntakeError::Internal(format!("no payload in phase {phase}"))
            })?;
            let name = state
                .selection
                .as_ref()
                .map(|s| s.name.clone())
                .unwrap_or_default();
            state.pending = true;
            (state.generation, payload, name)
        };

        let guard = PendingGuard {
            session: self,
            generation,
            resolved: false,
        };

        info!("Submitting {} [generation {}]", name, generation);
        self.notify(|cb| cb.on_extraction_start(&name));

        let result = self.invoker.submit(payload).await;
        guard.resolve(result.clone());

        Ok(result)
    }

    /// Record a resolved extraction call and clear `pending`.
    ///
    /// Returns false when the call belongs to a superseded generation.
    fn finish_submit(&self, generation: u64, result: ExtractionResult) -> bool {
        {
            let mut state = self.lock();
            if state.generation != generation || !state.pending {
                debug!(
                    "Discarding extraction result: generation {} superseded by {}",
                    generation, state.generation
                );
                return false;
            }
            state.pending = false;
            state.result = Some(result.clone());
        }

        info!(
            "Extraction {}: {}",
            if result.succeeded { "succeeded" } else { "failed" },
            result.message
        );
        self.notify(|cb| cb.on_extraction_complete(&result));
        true
    }

    fn check_signature(
        &self,
        selection: &Selection,
        payload: BinaryPayload,
    ) -> Result<BinaryPayload, ValidationError> {
        if self.config.verify_signature && !validate::sniff_pdf(&payload) {
            return Err(ValidationError::NotPdf {
                mime_type: selection.mime_type.clone(),
            });
        }
        Ok(payload)
    }

    fn notify(&self, f: impl FnOnce(&dyn IntakeProgressCallback)) {
        if let Some(ref cb) = self.config.progress_callback {
            f(cb.as_ref());
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!("Session state lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}

impl fmt::Debug for UploadSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadSession")
            .field("state", &self.snapshot())
            .field("config", &self.config)
            .finish()
    }
}

/// Clears `pending` exactly once per submission, including when the
/// submitting future is dropped before the collaborator answers.
struct PendingGuard<'a> {
    session: &'a UploadSession,
    generation: u64,
    resolved: bool,
}

impl PendingGuard<'_> {
    fn resolve(mut self, result: ExtractionResult) -> bool {
        self.resolved = true;
        self.session.finish_submit(self.generation, result)
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if !self.resolved {
            warn!("Submission dropped before the extractor answered");
            self.session
                .finish_submit(self.generation, ExtractionResult::failure(CANCELLED_MESSAGE));
        }
    }
}
