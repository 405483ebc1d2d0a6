//! # resume-intake
//!
//! Validate a user-selected resume PDF, read it into memory and submit it to
//! an extraction collaborator, tracking every step in an explicit session
//! state machine.
//!
//! ## Pipeline Overview
//!
//! ```text
//! FileHandle
//!  │
//!  ├─ 1. Validate  declared MIME must be PDF, size ≤ 10 MiB (configurable)
//!  ├─ 2. Read      whole file → BinaryPayload (async, superseded reads dropped)
//!  ├─ 3. Submit    payload → Extractor (HTTP service, LLM, or your own)
//!  └─ 4. Result    ExtractionResult { succeeded, message } in the snapshot
//! ```
//!
//! [`UploadSession`] owns the state. Every `select_file` and `clear` starts a
//! new generation; asynchronous completions from an older generation are
//! discarded, so a slow read of a previous file can never overwrite the
//! current one.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use resume_intake::{FileHandle, IntakeConfig, UploadSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Extractor auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / GEMINI_API_KEY
//!     let session = UploadSession::from_config(IntakeConfig::default())?;
//!
//!     let snapshot = session.select_file(FileHandle::from_path("resume.pdf").await?).await;
//!     if let Some(status) = snapshot.status() {
//!         eprintln!("{}: {}", status.title(), status.message);
//!         return Ok(());
//!     }
//!
//!     let result = session.submit().await?;
//!     println!("{}", result.message);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `resume-intake` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod dialog;
pub mod error;
pub mod extractors;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod session;
pub mod types;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{IntakeConfig, IntakeConfigBuilder, DEFAULT_MAX_SIZE_BYTES};
pub use dialog::IntakeDialog;
pub use error::{ExtractorError, IntakeError, ValidationError};
pub use extractors::http::HttpExtractor;
pub use extractors::llm::LlmExtractor;
pub use extractors::pages::{PageRasterizer, PdfiumRasterizer};
pub use extractors::resolve_extractor;
pub use pipeline::extract::{ExtractionInvoker, Extractor};
pub use pipeline::read::{read_payload, FileHandle, FileSource, InMemoryFile, LocalFile};
pub use pipeline::validate::{sniff_pdf, validate};
pub use progress::{IntakeProgressCallback, NoopProgressCallback, ProgressCallback};
pub use session::{Phase, SessionSnapshot, Status, StatusLevel, UploadSession};
pub use types::{BinaryPayload, ExtractionResult, Selection};
