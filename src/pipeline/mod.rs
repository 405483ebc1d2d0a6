//! Pipeline stages between "file selected" and "extraction result known".
//!
//! Each submodule implements exactly one step. The stages hold no session
//! state; [`crate::session::UploadSession`] sequences them and decides
//! whether an asynchronous completion is still current.
//!
//! ## Data Flow
//!
//! ```text
//! validate ──▶ read ──▶ extract
//! (metadata)   (bytes)  (collaborator)
//! ```
//!
//! 1. [`validate`] — pure MIME and size checks on the declared metadata
//! 2. [`read`]     — load the whole file into a [`crate::types::BinaryPayload`]
//! 3. [`extract`]  — hand the payload to an [`extract::Extractor`] and fold
//!    every outcome into an [`crate::types::ExtractionResult`]

pub mod extract;
pub mod read;
pub mod validate;
