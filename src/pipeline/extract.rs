//! Extraction boundary: submit a payload and always get a result back.
//!
//! The [`Extractor`] trait is the contract with the external collaborator.
//! [`ExtractionInvoker`] wraps a collaborator so that every call resolves to
//! exactly one [`ExtractionResult`]: collaborator errors and panics are both
//! folded into `succeeded = false` with a human-readable message.

use crate::error::ExtractorError;
use crate::types::{BinaryPayload, ExtractionResult};
use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// External collaborator that processes a payload.
///
/// Implementations own their timeout policy; the invoker waits for as long as
/// `extract` takes.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, payload: &BinaryPayload) -> Result<ExtractionResult, ExtractorError>;
}

/// Submits payloads to an [`Extractor`] and tracks calls in flight.
#[derive(Clone)]
pub struct ExtractionInvoker {
    extractor: Arc<dyn Extractor>,
    in_flight: Arc<AtomicUsize>,
}

impl ExtractionInvoker {
    pub fn new(extractor: Arc<dyn Extractor>) -> Self {
        Self {
            extractor,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Whether any call is outstanding.
    pub fn is_pending(&self) -> bool {
        self.in_flight() > 0
    }

    /// Number of outstanding calls.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Submit a payload. Never fails: errors are reported in the result.
    pub async fn submit(&self, payload: BinaryPayload) -> ExtractionResult {
        let _guard = InFlightGuard::enter(&self.in_flight);
        let start = Instant::now();
        info!("Submitting {} bytes for extraction", payload.len());

        let outcome = AssertUnwindSafe(self.extractor.extract(&payload))
            .catch_unwind()
            .await;

        let result = match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                warn!("Extraction failed: {}", e);
                ExtractionResult::failure(e.to_string())
            }
            Err(panic) => {
                let detail = panic_message(panic.as_ref());
                warn!("Extractor panicked: {}", detail);
                ExtractionResult::failure(format!("Extraction failed unexpectedly: {detail}"))
            }
        };

        debug!(
            "Extraction resolved in {:?}: succeeded={}",
            start.elapsed(),
            result.succeeded
        );
        result
    }
}

/// Decrements the in-flight counter exactly once, even if the call is dropped.
struct InFlightGuard<'a>(&'a AtomicUsize);

impl<'a> InFlightGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
