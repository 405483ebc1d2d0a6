//! Shared fakes for session integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use resume_intake::{
    BinaryPayload, ExtractionResult, Extractor, ExtractorError, FileHandle, FileSource, Phase,
    Selection, SessionSnapshot, UploadSession,
};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

pub const MIB: u64 = 1024 * 1024;

/// Bytes that look like a PDF, padded to `len`.
pub fn pdf_bytes(len: usize) -> Vec<u8> {
    let mut bytes = b"%PDF-1.7\n".to_vec();
    bytes.resize(len.max(bytes.len()), b'x');
    bytes
}

pub fn pdf_file(name: &str, len: usize) -> FileHandle {
    FileHandle::from_bytes(name, "application/pdf", pdf_bytes(len))
}

/// Route `tracing` output through the test harness; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("resume_intake=debug"))
        .with_test_writer()
        .try_init();
}

// ── File sources ─────────────────────────────────────────────────────────────

/// Returns fixed bytes and counts how often it was read.
pub struct CountingSource {
    bytes: Vec<u8>,
    pub reads: AtomicUsize,
}

impl CountingSource {
    pub fn new(bytes: Vec<u8>) -> Arc<Self> {
        Arc::new(Self {
            bytes,
            reads: AtomicUsize::new(0),
        })
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FileSource for CountingSource {
    async fn read_all(&self) -> io::Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.bytes.clone())
    }
}

/// A read that completes only when the test sends its outcome.
pub struct GatedSource {
    gate: Mutex<Option<oneshot::Receiver<io::Result<Vec<u8>>>>>,
}

#[async_trait]
impl FileSource for GatedSource {
    async fn read_all(&self) -> io::Result<Vec<u8>> {
        let rx = self.gate.lock().unwrap().take();
        match rx {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(io::Error::other("gate dropped"))),
            None => Err(io::Error::other("read twice")),
        }
    }
}

/// A handle whose declared metadata is `selection` and whose read is gated.
pub fn gated_file(
    selection: Selection,
) -> (oneshot::Sender<io::Result<Vec<u8>>>, FileHandle) {
    let (tx, rx) = oneshot::channel();
    let source = Arc::new(GatedSource {
        gate: Mutex::new(Some(rx)),
    });
    (tx, FileHandle::new(selection, source))
}

// ── Extractors ───────────────────────────────────────────────────────────────

/// Always answers with the same outcome.
pub struct FixedExtractor {
    outcome: Result<ExtractionResult, fn() -> ExtractorError>,
    pub calls: AtomicUsize,
}

impl FixedExtractor {
    pub fn ok(message: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(ExtractionResult::success(message)),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn err(make: fn() -> ExtractorError) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(make),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Extractor for FixedExtractor {
    async fn extract(&self, _payload: &BinaryPayload) -> Result<ExtractionResult, ExtractorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Ok(r) => Ok(r.clone()),
            Err(make) => Err(make()),
        }
    }
}

type Reply = Result<ExtractionResult, ExtractorError>;

/// Each call waits for the next reply the test sends.
pub struct GatedExtractor {
    gates: Mutex<Vec<oneshot::Receiver<Reply>>>,
    pub seen_len: AtomicUsize,
}

impl GatedExtractor {
    /// An extractor answering `n` calls, in order, with the returned senders.
    pub fn new(n: usize) -> (Arc<Self>, Vec<oneshot::Sender<Reply>>) {
        let (senders, receivers): (Vec<_>, Vec<_>) = (0..n).map(|_| oneshot::channel()).unzip();
        let mut receivers = receivers;
        receivers.reverse();
        (
            Arc::new(Self {
                gates: Mutex::new(receivers),
                seen_len: AtomicUsize::new(0),
            }),
            senders,
        )
    }
}

#[async_trait]
impl Extractor for GatedExtractor {
    async fn extract(&self, payload: &BinaryPayload) -> Result<ExtractionResult, ExtractorError> {
        self.seen_len.store(payload.len(), Ordering::SeqCst);
        let rx = self.gates.lock().unwrap().pop();
        match rx {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ExtractorError::Request("gate dropped".into()))),
            None => Err(ExtractorError::Request("no reply scheduled".into())),
        }
    }
}

// ── Waiting ──────────────────────────────────────────────────────────────────

/// Yield to spawned tasks until the session snapshot satisfies `pred`.
pub async fn wait_until(
    session: &UploadSession,
    pred: impl Fn(&SessionSnapshot) -> bool,
) -> SessionSnapshot {
    for _ in 0..10_000 {
        let snap = session.snapshot();
        if pred(&snap) {
            return snap;
        }
        tokio::task::yield_now().await;
    }
    panic!("session never reached the expected state: {:?}", session.snapshot());
}

pub async fn wait_for_phase(session: &UploadSession, phase: Phase) -> SessionSnapshot {
    wait_until(session, |s| s.phase == phase).await
}

/// Assert every field of the snapshot is at its empty default.
pub fn assert_empty(snap: &SessionSnapshot) {
    assert_eq!(snap.phase, Phase::Empty, "{snap:?}");
    assert!(snap.selection.is_none(), "{snap:?}");
    assert!(snap.payload_len.is_none(), "{snap:?}");
    assert!(snap.error.is_none(), "{snap:?}");
    assert!(snap.result.is_none(), "{snap:?}");
    assert!(!snap.pending, "{snap:?}");
    assert!(snap.status().is_none(), "{snap:?}");
}
