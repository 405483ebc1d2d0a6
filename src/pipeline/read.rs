//! Content reading: turn a selected file handle into a [`BinaryPayload`].
//!
//! A [`FileHandle`] pairs the declared [`Selection`] metadata with a
//! [`FileSource`] that can produce the bytes. Validation only ever looks at
//! the metadata; the source is touched once, by [`read_payload`], after the
//! selection has passed.

use crate::error::{IntakeError, ValidationError};
use crate::types::{BinaryPayload, Selection};
use async_trait::async_trait;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Something that can deliver the full content of a selected file.
#[async_trait]
pub trait FileSource: Send + Sync {
    async fn read_all(&self) -> io::Result<Vec<u8>>;
}

/// A file on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FileSource for LocalFile {
    async fn read_all(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

/// Content the caller already holds in memory.
#[derive(Debug, Clone)]
pub struct InMemoryFile {
    bytes: BinaryPayload,
}

impl InMemoryFile {
    pub fn new(bytes: impl Into<BinaryPayload>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

#[async_trait]
impl FileSource for InMemoryFile {
    async fn read_all(&self) -> io::Result<Vec<u8>> {
        Ok(self.bytes.to_vec())
    }
}

/// A user-selected file: declared metadata plus a way to read it.
#[derive(Clone)]
pub struct FileHandle {
    pub selection: Selection,
    source: Arc<dyn FileSource>,
}

impl FileHandle {
    /// Pair declared metadata with an arbitrary source.
    pub fn new(selection: Selection, source: Arc<dyn FileSource>) -> Self {
        Self { selection, source }
    }

    /// Wrap bytes already in memory. The size is taken from the buffer.
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<BinaryPayload>,
    ) -> Self {
        let bytes = bytes.into();
        let selection = Selection::new(name, bytes.len() as u64, mime_type);
        Self::new(selection, Arc::new(InMemoryFile { bytes }))
    }

    /// Build a handle for a local file.
    ///
    /// The name is the final path component, the size comes from filesystem
    /// metadata and the MIME type is guessed from the extension (override it
    /// with [`FileHandle::with_mime_type`]). Content is not read here.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, IntakeError> {
        let path = path.as_ref().to_path_buf();

        let meta = match tokio::fs::metadata(&path).await {
            Ok(m) if m.is_file() => m,
            Ok(_) => return Err(IntakeError::FileNotFound { path }),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                return Err(IntakeError::PermissionDenied { path });
            }
            Err(_) => return Err(IntakeError::FileNotFound { path }),
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let selection = Selection::new(name, meta.len(), guess_mime_type(&path));

        debug!(
            "Prepared handle for {} ({} bytes, {})",
            path.display(),
            selection.size_bytes,
            selection.mime_type
        );
        Ok(Self::new(selection, Arc::new(LocalFile::new(path))))
    }

    /// Replace the declared MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.selection.mime_type = mime_type.into();
        self
    }
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHandle")
            .field("selection", &self.selection)
            .field("source", &"<dyn FileSource>")
            .finish()
    }
}

/// Guess a MIME type from a file extension.
pub fn guess_mime_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

/// Read the whole content of a handle.
///
/// Any I/O error becomes [`ValidationError::ReadFailure`].
pub async fn read_payload(handle: &FileHandle) -> Result<BinaryPayload, ValidationError> {
    let bytes = handle
        .source
        .read_all()
        .await
        .map_err(|e| ValidationError::ReadFailure {
            detail: e.to_string(),
        })?;

    debug!("Read {} bytes from {}", bytes.len(), handle.selection.name);
    Ok(BinaryPayload::from(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    struct BrokenSource;

    #[async_trait]
    impl FileSource for BrokenSource {
        async fn read_all(&self) -> io::Result<Vec<u8>> {
            Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated upload"))
        }
    }

    #[test]
    fn guess_mime_type_by_extension() {
        assert_eq!(guess_mime_type(Path::new("cv.pdf")), "application/pdf");
        assert_eq!(guess_mime_type(Path::new("CV.PDF")), "application/pdf");
        assert_eq!(guess_mime_type(Path::new("notes.txt")), "text/plain");
        assert_eq!(guess_mime_type(Path::new("noext")), "application/octet-stream");
    }

    #[tokio::test]
    async fn reads_in_memory_bytes() {
        let handle = FileHandle::from_bytes("cv.pdf", "application/pdf", b"%PDF-1.4".to_vec());
        assert_eq!(handle.selection.size_bytes, 8);
        let payload = read_payload(&handle).await.unwrap();
        assert_eq!(payload.as_bytes(), b"%PDF-1.4");
    }

    #[tokio::test]
    async fn io_error_becomes_read_failure() {
        let handle = FileHandle::new(
            Selection::new("cv.pdf", 10, "application/pdf"),
            Arc::new(BrokenSource),
        );
        let err = read_payload(&handle).await.unwrap_err();
        assert_eq!(
            err,
            ValidationError::ReadFailure {
                detail: "truncated upload".into()
            }
        );
    }

    #[tokio::test]
    async fn from_path_reads_metadata_and_content() {
        let mut tmp = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        tmp.write_all(b"%PDF-1.7 resume").unwrap();

        let handle = FileHandle::from_path(tmp.path()).await.unwrap();
        assert_eq!(handle.selection.size_bytes, 15);
        assert_eq!(handle.selection.mime_type, "application/pdf");
        assert!(handle.selection.name.ends_with(".pdf"));

        let payload = read_payload(&handle).await.unwrap();
        assert_eq!(payload.len(), 15);
    }

    #[tokio::test]
    async fn from_path_missing_file() {
        let err = FileHandle::from_path("/definitely/not/a/real/cv.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, IntakeError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn from_path_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileHandle::from_path(dir.path()).await.unwrap_err();
        assert!(matches!(err, IntakeError::FileNotFound { .. }));
    }

    #[test]
    fn with_mime_type_overrides_guess() {
        let handle = FileHandle::from_bytes("cv.bin", "application/octet-stream", vec![0u8])
            .with_mime_type("application/pdf");
        assert_eq!(handle.selection.mime_type, "application/pdf");
    }
}
