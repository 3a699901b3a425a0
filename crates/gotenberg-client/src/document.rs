//! Documents attached to conversion requests
//!
//! A [`Document`] is a named byte source. Its content is never inspected:
//! the client only opens a fresh reader each time the document is
//! serialized into a multipart body.

use crate::error::{GotenbergError, Result};
use bytes::Bytes;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::io::AsyncRead;

/// Reader over a document's content, opened per serialization
pub type DocumentReader = Pin<Box<dyn AsyncRead + Send>>;

#[derive(Debug, Clone)]
enum Source {
    Path(PathBuf),
    Bytes(Bytes),
}

/// Named byte source sent as a multipart file part
///
/// Cloning is cheap: path-backed documents clone the path, in-memory
/// documents share their buffer.
#[derive(Debug, Clone)]
pub struct Document {
    filename: String,
    source: Source,
}

impl Document {
    /// Create a document backed by a file on disk
    ///
    /// The path must exist now. It is not checked again until the
    /// document is read, so a file removed in between fails at read time.
    pub fn from_path(filename: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let filename = filename.into();
        let path = path.as_ref();
        if let Err(err) = std::fs::metadata(path) {
            if err.kind() == io::ErrorKind::NotFound {
                return Err(GotenbergError::invalid_document(
                    &filename,
                    format!("file {} does not exist", path.display()),
                ));
            }
        }

        Ok(Self {
            filename,
            source: Source::Path(path.to_path_buf()),
        })
    }

    /// Create a path-backed document named after the path's last component
    pub fn from_path_named(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                GotenbergError::invalid_document(
                    &path.display().to_string(),
                    "path has no file name",
                )
            })?;
        Self::from_path(filename, path)
    }

    /// Create a document from an in-memory string
    pub fn from_string(filename: impl Into<String>, data: impl Into<String>) -> Result<Self> {
        let filename = filename.into();
        let data = data.into();
        if data.is_empty() {
            return Err(GotenbergError::invalid_document(&filename, "string is empty"));
        }

        Ok(Self {
            filename,
            source: Source::Bytes(Bytes::from(data)),
        })
    }

    /// Create a document from in-memory bytes
    pub fn from_bytes(filename: impl Into<String>, data: impl Into<Bytes>) -> Result<Self> {
        let filename = filename.into();
        let data = data.into();
        if data.is_empty() {
            return Err(GotenbergError::invalid_document(&filename, "bytes are empty"));
        }

        Ok(Self {
            filename,
            source: Source::Bytes(data),
        })
    }

    /// Name sent to the server, used for format detection
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Backing path, for path-backed documents
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            Source::Path(path) => Some(path),
            Source::Bytes(_) => None,
        }
    }

    /// Open a new reader over the content
    ///
    /// Every call returns an independent reader positioned at the start.
    /// In-memory documents never fail here.
    pub async fn reader(&self) -> io::Result<DocumentReader> {
        match &self.source {
            Source::Path(path) => {
                let file = tokio::fs::File::open(path).await?;
                Ok(Box::pin(file))
            }
            Source::Bytes(data) => Ok(Box::pin(Cursor::new(data.clone()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    async fn read_all(doc: &Document) -> Vec<u8> {
        let mut reader = doc.reader().await.unwrap();
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await.unwrap();
        buf
    }

    #[tokio::test]
    async fn test_from_string() {
        let doc = Document::from_string("index.html", "<html>Foo</html>").unwrap();
        assert_eq!(doc.filename(), "index.html");
        assert!(doc.path().is_none());
        assert_eq!(read_all(&doc).await, b"<html>Foo</html>");
    }

    #[tokio::test]
    async fn test_from_bytes() {
        let doc = Document::from_bytes("index.html", b"<html>Foo</html>".to_vec()).unwrap();
        assert_eq!(doc.filename(), "index.html");
        assert_eq!(read_all(&doc).await, b"<html>Foo</html>");
    }

    #[test]
    fn test_empty_content_rejected() {
        let err = Document::from_string("index.html", "").unwrap_err();
        assert!(matches!(err, GotenbergError::InvalidDocument { ref filename, .. } if filename == "index.html"));

        let err = Document::from_bytes("img.gif", Vec::new()).unwrap_err();
        assert!(matches!(err, GotenbergError::InvalidDocument { .. }));
    }

    #[tokio::test]
    async fn test_reader_is_reopened() {
        let doc = Document::from_string("style.css", "body { color: red; }").unwrap();
        assert_eq!(read_all(&doc).await, read_all(&doc).await);
    }

    #[tokio::test]
    async fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("document.docx");
        std::fs::write(&path, b"docx bytes").unwrap();

        let doc = Document::from_path("document.docx", &path).unwrap();
        assert_eq!(doc.filename(), "document.docx");
        assert_eq!(doc.path(), Some(path.as_path()));
        assert_eq!(read_all(&doc).await, b"docx bytes");
        assert_eq!(read_all(&doc).await, b"docx bytes");
    }

    #[test]
    fn test_missing_path_fails_at_construction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.pdf");

        let err = Document::from_path("missing.pdf", &path).unwrap_err();
        assert!(matches!(err, GotenbergError::InvalidDocument { .. }));
        assert!(err.to_string().contains("does not exist"));
    }

    #[tokio::test]
    async fn test_removed_file_fails_at_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.pdf");
        std::fs::write(&path, b"%PDF").unwrap();

        let doc = Document::from_path("gone.pdf", &path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let err = doc.reader().await.err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_from_path_named() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        std::fs::write(&path, b"xlsx").unwrap();

        let doc = Document::from_path_named(&path).unwrap();
        assert_eq!(doc.filename(), "report.xlsx");
    }
}
