//! Error types for the Gotenberg client

use bytes::Bytes;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or submitting a conversion request
#[derive(Debug, Error)]
pub enum GotenbergError {
    /// Document content is empty or its path does not exist
    #[error("Invalid document {filename}: {reason}")]
    InvalidDocument { filename: String, reason: String },

    /// Request was constructed with an unusable set of documents
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Hostname is not an http:// or https:// URL
    #[error("Invalid hostname {0}: must start with http:// or https://")]
    InvalidHostname(String),

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// A document could not be copied into the multipart body
    #[error("Failed to serialize {filename} into the multipart body")]
    Serialization {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    /// Network failure or invalid request reaching the server
    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The caller cancelled the call before it completed
    #[error("Request cancelled")]
    Cancelled,

    /// Server answered with something other than 200 where a result was required
    #[error("Unexpected status {status}: the server did not return the converted file")]
    UnexpectedStatus { status: u16, body: Bytes },

    /// A webhook is configured, so the result will not come back in the response
    #[error("Cannot store the result of a request that uses a webhook")]
    ConflictingMode,

    /// Destination directory or file could not be created or written
    #[error("Failed to write {}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GotenbergError {
    pub(crate) fn invalid_document(filename: &str, reason: impl Into<String>) -> Self {
        GotenbergError::InvalidDocument {
            filename: filename.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GotenbergError::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Server payload of an [`UnexpectedStatus`](GotenbergError::UnexpectedStatus) error, verbatim
    pub fn response_body(&self) -> Option<&Bytes> {
        match self {
            GotenbergError::UnexpectedStatus { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, GotenbergError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            GotenbergError::invalid_document("index.html", "content is empty").to_string(),
            "Invalid document index.html: content is empty"
        );
        assert_eq!(
            GotenbergError::InvalidHostname("ftp://gotenberg".to_string()).to_string(),
            "Invalid hostname ftp://gotenberg: must start with http:// or https://"
        );
        assert_eq!(
            GotenbergError::ConflictingMode.to_string(),
            "Cannot store the result of a request that uses a webhook"
        );
        assert_eq!(GotenbergError::Cancelled.to_string(), "Request cancelled");
        assert_eq!(
            GotenbergError::UnexpectedStatus {
                status: 500,
                body: Bytes::new()
            }
            .to_string(),
            "Unexpected status 500: the server did not return the converted file"
        );
    }

    #[test]
    fn test_response_body() {
        let err = GotenbergError::UnexpectedStatus {
            status: 400,
            body: Bytes::from_static(b"Invalid form data"),
        };
        assert_eq!(err.response_body().unwrap().as_ref(), b"Invalid form data");
        assert!(GotenbergError::ConflictingMode.response_body().is_none());
    }

    #[test]
    fn test_filesystem_source() {
        use std::error::Error as _;

        let err = GotenbergError::filesystem(
            "/tmp/out.pdf",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "Failed to write /tmp/out.pdf");
        assert!(err.source().is_some());
    }
}
