use std::path::{Path, PathBuf};
use thiserror::Error;

/// A single file's upload failing. Recovered at the worker boundary: the
/// scheduler tallies it and moves on, it never aborts sibling uploads.
#[derive(Error, Debug)]
pub enum TransferError {
    /// File disappeared (or never existed) between scheduling and upload
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Local file is not readable
    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Any other local read failure
    #[error("failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// Bucket rejected our credentials
    #[error("access denied for bucket '{bucket}': {message}")]
    AccessDenied { bucket: String, message: String },

    /// Everything else the SDK reports (network, quota, throttling)
    #[error("s3 error: {0}")]
    Sdk(String),
}

impl TransferError {
    /// Map a local filesystem error onto the variants the operator cares
    /// about distinguishing.
    pub fn from_io(error: std::io::Error, path: &Path) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::FileNotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => Self::Read {
                path: path.to_path_buf(),
                message: error.to_string(),
            },
        }
    }

    /// Classify an AWS SDK error, surfacing auth problems separately since
    /// they usually mean the whole run is misconfigured.
    pub fn from_sdk<E: std::fmt::Display>(bucket: &str, error: E) -> Self {
        let message = error.to_string();
        let lowered = message.to_lowercase();
        if lowered.contains("access denied") || lowered.contains("forbidden") {
            Self::AccessDenied {
                bucket: bucket.to_string(),
                message,
            }
        } else {
            Self::Sdk(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_map_by_kind() {
        let path = PathBuf::from("missing.txt");
        let err = TransferError::from_io(
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            &path,
        );
        assert!(matches!(err, TransferError::FileNotFound { .. }));

        let err = TransferError::from_io(
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"),
            &path,
        );
        assert!(matches!(err, TransferError::PermissionDenied { .. }));

        let err = TransferError::from_io(
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read"),
            &path,
        );
        assert!(matches!(err, TransferError::Read { .. }));
    }

    #[test]
    fn sdk_errors_surface_auth_failures() {
        let err = TransferError::from_sdk("my-bucket", "Access Denied (Service: S3)");
        assert!(matches!(err, TransferError::AccessDenied { .. }));

        let err = TransferError::from_sdk("my-bucket", "connection reset by peer");
        assert!(matches!(err, TransferError::Sdk(_)));
    }
}
