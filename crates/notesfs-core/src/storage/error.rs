//! Storage error handling
//!
//! Provides typed errors for store operations with descriptive messages
//! and recovery suggestions. Per-line anomalies found while loading a store
//! are not errors; see [`ParseWarning`](crate::storage::record::ParseWarning).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// First line of the store is not the version tag
    #[error("Invalid store format in '{path}': expected header \"{expected}\", found \"{found}\"")]
    InvalidHeader {
        path: PathBuf,
        expected: &'static str,
        found: String,
    },

    /// Store file does not exist
    #[error("Store not found: '{path}'")]
    StoreNotFound { path: PathBuf },

    /// File not found (when expected to exist)
    #[error("File not found: '{path}'")]
    NotFound { path: PathBuf },

    /// Store file already exists (when creating)
    #[error("Store already exists: '{path}'")]
    StoreExists { path: PathBuf },

    /// No live entry with this name
    #[error("Entry not found: '{name}'")]
    EntryNotFound { name: String },

    /// A live entry with this name already exists
    #[error("Entry already exists: '{name}'")]
    EntryExists { name: String },

    /// Entry name that cannot be stored
    #[error("Invalid entry name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// Directory entry whose name does not end with the separator
    #[error("Invalid directory name '{name}': directory names must end with '/'")]
    InvalidDirectoryName { name: String },

    /// Encoded entry content cannot be decoded
    #[error("Content of '{name}' is corrupted: {details}")]
    CorruptContent { name: String, details: String },

    /// Permission denied accessing path
    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Disk is full or quota exceeded
    #[error(
        "Disk full or quota exceeded while writing to '{path}'. Free up disk space and try again."
    )]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to read file
    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write file
    #[error("Failed to write '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Atomic write failed during rename
    #[error("Atomic write failed: could not rename '{from}' to '{to}': {source}")]
    AtomicWriteFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StorageError {
    /// Create an error from an I/O error with path context
    ///
    /// Classifies the error based on its kind (permission, disk full, etc.)
    pub fn from_io(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied {
                path,
                source: error,
            },
            io::ErrorKind::NotFound => StorageError::NotFound { path },
            _ if is_disk_full_error(&error) => StorageError::DiskFull {
                path,
                source: error,
            },
            _ => StorageError::WriteError {
                path,
                source: error,
            },
        }
    }

    /// Classify an I/O error that happened while reading
    pub fn from_read(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied {
                path,
                source: error,
            },
            io::ErrorKind::NotFound => StorageError::NotFound { path },
            _ => StorageError::ReadError {
                path,
                source: error,
            },
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StorageError::DiskFull { .. }
                | StorageError::PermissionDenied { .. }
                | StorageError::EntryExists { .. }
                | StorageError::EntryNotFound { .. }
        )
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StorageError::DiskFull { .. } => Some("Free up disk space and try again."),
            StorageError::PermissionDenied { .. } => {
                Some("Check file and directory permissions. You may need to run with different permissions or change ownership.")
            }
            StorageError::InvalidHeader { .. } => {
                Some("The file is not a notes store. Check the path, or create a new store with `notesfs init`.")
            }
            StorageError::StoreNotFound { .. } => {
                Some("Create the store first with `notesfs init`.")
            }
            StorageError::EntryExists { .. } => {
                Some("Remove the existing entry first, or choose a different name.")
            }
            _ => None,
        }
    }
}

/// Check if an I/O error indicates disk full condition
fn is_disk_full_error(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left")
        || msg.contains("disk full")
        || msg.contains("quota exceeded")
        || msg.contains("not enough space")
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_classification() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = StorageError::from_io(io_err, PathBuf::from("/test/path"));

        assert!(matches!(err, StorageError::PermissionDenied { .. }));
        assert!(err.is_recoverable());
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_not_found_classification() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = StorageError::from_read(io_err, PathBuf::from("/missing/file"));

        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[test]
    fn test_disk_full_detection() {
        let io_err = io::Error::new(io::ErrorKind::Other, "No space left on device");
        let err = StorageError::from_io(io_err, PathBuf::from("/full/disk"));

        assert!(matches!(err, StorageError::DiskFull { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_read_error_classification() {
        let io_err = io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8");
        let err = StorageError::from_read(io_err, PathBuf::from("/data/fs.notes"));

        assert!(matches!(err, StorageError::ReadError { .. }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_invalid_header_display() {
        let err = StorageError::InvalidHeader {
            path: PathBuf::from("/data/fs.notes"),
            expected: "NOTES V1.0",
            found: "NOTES V2.0".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("NOTES V1.0"));
        assert!(msg.contains("NOTES V2.0"));
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_entry_errors_display() {
        let err = StorageError::EntryNotFound {
            name: "a/notes.txt".to_string(),
        };
        assert!(err.to_string().contains("a/notes.txt"));

        let err = StorageError::EntryExists {
            name: "a/".to_string(),
        };
        assert!(err.to_string().contains("already exists"));
    }
}
