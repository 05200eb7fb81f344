//! Store file I/O
//!
//! The store grows by appending records, and is otherwise replaced whole with
//! atomic writes (write to temp file, then rename) so a failed rewrite leaves
//! the previous store intact.
//!
//! Also holds the raw byte reader/writer used to import and export external
//! files.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{StorageError, StorageResult};

/// Extension given to store files
pub const STORE_EXTENSION: &str = "notes";

/// Resolve a store path, adding the `.notes` extension when missing
pub fn resolve_store_path(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == STORE_EXTENSION) {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".");
        name.push(STORE_EXTENSION);
        PathBuf::from(name)
    }
}

/// Read the whole store as text
pub fn read_store(path: &Path) -> StorageResult<String> {
    fs::read_to_string(path).map_err(|e| StorageError::from_read(e, path.to_path_buf()))
}

/// Append text to the end of the store
///
/// Existing bytes are never touched.
pub fn append(path: &Path, text: &str) -> StorageResult<()> {
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|e| StorageError::from_io(e, path.to_path_buf()))?;

    file.write_all(text.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|e| StorageError::from_io(e, path.to_path_buf()))
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// The rename is only attempted once the temp file is completely written.
pub fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StorageError::from_io(e, parent.to_path_buf()))?;
    }

    let temp_path = temp_path_for(path);

    let write_temp = || -> std::io::Result<()> {
        let mut file = File::create(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()
    };

    if let Err(e) = write_temp() {
        let _ = fs::remove_file(&temp_path);
        return Err(StorageError::from_io(e, temp_path));
    }

    fs::rename(&temp_path, path).map_err(|source| {
        let _ = fs::remove_file(&temp_path);
        StorageError::AtomicWriteFailed {
            from: temp_path.clone(),
            to: path.to_path_buf(),
            source,
        }
    })
}

/// Temp file used while rewriting `path`
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Read an external file's raw bytes
pub fn read_external(path: &Path) -> StorageResult<Vec<u8>> {
    fs::read(path).map_err(|e| StorageError::from_read(e, path.to_path_buf()))
}

/// Write raw bytes to an external file, replacing any previous content
pub fn write_external(path: &Path, data: &[u8]) -> StorageResult<()> {
    fs::write(path, data).map_err(|e| StorageError::from_io(e, path.to_path_buf()))
}

/// Create an external directory
pub fn create_external_dir(path: &Path) -> StorageResult<()> {
    fs::create_dir(path).map_err(|e| StorageError::from_io(e, path.to_path_buf()))
}
