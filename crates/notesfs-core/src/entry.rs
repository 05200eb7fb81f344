//! Store entries
//!
//! An [`Entry`] is the in-memory form of one file or directory kept in the
//! store. Entries are built three ways:
//!
//! - from an external file ([`Entry::from_external`] / [`Entry::from_bytes`])
//! - from parsed store lines ([`Entry::from_record`])
//! - as an empty directory ([`Entry::directory`])
//!
//! All three apply the same name-length limit.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::storage::encoding::{decode_content, encode_content};
use crate::storage::persistence::read_external;
use crate::storage::record::{MAX_NAME_LEN, SEPARATOR};
use crate::storage::{StorageError, StorageResult};

/// A file or directory held in the store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry {
    /// Full path name; directories end with `/`
    pub name: String,
    /// Whether this entry is a directory (directories carry no content)
    pub is_dir: bool,
    /// Whether `content` holds base64 chunks rather than text lines
    pub is_encoded: bool,
    /// Text lines (with terminators) or base64 chunks
    pub content: Vec<String>,
}

impl Entry {
    /// Create a file entry from raw bytes
    pub fn from_bytes(name: &str, bytes: &[u8]) -> Self {
        let encoded = encode_content(bytes);
        Self {
            name: truncate_name(name),
            is_dir: false,
            is_encoded: encoded.is_encoded,
            content: encoded.lines,
        }
    }

    /// Create an entry from a file or directory outside the store
    ///
    /// A directory yields an empty directory entry; a file is read in full
    /// and run through the content encoder.
    pub fn from_external(path: &Path, name: &str) -> StorageResult<Self> {
        let metadata = std::fs::metadata(path)
            .map_err(|e| StorageError::from_read(e, path.to_path_buf()))?;

        if metadata.is_dir() {
            return Ok(Self::directory(name));
        }

        let bytes = read_external(path)?;
        Ok(Self::from_bytes(name, &bytes))
    }

    /// Create a file entry from lines already in stored form
    pub fn from_record(name: &str, content: Vec<String>, is_encoded: bool) -> Self {
        Self {
            name: truncate_name(name),
            is_dir: false,
            is_encoded,
            content,
        }
    }

    /// Create an empty directory entry
    ///
    /// The trailing separator is added when missing.
    pub fn directory(name: &str) -> Self {
        Self {
            name: directory_name(name),
            is_dir: true,
            is_encoded: false,
            content: Vec::new(),
        }
    }

    /// Decode the entry's content back into the original bytes
    pub fn bytes(&self) -> StorageResult<Vec<u8>> {
        decode_content(&self.content, self.is_encoded).map_err(|e| StorageError::CorruptContent {
            name: self.name.clone(),
            details: e.to_string(),
        })
    }

    /// Size of the decoded content in bytes
    ///
    /// Encoded content that fails to decode reports its stored size.
    pub fn size(&self) -> usize {
        if self.is_dir {
            return 0;
        }
        match self.bytes() {
            Ok(bytes) => bytes.len(),
            Err(_) => self.content.iter().map(String::len).sum(),
        }
    }

    /// Whether `name` lies inside this entry
    ///
    /// A directory contains itself and every name it prefixes. Because
    /// directory names end with the separator, a prefix match always falls on
    /// a path segment boundary. A file only contains itself.
    pub fn contains(&self, name: &str) -> bool {
        if self.is_dir {
            name.starts_with(&self.name)
        } else {
            name == self.name
        }
    }
}

/// Limit a name to [`MAX_NAME_LEN`] characters
pub fn truncate_name(name: &str) -> String {
    match name.char_indices().nth(MAX_NAME_LEN) {
        Some((idx, _)) => name[..idx].to_string(),
        None => name.to_string(),
    }
}

/// Normalise a directory name: truncate, then make sure it ends with `/`
pub fn directory_name(name: &str) -> String {
    let base = name.strip_suffix(SEPARATOR).unwrap_or(name);
    let mut dir = match base.char_indices().nth(MAX_NAME_LEN - 1) {
        Some((idx, _)) => base[..idx].to_string(),
        None => base.to_string(),
    };
    dir.push(SEPARATOR);
    dir
}

/// Directory prefixes of `name`, root first
///
/// `a/b/c` yields `a/` then `a/b/`; a directory name does not include itself,
/// so `a/b/` yields only `a/`.
pub fn ancestor_dirs(name: &str) -> Vec<String> {
    name.char_indices()
        .filter(|&(idx, c)| c == SEPARATOR && idx + c.len_utf8() < name.len())
        .map(|(idx, c)| name[..idx + c.len_utf8()].to_string())
        .collect()
}
