//! Store handle
//!
//! The `Store` owns one notes file and the registry of live entries loaded
//! from it. Every operation goes through the handle; nothing is global.
//!
//! ## Mutations
//!
//! - **add / copy_in / mkdir**: append records to the end of the file,
//!   creating missing parent directories first
//! - **remove**: rewrite the file with the entry's lines tombstoned
//! - **defrag**: rewrite the file in tree order without tombstones
//! - **reindex**: rewrite the file in current order without tombstones
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open_or_create(Path::new("filesystem"))?;
//!
//! store.copy_in(Path::new("notes.txt"), "a/notes.txt")?;  // also creates a/
//! store.remove("a/")?;                                    // tombstones both
//! store.defrag()?;                                        // drops them
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::entry::{ancestor_dirs, truncate_name, Entry};
use crate::registry::Registry;
use crate::storage::persistence::{
    append, atomic_write, create_external_dir, read_store, resolve_store_path, write_external,
};
use crate::storage::record::{parse_store, render_entry, render_store, SEPARATOR};
use crate::storage::tombstone::tombstone;
use crate::storage::{ParseWarning, StorageError, StorageResult, HEADER_TAG};
use crate::tree::tree_sort;

/// Statistics about a store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Live entries
    pub entries: usize,
    /// Live directories
    pub directories: usize,
    /// Live files
    pub files: usize,
    /// Live files stored as base64
    pub encoded: usize,
    /// Tombstoned lines still in the file
    pub tombstoned_lines: usize,
    /// Size of the store file in bytes
    pub size: u64,
}

impl StoreStats {
    /// Format the store size in human-readable form
    pub fn size_human(&self) -> String {
        format_bytes(self.size)
    }
}

/// Format bytes in human-readable form
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Handle to an open notes store
#[derive(Debug)]
pub struct Store {
    /// Path of the store file
    path: PathBuf,
    /// Live entries
    registry: Registry,
    /// Problems found during the last load
    warnings: Vec<ParseWarning>,
    /// Tombstoned lines currently in the file
    tombstoned_lines: usize,
}

impl Store {
    /// Create a new, empty store
    ///
    /// The `.notes` extension is added to `path` when missing.
    pub fn create(path: &Path) -> StorageResult<Self> {
        let path = resolve_store_path(path);
        if path.exists() {
            return Err(StorageError::StoreExists { path });
        }

        atomic_write(&path, format!("{}\n", HEADER_TAG).as_bytes())?;
        info!("Created store {}", path.display());

        Ok(Self {
            path,
            registry: Registry::new(),
            warnings: Vec::new(),
            tombstoned_lines: 0,
        })
    }

    /// Open an existing store
    ///
    /// Fails if the file is missing or its first line is not the version
    /// tag. Malformed lines elsewhere are skipped and kept in
    /// [`Store::warnings`].
    pub fn open(path: &Path) -> StorageResult<Self> {
        let path = resolve_store_path(path);
        if !path.exists() {
            return Err(StorageError::StoreNotFound { path });
        }

        let text = read_store(&path)?;
        let parsed = parse_store(&text, &path)?;
        debug!(
            "Loaded {} entries from {} ({} warnings, {} tombstoned lines)",
            parsed.entries.len(),
            path.display(),
            parsed.warnings.len(),
            parsed.tombstoned_lines
        );

        Ok(Self {
            path,
            registry: Registry::from_entries(parsed.entries),
            warnings: parsed.warnings,
            tombstoned_lines: parsed.tombstoned_lines,
        })
    }

    /// Open a store, creating it if it does not exist
    pub fn open_or_create(path: &Path) -> StorageResult<Self> {
        if resolve_store_path(path).exists() {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    /// Path of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Problems found while loading
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// All live entries in store order
    pub fn entries(&self) -> &[Entry] {
        self.registry.all()
    }

    /// Check whether a live entry has this name
    pub fn exists(&self, name: &str) -> bool {
        self.registry.exists(name)
    }

    /// Look up a live entry by name
    pub fn find(&self, name: &str) -> Option<&Entry> {
        self.registry.find(name)
    }

    /// Look up a name as given, then as a directory
    fn lookup(&self, name: &str) -> StorageResult<&Entry> {
        let name = truncate_name(name);
        if let Some(entry) = self.registry.find(&name) {
            return Ok(entry);
        }
        if !name.ends_with(SEPARATOR) {
            if let Some(entry) = self.registry.find(&format!("{}{}", name, SEPARATOR)) {
                return Ok(entry);
            }
        }
        Err(StorageError::EntryNotFound { name })
    }

    // ==================== Writing ====================

    /// Append a new entry to the store
    ///
    /// Missing parent directories are created first, root to leaf. Nothing
    /// is written if the name is already taken.
    pub fn add_entry(&mut self, entry: Entry) -> StorageResult<()> {
        validate_name(&entry)?;

        if self.registry.exists(&entry.name) {
            return Err(StorageError::EntryExists { name: entry.name });
        }

        let ancestors = self.missing_ancestors(&entry.name);

        let mut text = String::new();
        for dir in &ancestors {
            render_entry(dir, &mut text);
        }
        render_entry(&entry, &mut text);

        append(&self.path, &text)?;

        for dir in ancestors {
            debug!("Created missing directory {}", dir.name);
            self.registry.append(dir);
        }
        debug!("Appended {} to {}", entry.name, self.path.display());
        self.registry.append(entry);

        Ok(())
    }

    /// Directory entries that must exist before `name` can be added
    pub fn missing_ancestors(&self, name: &str) -> Vec<Entry> {
        ancestor_dirs(name)
            .iter()
            .filter(|dir| !self.registry.exists(dir))
            .map(|dir| Entry::directory(dir))
            .collect()
    }

    /// Import an external file or directory under `name`
    pub fn copy_in(&mut self, external: &Path, name: &str) -> StorageResult<()> {
        let entry = Entry::from_external(external, name)?;
        let stored_name = entry.name.clone();
        self.add_entry(entry)?;
        info!("Copied {} into {}", external.display(), stored_name);
        Ok(())
    }

    /// Create an empty directory
    pub fn mkdir(&mut self, name: &str) -> StorageResult<()> {
        let entry = Entry::directory(name);
        let stored_name = entry.name.clone();
        self.add_entry(entry)?;
        info!("Created directory {}", stored_name);
        Ok(())
    }

    // ==================== Deleting ====================

    /// Tombstone an entry, and for a directory everything inside it
    ///
    /// Returns the number of lines tombstoned. The lines stay in the file
    /// until the next [`Store::defrag`].
    pub fn remove(&mut self, name: &str) -> StorageResult<usize> {
        let target = self.lookup(name)?.clone();

        let text = read_store(&self.path)?;
        let result = tombstone(&text, &target);
        atomic_write(&self.path, result.text.as_bytes())?;

        let removed = self.registry.remove_contained(&target);
        self.tombstoned_lines += result.lines;

        info!(
            "Removed {} ({} entries, {} lines tombstoned)",
            target.name, removed, result.lines
        );
        Ok(result.lines)
    }

    // ==================== Compaction ====================

    /// Rewrite the store in tree order, dropping tombstoned lines
    ///
    /// Running it twice in a row produces identical files.
    pub fn defrag(&mut self) -> StorageResult<()> {
        let sorted = tree_sort(self.registry.all().to_vec());
        self.rewrite(&sorted)?;
        self.registry.reorder(sorted);
        info!("Defragmented {}", self.path.display());
        Ok(())
    }

    /// Rewrite the store in its current order, dropping tombstoned lines
    pub fn reindex(&mut self) -> StorageResult<()> {
        let entries = self.registry.all().to_vec();
        self.rewrite(&entries)?;
        info!("Reindexed {}", self.path.display());
        Ok(())
    }

    /// Replace the whole file with `entries`
    fn rewrite(&mut self, entries: &[Entry]) -> StorageResult<()> {
        let text = render_store(entries);
        atomic_write(&self.path, text.as_bytes())?;

        debug!(
            "Dropped {} tombstoned lines and {} skipped lines",
            self.tombstoned_lines,
            self.warnings.len()
        );
        self.tombstoned_lines = 0;
        self.warnings.clear();
        Ok(())
    }

    // ==================== Export ====================

    /// Export an entry outside the store
    ///
    /// A directory becomes an empty external directory; its contents are not
    /// copied. A file is decoded and written byte for byte.
    pub fn copy_out(&self, name: &str, external: &Path) -> StorageResult<()> {
        let entry = self.lookup(name)?;

        if entry.is_dir {
            create_external_dir(external)?;
            info!("Created directory {} from {}", external.display(), entry.name);
        } else {
            let bytes = entry.bytes()?;
            write_external(external, &bytes)?;
            info!("Copied {} out to {}", entry.name, external.display());
        }
        Ok(())
    }

    // ==================== Stats ====================

    /// Gather store statistics
    pub fn stats(&self) -> StorageResult<StoreStats> {
        let size = std::fs::metadata(&self.path)
            .map_err(|e| StorageError::from_read(e, self.path.clone()))?
            .len();

        let entries = self.registry.all();
        let directories = entries.iter().filter(|entry| entry.is_dir).count();

        Ok(StoreStats {
            entries: entries.len(),
            directories,
            files: entries.len() - directories,
            encoded: entries.iter().filter(|entry| entry.is_encoded).count(),
            tombstoned_lines: self.tombstoned_lines,
            size,
        })
    }
}

/// Reject names that cannot be written as a single record line
fn validate_name(entry: &Entry) -> StorageResult<()> {
    if entry.name.is_empty() || (entry.is_dir && entry.name == SEPARATOR.to_string()) {
        return Err(StorageError::InvalidName {
            name: entry.name.clone(),
            reason: "name is empty",
        });
    }
    if entry.name.contains(['\n', '\r']) {
        return Err(StorageError::InvalidName {
            name: entry.name.clone(),
            reason: "name contains a line break",
        });
    }
    if entry.is_dir && !entry.name.ends_with(SEPARATOR) {
        return Err(StorageError::InvalidDirectoryName {
            name: entry.name.clone(),
        });
    }
    if !entry.is_dir && entry.name.ends_with(SEPARATOR) {
        return Err(StorageError::InvalidName {
            name: entry.name.clone(),
            reason: "file name ends with '/'",
        });
    }
    Ok(())
}
