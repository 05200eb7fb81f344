//! notesfs Core Library
//!
//! This crate provides the core functionality for notesfs, a hierarchical
//! file system whose whole state lives in one line-oriented text file
//! (a "notes store").
//!
//! # Architecture
//!
//! - **Store file**: source of truth, appended to on import and rewritten
//!   atomically on delete and compaction
//! - **Registry**: in-memory list of live entries, rebuilt on every load
//!
//! Deletion only tombstones lines; `defrag` physically removes them and puts
//! entries back into tree order.
//!
//! # Quick Start
//!
//! ```text
//! let mut store = Store::open_or_create(Path::new("filesystem"))?;
//!
//! store.copy_in(Path::new("notes.txt"), "docs/notes.txt")?;
//! store.copy_out("docs/notes.txt", Path::new("restored.txt"))?;
//! store.remove("docs/")?;
//! store.defrag()?;
//! ```
//!
//! # Modules
//!
//! - `store`: store handle (main entry point)
//! - `entry`: file and directory entries
//! - `registry`: ordered set of live entries
//! - `tree`: tree ordering used by compaction
//! - `storage`: record format, content encoding, tombstones, file I/O
//! - `config`: application configuration

pub mod config;
pub mod entry;
pub mod registry;
pub mod storage;
pub mod store;
pub mod tree;

pub use config::Config;
pub use entry::Entry;
pub use registry::Registry;
pub use storage::{ParseWarning, StorageError, StorageResult};
pub use store::{Store, StoreStats};
pub use tree::tree_sort;
