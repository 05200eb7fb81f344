//! Storage layer
//!
//! Handles the on-disk notes store.
//!
//! ## Layout
//!
//! - **record**: line format, parsing and rendering
//! - **encoding**: plain-text vs base64 content
//! - **tombstone**: in-place logical deletion
//! - **persistence**: appends, atomic rewrites and external file I/O
//!
//! The store file is the source of truth; the in-memory registry is
//! rebuilt from it on every load.

pub mod encoding;
pub mod error;
pub mod persistence;
pub mod record;
pub mod tombstone;

pub use error::{StorageError, StorageResult};
pub use persistence::resolve_store_path;
pub use record::{ParseWarning, HEADER_TAG, MAX_LINE_LEN, MAX_NAME_LEN};
