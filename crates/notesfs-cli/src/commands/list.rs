//! List command handler
//!
//! Renders the registry as `ls -l` style lines. Permissions, link count,
//! owner, group and modification time come from the store file itself; type
//! and size come from each entry.

use std::fs::Metadata;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use notesfs_core::{Entry, Store};

use crate::output::Output;

/// One rendered listing line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    pub name: String,
    pub is_dir: bool,
    pub is_encoded: bool,
    pub permissions: String,
    pub links: u64,
    pub owner: String,
    pub group: String,
    pub size: usize,
    pub modified: String,
}

/// Store file attributes shared by every row
#[derive(Debug, Clone)]
struct StoreAttributes {
    permissions: String,
    links: u64,
    owner: String,
    group: String,
    modified: String,
}

/// List every live entry
pub fn list(store: &Store, output: &Output) -> Result<()> {
    let rows = listing_rows(store)?;
    output.print_listing(&rows);
    Ok(())
}

/// Build listing rows for every live entry, in store order
pub fn listing_rows(store: &Store) -> Result<Vec<ListingRow>> {
    let attributes = store_attributes(store.path())?;
    Ok(store
        .entries()
        .iter()
        .map(|entry| row(entry, &attributes))
        .collect())
}

fn row(entry: &Entry, attributes: &StoreAttributes) -> ListingRow {
    ListingRow {
        name: entry.name.clone(),
        is_dir: entry.is_dir,
        is_encoded: entry.is_encoded,
        permissions: attributes.permissions.clone(),
        links: attributes.links,
        owner: attributes.owner.clone(),
        group: attributes.group.clone(),
        size: entry.size(),
        modified: attributes.modified.clone(),
    }
}

fn store_attributes(path: &Path) -> Result<StoreAttributes> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to read attributes of {:?}", path))?;

    let modified = metadata
        .modified()
        .map(|time| DateTime::<Local>::from(time).format("%b %d %H:%M").to_string())
        .unwrap_or_else(|_| "-".to_string());

    Ok(platform_attributes(&metadata, modified))
}

#[cfg(unix)]
fn platform_attributes(metadata: &Metadata, modified: String) -> StoreAttributes {
    use std::os::unix::fs::MetadataExt;

    StoreAttributes {
        permissions: format_mode(metadata.mode()),
        links: metadata.nlink(),
        owner: metadata.uid().to_string(),
        group: metadata.gid().to_string(),
        modified,
    }
}

#[cfg(not(unix))]
fn platform_attributes(metadata: &Metadata, modified: String) -> StoreAttributes {
    let permissions = if metadata.permissions().readonly() {
        "r--r--r--"
    } else {
        "rw-rw-rw-"
    };
    StoreAttributes {
        permissions: permissions.to_string(),
        links: 1,
        owner: "-".to_string(),
        group: "-".to_string(),
        modified,
    }
}

/// Render the permission bits of a file mode as `rwxr-xr-x`
pub fn format_mode(mode: u32) -> String {
    const FLAGS: [(u32, char); 9] = [
        (0o400, 'r'),
        (0o200, 'w'),
        (0o100, 'x'),
        (0o040, 'r'),
        (0o020, 'w'),
        (0o010, 'x'),
        (0o004, 'r'),
        (0o002, 'w'),
        (0o001, 'x'),
    ];
    FLAGS
        .iter()
        .map(|&(bit, c)| if mode & bit != 0 { c } else { '-' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_mode() {
        assert_eq!(format_mode(0o755), "rwxr-xr-x");
        assert_eq!(format_mode(0o100644), "rw-r--r--");
        assert_eq!(format_mode(0), "---------");
    }

    #[test]
    fn test_listing_rows() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::create(&temp_dir.path().join("fs")).unwrap();
        store
            .add_entry(Entry::from_bytes("a/notes.txt", b"hello\n"))
            .unwrap();

        let rows = listing_rows(&store).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].name, "a/");
        assert!(rows[0].is_dir);
        assert_eq!(rows[0].size, 0);

        assert_eq!(rows[1].name, "a/notes.txt");
        assert!(!rows[1].is_dir);
        assert_eq!(rows[1].size, 6);
        assert_eq!(rows[1].permissions, rows[0].permissions);
        assert_eq!(rows[1].permissions.len(), 9);
    }
}
