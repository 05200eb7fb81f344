//! Store maintenance command handlers

use std::path::Path;

use anyhow::{Context, Result};

use notesfs_core::Store;

use crate::output::Output;

/// Create a new, empty store
pub fn init(path: &Path, output: &Output) -> Result<()> {
    let store = Store::create(path).with_context(|| format!("Failed to create store {:?}", path))?;

    output.success(&format!("Created store {}", store.path().display()));
    Ok(())
}

/// Compact the store into tree order
pub fn defrag(store: &mut Store, output: &Output) -> Result<()> {
    let dropped = store.stats()?.tombstoned_lines;
    store.defrag().context("Failed to defragment store")?;

    output.success(&format!(
        "Defragmented {} ({} deleted line(s) dropped)",
        store.path().display(),
        dropped
    ));
    Ok(())
}

/// Compact the store, keeping the current order
pub fn reindex(store: &mut Store, output: &Output) -> Result<()> {
    let dropped = store.stats()?.tombstoned_lines;
    store.reindex().context("Failed to reindex store")?;

    output.success(&format!(
        "Reindexed {} ({} deleted line(s) dropped)",
        store.path().display(),
        dropped
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use notesfs_core::Entry;
    use tempfile::TempDir;

    #[test]
    fn test_init_refuses_existing() {
        let temp_dir = TempDir::new().unwrap();
        let output = Output::new(OutputFormat::Quiet);
        let path = temp_dir.path().join("fs");

        init(&path, &output).unwrap();
        assert!(temp_dir.path().join("fs.notes").exists());
        assert!(init(&path, &output).is_err());
    }

    #[test]
    fn test_defrag_clears_tombstones() {
        let temp_dir = TempDir::new().unwrap();
        let output = Output::new(OutputFormat::Quiet);
        let mut store = Store::create(&temp_dir.path().join("fs")).unwrap();
        store.add_entry(Entry::from_bytes("f", b"x\n")).unwrap();
        store.remove("f").unwrap();
        assert_eq!(store.stats().unwrap().tombstoned_lines, 2);

        defrag(&mut store, &output).unwrap();
        assert_eq!(store.stats().unwrap().tombstoned_lines, 0);
    }
}
