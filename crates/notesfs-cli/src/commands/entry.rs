//! Entry command handlers

use anyhow::{Context, Result};

use notesfs_core::Store;

use crate::output::Output;

/// Create a directory
pub fn mkdir(store: &mut Store, name: String, output: &Output) -> Result<()> {
    store
        .mkdir(&name)
        .with_context(|| format!("Failed to create directory {}", name))?;

    output.success(&format!("Created directory {}", name));
    Ok(())
}

/// Delete an entry
///
/// The entry's lines stay in the store, marked deleted, until `defrag`.
pub fn remove(store: &mut Store, name: String, output: &Output) -> Result<()> {
    let lines = store
        .remove(&name)
        .with_context(|| format!("Failed to remove {}", name))?;

    output.success(&format!("Removed {} ({} line(s) marked deleted)", name, lines));
    Ok(())
}
