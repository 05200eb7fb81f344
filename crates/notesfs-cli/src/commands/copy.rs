//! Copy command handlers
//!
//! Move file contents between the outside world and the store.

use std::path::PathBuf;

use anyhow::{Context, Result};

use notesfs_core::Store;

use crate::output::Output;

/// Copy an external file into the store
pub fn copy_in(store: &mut Store, external: PathBuf, name: String, output: &Output) -> Result<()> {
    store
        .copy_in(&external, &name)
        .with_context(|| format!("Failed to copy {:?} into the store", external))?;

    output.success(&format!("Copied {} to {}", external.display(), name));
    Ok(())
}

/// Copy an entry out of the store
pub fn copy_out(store: &Store, name: String, external: PathBuf, output: &Output) -> Result<()> {
    store
        .copy_out(&name, &external)
        .with_context(|| format!("Failed to copy {} out of the store", name))?;

    output.success(&format!("Copied {} to {}", name, external.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_copy_in_and_out() {
        let temp_dir = TempDir::new().unwrap();
        let output = Output::new(OutputFormat::Quiet);
        let mut store = Store::create(&temp_dir.path().join("fs")).unwrap();

        let source = temp_dir.path().join("in.bin");
        fs::write(&source, [0u8, 1, 2, 255]).unwrap();

        copy_in(&mut store, source, "bin/in.bin".to_string(), &output).unwrap();
        assert!(store.exists("bin/"));

        let target = temp_dir.path().join("out.bin");
        copy_out(&store, "bin/in.bin".to_string(), target.clone(), &output).unwrap();
        assert_eq!(fs::read(&target).unwrap(), vec![0u8, 1, 2, 255]);
    }

    #[test]
    fn test_copy_out_missing_entry() {
        let temp_dir = TempDir::new().unwrap();
        let output = Output::new(OutputFormat::Quiet);
        let store = Store::create(&temp_dir.path().join("fs")).unwrap();

        let err = copy_out(
            &store,
            "missing".to_string(),
            temp_dir.path().join("x"),
            &output,
        )
        .unwrap_err();
        assert!(err.downcast_ref::<notesfs_core::StorageError>().is_some());
    }
}
