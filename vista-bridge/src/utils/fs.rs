//! Filesystem helpers with operation + path error context.

use std::path::Path;

use crate::{Error, Result};

/// Ensure a directory exists, creating it recursively if needed.
pub fn ensure_dir_all_sync_with_op(op: &'static str, path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| Error::io_path(op, path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        ensure_dir_all_sync_with_op("creating test directory", &nested).unwrap();
        assert!(nested.is_dir());
    }
}
