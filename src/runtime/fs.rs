//! File system operations (read, directory listing).

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn read_to_string_impl(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read file {}", path.display()))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn read_dir_names_impl(&self, path: &Path) -> Result<Vec<String>> {
        let entries = fs::read_dir(path)
            .with_context(|| format!("Failed to read directory {}", path.display()))?;
        entries
            .map(|entry| {
                let entry = entry.with_context(|| {
                    format!("Failed to read directory entry in {}", path.display())
                })?;
                Ok(entry.file_name().to_string_lossy().into_owned())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_real_runtime_read_to_string() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("package.json");
        fs::write(&file_path, r#"{"name":"pkg"}"#).unwrap();

        let content = runtime.read_to_string(&file_path).unwrap();
        assert_eq!(content, r#"{"name":"pkg"}"#);
    }

    #[test]
    fn test_real_runtime_read_dir_names() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("foo"), "").unwrap();
        fs::write(dir.path().join("foo.cmd"), "").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/inner"), "").unwrap();

        let mut names = runtime.read_dir_names(dir.path()).unwrap();
        names.sort();

        // Directories count as entries; their contents are not listed
        assert_eq!(names, vec!["foo", "foo.cmd", "nested"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_real_runtime_read_dir_names_includes_symlinks() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let target = dir.path().join("cli.js");
        fs::write(&target, "").unwrap();
        let bin = dir.path().join(".bin");
        fs::create_dir(&bin).unwrap();
        std::os::unix::fs::symlink(&target, bin.join("tool")).unwrap();
        // Dangling links still count as found
        std::os::unix::fs::symlink(dir.path().join("gone.js"), bin.join("broken")).unwrap();

        let mut names = runtime.read_dir_names(&bin).unwrap();
        names.sort();
        assert_eq!(names, vec!["broken", "tool"]);
    }

    #[test]
    fn test_real_runtime_errors() {
        let runtime = RealRuntime;
        let missing = std::path::Path::new("/nonexistent/path/package.json");

        let err = runtime.read_to_string(missing).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/path/package.json"));

        let err = runtime
            .read_dir_names(std::path::Path::new("/nonexistent/path"))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read directory"));
    }
}
