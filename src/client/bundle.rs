// ABOUTME: A local bundle file validated before any network call.
// ABOUTME: Derives the bundle name from the file name when none is given.

use super::error::ClientError;
use std::path::{Path, PathBuf};

/// A bundle archive ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    path: PathBuf,
    name: String,
}

impl Bundle {
    /// Validate `path` and settle the bundle name.
    ///
    /// An explicit name is trimmed; a blank or missing one falls back to the
    /// file name without its last extension.
    pub fn new(path: impl Into<PathBuf>, name: Option<&str>) -> Result<Self, ClientError> {
        let path = path.into();
        if !path.is_file() {
            return Err(ClientError::InvalidBundle {
                path,
                reason: "file does not exist or is not a regular file".to_string(),
            });
        }

        let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(n) => n.to_string(),
            None => default_name(&path).ok_or_else(|| ClientError::InvalidBundle {
                path: path.clone(),
                reason: "cannot derive a bundle name from the file name".to_string(),
            })?,
        };

        Ok(Self { path, name })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// File name sent with the multipart part.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }
}

fn default_name(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_rejected() {
        let err = Bundle::new("/definitely/not/here.zip", None).unwrap_err();
        assert!(matches!(err, ClientError::InvalidBundle { .. }));
    }

    #[test]
    fn directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = Bundle::new(dir.path(), Some("x")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidBundle { .. }));
    }

    #[test]
    fn name_defaults_to_stem() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("widget-1.0.0-bundle.zip");
        std::fs::write(&file, b"PK").unwrap();

        let bundle = Bundle::new(&file, None).unwrap();
        assert_eq!(bundle.name(), "widget-1.0.0-bundle");
        assert_eq!(bundle.file_name(), "widget-1.0.0-bundle.zip");
    }

    #[test]
    fn blank_name_falls_back_and_explicit_name_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bundle.zip");
        std::fs::write(&file, b"PK").unwrap();

        assert_eq!(Bundle::new(&file, Some("   ")).unwrap().name(), "bundle");
        assert_eq!(
            Bundle::new(&file, Some("  release-42 ")).unwrap().name(),
            "release-42"
        );
    }
}
