use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

/// Subdirectory of the data directory holding uploaded report images.
pub const IMAGES_DIR: &str = "images";

/// Stem used when an upload carries no usable file name.
const FALLBACK_STEM: &str = "report";

#[derive(Error, Debug)]
pub enum StagingError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Images directory under `data_dir`.
pub fn images_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(IMAGES_DIR)
}

/// Write an uploaded image under `images_dir` as `<stem>_<8 hex>.<ext>`.
///
/// Only the final component of `filename` is used. Returns the stored path.
pub fn save_image(
    images_dir: &Path,
    image_bytes: &[u8],
    filename: &str,
) -> Result<PathBuf, StagingError> {
    std::fs::create_dir_all(images_dir)?;

    let target_path = images_dir.join(unique_file_name(filename));
    std::fs::write(&target_path, image_bytes)?;

    tracing::debug!(
        path = %target_path.display(),
        size = image_bytes.len(),
        "Report image stored"
    );

    Ok(target_path)
}

/// Remove a stored image. `Ok(false)` when there was nothing to remove.
pub fn delete_image(image_path: &Path) -> Result<bool, StagingError> {
    match std::fs::remove_file(image_path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn unique_file_name(filename: &str) -> String {
    let base = Path::new(filename.trim());
    let stem = base
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_STEM);
    let suffix = &Uuid::new_v4().simple().to_string()[..8];

    match base.extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!("{stem}_{suffix}.{ext}"),
        _ => format!("{stem}_{suffix}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_image_writes_under_images_dir() {
        let dir = tempfile::tempdir().unwrap();
        let images = images_dir(dir.path());

        let path = save_image(&images, b"jpeg bytes", "scan.jpg").unwrap();

        assert!(path.starts_with(dir.path().join("images")));
        assert_eq!(std::fs::read(&path).unwrap(), b"jpeg bytes");

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("scan_"));
        assert!(name.ends_with(".jpg"));
        assert_eq!(name.len(), "scan_".len() + 8 + ".jpg".len());
    }

    #[test]
    fn same_name_never_collides() {
        let dir = tempfile::tempdir().unwrap();
        let first = save_image(dir.path(), b"a", "scan.jpg").unwrap();
        let second = save_image(dir.path(), b"b", "scan.jpg").unwrap();
        assert_ne!(first, second);
        assert_eq!(std::fs::read(&first).unwrap(), b"a");
    }

    #[test]
    fn directory_parts_of_name_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_image(dir.path(), b"x", "../../etc/passwd.png").unwrap();
        assert_eq!(path.parent().unwrap(), dir.path());
        assert!(path
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("passwd_"));
    }

    #[test]
    fn blank_name_uses_fallback_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_image(dir.path(), b"x", "  ").unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("report_"));
        assert_eq!(name.len(), "report_".len() + 8);
    }

    #[test]
    fn delete_image_removes_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_image(dir.path(), b"x", "scan.jpg").unwrap();

        assert!(delete_image(&path).unwrap());
        assert!(!path.exists());
        assert!(!delete_image(&path).unwrap());
    }
}
