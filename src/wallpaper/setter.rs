use image::{ImageReader, Limits};
use std::path::{Path, PathBuf};

use super::backend::DesktopBackend;
use crate::error::WallpaperError;

/// Decode allocation ceiling; HD mosaics exceed the image crate's 512 MiB default
pub const MAX_DECODE_ALLOC: u64 = 4 * 1024 * 1024 * 1024;

/// Resolve `path` to an absolute path and fully decode it as an image
pub fn validate_image(path: &Path) -> Result<PathBuf, WallpaperError> {
    let abs = path.canonicalize().map_err(|e| {
        WallpaperError::wallpaper_set("Could not resolve wallpaper path")
            .with_path(path)
            .with_detail("reason", e)
    })?;
    let abs = strip_verbatim_prefix(abs);

    let invalid = |reason: String| {
        WallpaperError::wallpaper_set("File is not a valid image")
            .with_path(&abs)
            .with_detail("reason", reason)
    };

    let mut limits = Limits::default();
    limits.max_alloc = Some(MAX_DECODE_ALLOC);

    let mut reader = ImageReader::open(&abs)
        .map_err(|e| invalid(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| invalid(e.to_string()))?;
    reader.limits(limits);
    reader.decode().map_err(|e| invalid(e.to_string()))?;

    Ok(abs)
}

/// Hand a validated absolute path to the desktop backend
pub fn apply(backend: &dyn DesktopBackend, path: &Path) -> Result<(), WallpaperError> {
    backend.apply(path).map_err(|e| {
        WallpaperError::wallpaper_set("Failed to set wallpaper")
            .with_path(path)
            .with_detail("backend", backend.name())
            .with_detail("reason", format!("{:#}", e))
    })
}

/// Validate then apply; the backend is never called for an invalid image
pub fn set(backend: &dyn DesktopBackend, path: &Path) -> Result<PathBuf, WallpaperError> {
    let abs = validate_image(path)?;
    apply(backend, &abs)?;
    Ok(abs)
}

#[cfg(windows)]
fn strip_verbatim_prefix(path: PathBuf) -> PathBuf {
    match path.to_str().and_then(|s| s.strip_prefix(r"\\?\")) {
        Some(plain) => PathBuf::from(plain),
        None => path,
    }
}

#[cfg(not(windows))]
fn strip_verbatim_prefix(path: PathBuf) -> PathBuf {
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_support::{RecordingBackend, png_bytes};

    #[test]
    fn test_corrupt_image_never_reaches_backend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("20240101_000000_photo.jpg");
        std::fs::write(&path, b"<html>not an image</html>").unwrap();

        let backend = RecordingBackend::default();
        let err = set(&backend, &path).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::WallpaperSet);
        assert!(err.details().contains_key("reason"));
        assert!(backend.applied().is_empty());
    }

    #[test]
    fn test_truncated_png_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cut.png");
        let png = png_bytes();
        std::fs::write(&path, &png[..png.len() / 2]).unwrap();

        let backend = RecordingBackend::default();
        assert!(set(&backend, &path).is_err());
        assert!(backend.applied().is_empty());
    }

    #[test]
    fn test_missing_file_is_wallpaper_set_error() {
        let backend = RecordingBackend::default();
        let err = set(&backend, Path::new("/definitely/not/here.png")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WallpaperSet);
        assert!(backend.applied().is_empty());
    }

    #[test]
    fn test_valid_image_applied_with_absolute_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("good.png");
        std::fs::write(&path, png_bytes()).unwrap();

        let backend = RecordingBackend::default();
        let abs = set(&backend, &path).unwrap();

        assert!(abs.is_absolute());
        assert_eq!(backend.applied(), vec![abs]);
    }

    #[test]
    fn test_image_larger_than_default_decode_limit_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mosaic.png");
        // 23200 x 23200 grayscale decodes to ~538 MB, above the 512 MiB default
        {
            let big = image::GrayImage::new(23_200, 23_200);
            big.save_with_format(&path, image::ImageFormat::Png).unwrap();
        }

        let backend = RecordingBackend::default();
        let abs = set(&backend, &path).unwrap();
        assert_eq!(backend.applied(), vec![abs]);
    }

    #[test]
    fn test_backend_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("good.png");
        std::fs::write(&path, png_bytes()).unwrap();

        let backend = RecordingBackend::failing();
        let err = set(&backend, &path).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::WallpaperSet);
        assert_eq!(err.details()["backend"], "recording");
        assert_eq!(backend.applied().len(), 1);
    }
}
