use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::apod::ApodRecord;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// A downloaded wallpaper as shown in listings
#[derive(Debug, Clone, Serialize)]
pub struct WallpaperEntry {
    pub path: PathBuf,
    pub file_name: String,
    pub modified: Option<DateTime<Local>>,
    pub metadata: Option<ApodRecord>,
}

impl WallpaperEntry {
    /// Title from the sidecar, falling back to the file name
    pub fn display_name(&self) -> &str {
        self.metadata
            .as_ref()
            .map(|m| m.title.as_str())
            .unwrap_or(&self.file_name)
    }
}

/// The wallpaper directory and the metadata sidecars inside it
#[derive(Debug, Clone)]
pub struct WallpaperLibrary {
    dir: PathBuf,
}

impl WallpaperLibrary {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let library = Self { dir: dir.into() };
        library.ensure_dir()?;
        Ok(library)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating wallpaper directory {}", self.dir.display()))
    }

    /// Image files in the directory, newest name first
    pub fn list(&self) -> Result<Vec<WallpaperEntry>> {
        self.ensure_dir()?;

        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry
                .with_context(|| format!("reading wallpaper directory {}", self.dir.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().to_string();
            if !is_wallpaper_file(&file_name) {
                continue;
            }

            let modified = entry
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .map(DateTime::<Local>::from);

            entries.push(WallpaperEntry {
                metadata: load_metadata(entry.path()),
                path: entry.into_path(),
                file_name,
                modified,
            });
        }

        // Names start with the download timestamp
        entries.sort_by(|a, b| b.file_name.cmp(&a.file_name));
        Ok(entries)
    }

    pub fn save_metadata(&self, image: &Path, record: &ApodRecord) -> Result<PathBuf> {
        let sidecar = sidecar_path(image);
        let json = serde_json::to_string_pretty(record).context("serializing APOD metadata")?;
        fs::write(&sidecar, json)
            .with_context(|| format!("writing metadata {}", sidecar.display()))?;
        Ok(sidecar)
    }
}

/// `<image>.json` next to the image
pub fn sidecar_path(image: &Path) -> PathBuf {
    let mut name: OsString = image.as_os_str().to_owned();
    name.push(".json");
    PathBuf::from(name)
}

pub fn load_metadata(image: &Path) -> Option<ApodRecord> {
    let content = fs::read_to_string(sidecar_path(image)).ok()?;
    serde_json::from_str(&content).ok()
}

fn is_wallpaper_file(name: &str) -> bool {
    if name.starts_with('.') {
        return false;
    }
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}
