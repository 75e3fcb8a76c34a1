//! Wallpaper acquisition workflow
//!
//! [`WallpaperManager`] ties the APOD client, the image fetcher, the wallpaper
//! library and the desktop backend together. Each call is independent; callers
//! serialize them (see [`crate::app::dispatch`]).

use anyhow::Result;
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::backend::{DesktopBackend, SystemBackend};
use super::library::{self, WallpaperEntry, WallpaperLibrary};
use super::setter;
use crate::apod::{ApodClient, ApodRecord, ApodSource, MediaType};
use crate::config::{API_KEY_ENV, AppConfig};
use crate::download::{HttpImageFetcher, ImageFetcher};
use crate::error::WallpaperError;
use crate::ui::prelude::*;

/// A downloaded APOD image with the metadata shown next to it
#[derive(Debug, Clone, Serialize)]
pub struct ApodWallpaper {
    pub path: PathBuf,
    pub title: String,
    pub explanation: String,
    pub date: NaiveDate,
    pub copyright: Option<String>,
    pub media_type: MediaType,
    pub source_url: String,
}

pub struct WallpaperManager {
    source: Option<Arc<dyn ApodSource>>,
    fetcher: Arc<dyn ImageFetcher>,
    backend: Arc<dyn DesktopBackend>,
    library: WallpaperLibrary,
    config_path: PathBuf,
}

impl WallpaperManager {
    pub fn new(
        source: Option<Arc<dyn ApodSource>>,
        fetcher: Arc<dyn ImageFetcher>,
        backend: Arc<dyn DesktopBackend>,
        library: WallpaperLibrary,
    ) -> Self {
        Self {
            source,
            fetcher,
            backend,
            library,
            config_path: PathBuf::new(),
        }
    }

    /// Build the production stack from the startup configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let source: Option<Arc<dyn ApodSource>> = match config.api_key() {
            Some(key) => Some(Arc::new(ApodClient::new(key)?)),
            None => None,
        };
        let fetcher = Arc::new(HttpImageFetcher::new()?);
        let backend = Arc::new(SystemBackend::from_override(config.desktop));
        let library = WallpaperLibrary::open(config.wallpaper_dir())?;

        let mut manager = Self::new(source, fetcher, backend, library);
        manager.config_path = config.path().to_path_buf();
        Ok(manager)
    }

    pub fn has_api_key(&self) -> bool {
        self.source.is_some()
    }

    pub fn wallpaper_dir(&self) -> &Path {
        self.library.dir()
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub async fn get_daily_apod_wallpaper(&self) -> Result<ApodWallpaper, WallpaperError> {
        self.get_apod_wallpaper(None).await
    }

    /// Fetch the APOD for `date` (today when `None`) and download its image
    pub async fn get_apod_wallpaper(
        &self,
        date: Option<NaiveDate>,
    ) -> Result<ApodWallpaper, WallpaperError> {
        let Some(source) = &self.source else {
            return Err(WallpaperError::api("NASA API key is not configured")
                .with_detail("env", API_KEY_ENV)
                .with_detail("config_file", self.config_path.display())
                .with_detail("hint", "get a free key at https://api.nasa.gov/"));
        };

        let record = source.get_apod(date).await?;
        if !record.is_image() {
            return Err(WallpaperError::api(format!(
                "The APOD for {} is a {}, not an image",
                record.date, record.media_type
            ))
            .with_detail("media_type", record.media_type)
            .with_detail("url", &record.url));
        }

        let url = record.best_image_url().to_string();
        emit(
            Level::Debug,
            "manager.image_url",
            &format!("Selected {} for \"{}\"", url, record.title),
            None,
        );

        let path = self.fetcher.download(&url, self.library.dir()).await?;

        if let Err(e) = self.library.save_metadata(&path, &record) {
            emit(
                Level::Warn,
                "manager.metadata.write_failed",
                &format!(
                    "{} Could not store picture details: {:#}",
                    char::from(NerdFont::Warning),
                    e
                ),
                None,
            );
        }

        Ok(ApodWallpaper {
            path,
            title: record.title,
            explanation: record.explanation,
            date: record.date,
            copyright: record.copyright,
            media_type: record.media_type,
            source_url: url,
        })
    }

    /// Download an arbitrary image URL into the wallpaper directory
    pub async fn download_wallpaper(&self, url: &str) -> Result<PathBuf, WallpaperError> {
        self.fetcher.download(url, self.library.dir()).await
    }

    /// Validate and apply `path`, returning the absolute path that was applied
    pub async fn set_wallpaper(&self, path: &Path) -> Result<PathBuf, WallpaperError> {
        // Decoding and the desktop calls both block
        let owned = path.to_path_buf();
        let backend = Arc::clone(&self.backend);
        let abs = tokio::task::spawn_blocking(move || setter::set(backend.as_ref(), &owned))
            .await
            .map_err(|e| {
                WallpaperError::wallpaper_set("Setting the wallpaper did not complete")
                    .with_path(path)
                    .with_detail("reason", e)
            })??;

        emit(
            Level::Debug,
            "manager.wallpaper_set",
            &format!("Applied {} via {}", abs.display(), self.backend.name()),
            None,
        );
        Ok(abs)
    }

    pub async fn set_random_wallpaper(&self) -> Result<PathBuf, WallpaperError> {
        let entries = self.list_wallpapers().map_err(|e| {
            WallpaperError::wallpaper_set("Could not list downloaded wallpapers")
                .with_path(self.library.dir())
                .with_detail("reason", format!("{:#}", e))
        })?;

        let chosen = entries
            .choose(&mut rand::thread_rng())
            .ok_or_else(|| {
                WallpaperError::wallpaper_set("No downloaded wallpapers to choose from")
                    .with_path(self.library.dir())
            })?
            .path
            .clone();

        self.set_wallpaper(&chosen).await
    }

    pub fn list_wallpapers(&self) -> Result<Vec<WallpaperEntry>> {
        self.library.list()
    }

    /// Stored APOD details for a downloaded wallpaper, if any
    pub fn wallpaper_details(&self, path: &Path) -> Option<ApodRecord> {
        library::load_metadata(path)
    }
}
