//! Image download into the wallpaper directory
//!
//! Bodies are streamed to a hidden staging file next to the target and only
//! renamed to `<YYYYMMDD_HHMMSS>_<basename>` once fully written, so the
//! wallpaper directory never exposes a partial image.

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

use crate::common::http;
use crate::error::WallpaperError;
use crate::ui::prelude::*;

/// Size of each write to disk
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Highest `_<n>` suffix tried when a file name is already taken
const MAX_NAME_SUFFIX: u32 = 999;

#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Download `url` into `dest_dir`, returning the final file path
    async fn download(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, WallpaperError>;
}

/// File name for an image downloaded from `url` at local time `at`
pub fn wallpaper_file_name(url: &str, at: NaiveDateTime) -> String {
    let basename = source_basename(url)
        .unwrap_or_else(|| format!("apod_{}.jpg", at.format("%Y%m%d")));
    format!("{}_{}", at.format("%Y%m%d_%H%M%S"), basename)
}

/// Last path segment of `url` if it is usable as a file name
fn source_basename(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.next_back()?;
    is_plain_file_name(segment).then(|| segment.to_string())
}

fn is_plain_file_name(name: &str) -> bool {
    let has_extension = name
        .rsplit_once('.')
        .is_some_and(|(stem, ext)| !stem.is_empty() && !ext.is_empty());

    has_extension
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

pub struct HttpImageFetcher {
    http: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new() -> Result<Self, WallpaperError> {
        let http = http::client().map_err(|e| {
            WallpaperError::download("Failed to create HTTP client").with_detail("reason", e)
        })?;
        Ok(Self { http })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn download(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, WallpaperError> {
        tokio::fs::create_dir_all(dest_dir).await.map_err(|e| {
            WallpaperError::download("Failed to create wallpaper directory")
                .with_path(dest_dir)
                .with_detail("reason", e)
        })?;

        emit(
            Level::Debug,
            "download.start",
            &format!("Downloading {}", url),
            None,
        );

        let response = self.http.get(url).send().await.map_err(|e| {
            WallpaperError::download("Failed to download image")
                .with_detail("url", url)
                .with_detail("reason", e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = http::error_body(response).await;
            return Err(WallpaperError::download(format!(
                "Image download returned status {}",
                status.as_u16()
            ))
            .with_detail("url", url)
            .with_detail("status", status.as_u16())
            .with_detail("body", body));
        }

        let file_name = wallpaper_file_name(url, Local::now().naive_local());
        let target = dest_dir.join(&file_name);

        // Dropping the staging file on any error below deletes it
        let staged = tempfile::Builder::new()
            .prefix(&format!(".{}.", file_name))
            .suffix(".part")
            .tempfile_in(dest_dir)
            .map_err(|e| {
                WallpaperError::download("Failed to create staging file")
                    .with_path(dest_dir)
                    .with_detail("reason", e)
            })?;

        let handle = staged.reopen().map_err(|e| {
            WallpaperError::download("Failed to open staging file")
                .with_path(staged.path())
                .with_detail("reason", e)
        })?;

        let written = {
            let mut writer =
                BufWriter::with_capacity(CHUNK_SIZE, tokio::fs::File::from_std(handle));
            let written = stream_body(response, &mut writer, url, &target).await?;
            writer.get_mut().sync_all().await.map_err(|e| {
                WallpaperError::download("Failed to write image")
                    .with_path(&target)
                    .with_detail("reason", e)
            })?;
            written
        };

        if written == 0 {
            return Err(WallpaperError::download("Image download returned an empty body")
                .with_detail("url", url));
        }

        let target = commit(staged, dest_dir, &file_name)?;
        make_world_readable(&target);

        emit(
            Level::Debug,
            "download.complete",
            &format!("Saved {} bytes to {}", written, target.display()),
            None,
        );
        Ok(target)
    }
}

/// `name` with `_<n>` inserted before the extension; `n == 0` keeps it as is
fn numbered_file_name(name: &str, n: u32) -> String {
    if n == 0 {
        return name.to_string();
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}_{}.{}", stem, n, ext),
        _ => format!("{}_{}", name, n),
    }
}

/// Move the staged file to `file_name` in `dest_dir` without replacing an
/// existing wallpaper; taken names get a numeric suffix.
fn commit(
    staged: tempfile::NamedTempFile,
    dest_dir: &Path,
    file_name: &str,
) -> Result<PathBuf, WallpaperError> {
    let mut staged = staged;
    let mut n = 0;
    loop {
        let candidate = dest_dir.join(numbered_file_name(file_name, n));
        match staged.persist_noclobber(&candidate) {
            Ok(_) => return Ok(candidate),
            Err(e)
                if e.error.kind() == std::io::ErrorKind::AlreadyExists && n < MAX_NAME_SUFFIX =>
            {
                staged = e.file;
                n += 1;
            }
            Err(e) => {
                return Err(WallpaperError::download("Failed to save image")
                    .with_path(&candidate)
                    .with_detail("reason", e.error));
            }
        }
    }
}

async fn stream_body<W>(
    response: reqwest::Response,
    writer: &mut W,
    url: &str,
    target: &Path,
) -> Result<u64, WallpaperError>
where
    W: AsyncWrite + Unpin,
{
    let write_error = |e: std::io::Error| {
        WallpaperError::download("Failed to write image")
            .with_path(target)
            .with_detail("reason", e)
    };

    let mut stream = response.bytes_stream();
    let mut written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| {
            WallpaperError::download("Image download was interrupted")
                .with_detail("url", url)
                .with_detail("reason", e)
        })?;
        for piece in chunk.chunks(CHUNK_SIZE) {
            writer.write_all(piece).await.map_err(write_error)?;
        }
        written += chunk.len() as u64;
    }
    writer.flush().await.map_err(write_error)?;
    Ok(written)
}

#[cfg(unix)]
fn make_world_readable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    // Staging files are created 0600; wallpaper daemons may run as other users
    let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644));
}

#[cfg(not(unix))]
fn make_world_readable(_path: &Path) {}
