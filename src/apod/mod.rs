//! NASA Astronomy Picture of the Day metadata
//!
//! [`ApodRecord`] mirrors the JSON object returned by the APOD endpoint.
//! [`ApodSource`] is the seam the wallpaper manager talks to, implemented by
//! [`client::ApodClient`] over HTTP.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::WallpaperError;

pub mod client;

pub use client::ApodClient;

/// Date of the first published APOD
pub fn first_apod_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1995, 6, 16).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    #[serde(other)]
    Other,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Image => write!(f, "image"),
            MediaType::Video => write!(f, "video"),
            MediaType::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApodRecord {
    pub title: String,
    #[serde(default)]
    pub explanation: String,
    pub date: NaiveDate,
    pub media_type: MediaType,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hdurl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

impl ApodRecord {
    /// The location to download: `hdurl` when present, otherwise `url`
    pub fn best_image_url(&self) -> &str {
        self.hdurl
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(&self.url)
    }

    pub fn is_image(&self) -> bool {
        self.media_type == MediaType::Image
    }
}

#[async_trait]
pub trait ApodSource: Send + Sync {
    /// Fetch the record for `date`, or for today when `None`
    async fn get_apod(&self, date: Option<NaiveDate>) -> Result<ApodRecord, WallpaperError>;
}
