use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Free-form diagnostic fields attached to an error (status, url, path, ...)
pub type Details = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Metadata request failed, including a missing API key
    Api,
    /// Network or disk failure while fetching image bytes
    Download,
    /// Invalid image or OS rejection while applying the wallpaper
    WallpaperSet,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Api => "API_ERROR",
            ErrorKind::Download => "DOWNLOAD_ERROR",
            ErrorKind::WallpaperSet => "WALLPAPER_SET_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(thiserror::Error, Debug, Clone)]
pub enum WallpaperError {
    #[error("{message}")]
    Api {
        message: String,
        details: Details,
        timestamp: DateTime<Local>,
    },

    #[error("{message}")]
    Download {
        message: String,
        details: Details,
        timestamp: DateTime<Local>,
    },

    #[error("{message}")]
    WallpaperSet {
        message: String,
        details: Details,
        timestamp: DateTime<Local>,
    },
}

impl WallpaperError {
    pub fn api(message: impl Into<String>) -> Self {
        WallpaperError::Api {
            message: message.into(),
            details: Details::new(),
            timestamp: Local::now(),
        }
    }

    pub fn download(message: impl Into<String>) -> Self {
        WallpaperError::Download {
            message: message.into(),
            details: Details::new(),
            timestamp: Local::now(),
        }
    }

    pub fn wallpaper_set(message: impl Into<String>) -> Self {
        WallpaperError::WallpaperSet {
            message: message.into(),
            details: Details::new(),
            timestamp: Local::now(),
        }
    }

    /// Attach a diagnostic field, replacing any previous value for `key`
    pub fn with_detail(mut self, key: &str, value: impl ToString) -> Self {
        self.details_mut().insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_path(self, path: &Path) -> Self {
        self.with_detail("path", path.display())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            WallpaperError::Api { .. } => ErrorKind::Api,
            WallpaperError::Download { .. } => ErrorKind::Download,
            WallpaperError::WallpaperSet { .. } => ErrorKind::WallpaperSet,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    pub fn message(&self) -> &str {
        match self {
            WallpaperError::Api { message, .. }
            | WallpaperError::Download { message, .. }
            | WallpaperError::WallpaperSet { message, .. } => message,
        }
    }

    pub fn details(&self) -> &Details {
        match self {
            WallpaperError::Api { details, .. }
            | WallpaperError::Download { details, .. }
            | WallpaperError::WallpaperSet { details, .. } => details,
        }
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        match self {
            WallpaperError::Api { timestamp, .. }
            | WallpaperError::Download { timestamp, .. }
            | WallpaperError::WallpaperSet { timestamp, .. } => *timestamp,
        }
    }

    fn details_mut(&mut self) -> &mut Details {
        match self {
            WallpaperError::Api { details, .. }
            | WallpaperError::Download { details, .. }
            | WallpaperError::WallpaperSet { details, .. } => details,
        }
    }

    /// Structured form used by the JSON renderer and the log file
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.code(),
            "kind": self.kind(),
            "message": self.message(),
            "details": self.details(),
            "timestamp": self.timestamp().to_rfc3339(),
        })
    }
}
