use anyhow::{Context, Result};
use std::path::PathBuf;

/// Centralized path management for apodwall

const APP_DIR: &str = "apodwall";

/// Get the apodwall config directory
pub fn config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Unable to determine user config directory")?
        .join(APP_DIR);

    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("creating config directory at {}", config_dir.display()))?;

    Ok(config_dir)
}

/// Default location of the config file
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Get the apodwall log file path (parent is created on first write)
pub fn log_file() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));
            home.join(".local/share")
        })
        .join(APP_DIR)
        .join("logs")
        .join("apodwall.log")
}

/// Default wallpaper directory: `Wallpapers` inside the user's picture library
pub fn default_wallpaper_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
        .unwrap_or_else(|| PathBuf::from("Pictures"))
        .join("Wallpapers")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_wallpaper_dir_ends_with_wallpapers() {
        assert!(default_wallpaper_dir().ends_with("Wallpapers"));
    }

    #[test]
    fn test_log_file_location() {
        let log = log_file();
        assert!(log.ends_with("apodwall/logs/apodwall.log"));
    }
}
