use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::{Desktop, paths};

pub mod cli;
pub mod commands;

/// Environment variable consulted before the config file
pub const API_KEY_ENV: &str = "NASA_API_KEY";

const CONFIG_TEMPLATE: &str = r#"# apodwall configuration
#
# NASA API key from https://api.nasa.gov/ (the NASA_API_KEY environment
# variable takes precedence over this value)
# api_key = "your-api-key-here"

# Where downloaded pictures are stored (defaults to ~/Pictures/Wallpapers)
# wallpaper_dir = "~/Pictures/Wallpapers"

# Force a wallpaper backend instead of detecting it:
# gnome, kde, sway, hyprland, x11, macos, windows
# desktop = "gnome"

# Append every event to the apodwall log file
log_file = true
"#;

fn default_log_file() -> bool {
    true
}

/// Where the effective API key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeySource {
    Environment,
    ConfigFile,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallpaper_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop: Option<Desktop>,
    #[serde(default = "default_log_file")]
    pub log_file: bool,

    #[serde(skip)]
    path: PathBuf,
    #[serde(skip)]
    env_api_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            wallpaper_dir: None,
            desktop: None,
            log_file: default_log_file(),
            path: PathBuf::new(),
            env_api_key: None,
        }
    }
}

impl AppConfig {
    /// Load the config once at startup. `path` overrides the default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => paths::config_file()?,
        };
        Self::load_from(&path, std::env::var(API_KEY_ENV).ok())
    }

    pub fn load_from(path: &Path, env_api_key: Option<String>) -> Result<Self> {
        let mut config = if path.exists() {
            let s = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            toml::from_str::<AppConfig>(&s)
                .with_context(|| format!("parsing config toml {}", path.display()))?
        } else {
            Self::default()
        };

        config.path = path.to_path_buf();
        config.env_api_key = env_api_key.filter(|k| !k.trim().is_empty());
        Ok(config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Effective API key: environment first, then the config file
    pub fn api_key(&self) -> Option<&str> {
        self.api_key_with_source().map(|(key, _)| key)
    }

    pub fn api_key_with_source(&self) -> Option<(&str, ApiKeySource)> {
        if let Some(key) = self.env_api_key.as_deref() {
            return Some((key.trim(), ApiKeySource::Environment));
        }
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(|k| (k, ApiKeySource::ConfigFile))
    }

    pub fn wallpaper_dir(&self) -> PathBuf {
        match self.wallpaper_dir.as_deref().map(str::trim) {
            Some(dir) if !dir.is_empty() => PathBuf::from(shellexpand::tilde(dir).into_owned()),
            _ => paths::default_wallpaper_dir(),
        }
    }

    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.log_file.then(paths::log_file)
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("creating config directory")?;
        }

        let toml = toml::to_string_pretty(self).context("serializing config to toml")?;
        fs::write(&self.path, toml)
            .with_context(|| format!("writing config file {}", self.path.display()))?;
        restrict_permissions(&self.path)?;
        Ok(())
    }

    /// Write the commented template unless a config file already exists
    pub fn init_file(path: &Path, force: bool) -> Result<bool> {
        if path.exists() && !force {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("creating config directory")?;
        }
        fs::write(path, CONFIG_TEMPLATE)
            .with_context(|| format!("writing config file {}", path.display()))?;
        restrict_permissions(path)?;
        Ok(true)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        let key = key.trim().to_string();
        if key.is_empty() {
            anyhow::bail!("API key must not be empty");
        }
        self.api_key = Some(key);
        self.save()
    }

    pub fn set_wallpaper_dir(&mut self, dir: String) -> Result<()> {
        let expanded = PathBuf::from(shellexpand::tilde(&dir).into_owned());
        let abs = if expanded.is_absolute() {
            expanded
        } else {
            std::env::current_dir()
                .context("getting current directory")?
                .join(expanded)
        };

        self.wallpaper_dir = Some(abs.to_string_lossy().to_string());
        self.save()
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    // The file may hold an API key
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .with_context(|| format!("restricting permissions of {}", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.toml"), None).unwrap();
        assert!(config.api_key().is_none());
        assert!(config.log_file);
        assert!(config.desktop.is_none());
        assert_eq!(config.wallpaper_dir(), paths::default_wallpaper_dir());
    }

    #[test]
    fn test_env_key_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"from-file\"\n").unwrap();

        let config = AppConfig::load_from(&path, Some("from-env".into())).unwrap();
        assert_eq!(
            config.api_key_with_source(),
            Some(("from-env", ApiKeySource::Environment))
        );

        let config = AppConfig::load_from(&path, Some("   ".into())).unwrap();
        assert_eq!(
            config.api_key_with_source(),
            Some(("from-file", ApiKeySource::ConfigFile))
        );
    }

    #[test]
    fn test_template_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        assert!(AppConfig::init_file(&path, false).unwrap());
        assert!(!AppConfig::init_file(&path, false).unwrap());

        let config = AppConfig::load_from(&path, None).unwrap();
        assert!(config.api_key().is_none());
        assert!(config.log_file);
    }

    #[test]
    fn test_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = AppConfig::load_from(&path, None).unwrap();
        config.desktop = Some(Desktop::Sway);
        config.set_api_key("  abc123 ".into()).unwrap();
        config
            .set_wallpaper_dir(dir.path().join("walls").display().to_string())
            .unwrap();

        let loaded = AppConfig::load_from(&path, None).unwrap();
        assert_eq!(loaded.api_key(), Some("abc123"));
        assert_eq!(loaded.desktop, Some(Desktop::Sway));
        assert_eq!(loaded.wallpaper_dir(), dir.path().join("walls"));
    }

    #[test]
    fn test_tilde_expansion() {
        let config = AppConfig {
            wallpaper_dir: Some("~/space".into()),
            ..Default::default()
        };
        let dir = config.wallpaper_dir();
        assert!(dir.ends_with("space"));
        if std::env::var_os("HOME").is_some() {
            assert!(!dir.starts_with("~"));
        }
    }

    #[test]
    #[serial]
    fn test_load_reads_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        // SAFETY: serialized with the other environment tests
        unsafe { std::env::set_var(API_KEY_ENV, "env-key") };
        let config = AppConfig::load(Some(&path));
        unsafe { std::env::remove_var(API_KEY_ENV) };

        assert_eq!(config.unwrap().api_key(), Some("env-key"));
    }
}
