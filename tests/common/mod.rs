use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch config and wallpaper directory for one test
pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    /// Writes a config pointing at a private wallpaper directory with file
    /// logging off
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let env = Self { temp_dir };
        fs::write(
            env.config_path(),
            format!(
                "wallpaper_dir = \"{}\"\nlog_file = false\n",
                env.wallpaper_dir().display().to_string().replace('\\', "/")
            ),
        )?;
        Ok(env)
    }

    /// Like [`TestEnvironment::new`] but without a config file
    pub fn without_config() -> Result<Self> {
        Ok(Self {
            temp_dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("config.toml")
    }

    pub fn wallpaper_dir(&self) -> PathBuf {
        self.path().join("Wallpapers")
    }
}
