use anyhow::{Context, Result};
use std::process::Command;

use super::common::TestEnvironment;

pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    /// Parse every non-empty line of `text` as a JSON event
    pub fn events(text: &str) -> Vec<serde_json::Value> {
        text.lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("bad JSON line {l:?}: {e}")))
            .collect()
    }

    pub fn stdout_events(&self) -> Vec<serde_json::Value> {
        Self::events(&self.stdout)
    }

    pub fn stderr_events(&self) -> Vec<serde_json::Value> {
        Self::events(&self.stderr)
    }
}

/// Run the built binary against the environment's config file.
/// `NASA_API_KEY` is always removed so nothing reaches the network.
pub fn run_apodwall(env: &TestEnvironment, args: &[&str]) -> Result<CommandOutput> {
    let config = env.config_path();
    let output = Command::new(env!("CARGO_BIN_EXE_apodwall"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env_remove("NASA_API_KEY")
        .env("NO_COLOR", "1")
        .env("XDG_DATA_HOME", env.path().join("data"))
        .current_dir(env.path())
        .output()
        .context("running apodwall")?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
    })
}

pub fn write_png(path: &std::path::Path) -> Result<()> {
    let img = image::RgbImage::from_pixel(2, 2, image::Rgb([200, 100, 50]));
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("writing {}", path.display()))
}
