use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

pub fn apply_wallpaper(path: &Path) -> Result<()> {
    if which::which("feh").is_err() {
        anyhow::bail!("feh is not installed; it is required to set wallpapers on X11");
    }

    let output = Command::new("feh")
        .arg("--bg-fill")
        .arg(path)
        .output()
        .context("Failed to set wallpaper with feh")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("feh failed to set wallpaper: {}", stderr.trim());
    }
    Ok(())
}
