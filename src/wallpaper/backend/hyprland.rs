use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// Apply wallpaper on Hyprland using swww
pub fn apply_wallpaper(path: &Path) -> Result<()> {
    if which::which("swww").is_err() {
        anyhow::bail!(
            "swww is not installed. Install it with your package manager;\n\
             swww is required for wallpaper support on Hyprland."
        );
    }

    let query = Command::new("swww")
        .arg("query")
        .output()
        .context("Failed to run swww query")?;

    if !query.status.success() {
        Command::new("swww-daemon")
            .spawn()
            .context("Failed to start swww-daemon")?;

        // Give the daemon a moment to start
        std::thread::sleep(std::time::Duration::from_millis(100));
    }

    let output = Command::new("swww")
        .arg("img")
        .arg(path)
        .output()
        .context("Failed to set wallpaper with swww")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("swww failed to set wallpaper: {}", stderr.trim());
    }

    Ok(())
}
