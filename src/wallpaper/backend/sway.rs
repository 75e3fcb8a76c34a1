use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

pub fn apply_wallpaper(path: &Path) -> Result<()> {
    // swaymsg output "*" bg <path> fill
    let command = format!("output \"*\" bg \"{}\" fill", path.display());
    let output = Command::new("swaymsg")
        .arg(&command)
        .output()
        .context("Failed to execute swaymsg")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("swaymsg failed: {}", stderr.trim());
    }
    Ok(())
}
