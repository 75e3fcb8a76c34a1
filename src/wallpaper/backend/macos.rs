use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

pub fn apply_wallpaper(path: &Path) -> Result<()> {
    let script = format!(
        "tell application \"System Events\" to tell every desktop to set picture to \"{}\"",
        applescript_escape(&path.to_string_lossy())
    );

    let output = Command::new("osascript")
        .args(["-e", &script])
        .output()
        .context("Failed to run osascript")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("osascript failed to set wallpaper: {}", stderr.trim());
    }
    Ok(())
}

fn applescript_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
