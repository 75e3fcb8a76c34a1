use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

const QDBUS_CANDIDATES: [&str; 3] = ["qdbus6", "qdbus", "qdbus-qt5"];

pub fn apply_wallpaper(path: &Path) -> Result<()> {
    if Command::new("plasma-apply-wallpaperimage")
        .arg(path)
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
    {
        return Ok(());
    }

    let script = plasma_script(path);
    for qdbus in QDBUS_CANDIDATES {
        if run_qdbus_script(qdbus, &script).is_ok() {
            return Ok(());
        }
    }

    anyhow::bail!(
        "Failed to set KDE wallpaper: neither plasma-apply-wallpaperimage nor qdbus found/worked"
    )
}

fn plasma_script(path: &Path) -> String {
    let escaped = path
        .to_string_lossy()
        .replace('\\', "\\\\")
        .replace('"', "\\\"");
    format!(
        r#"
        desktops().forEach(d => {{
            d.wallpaperPlugin = "org.kde.image";
            d.currentConfigGroup = Array("Wallpaper", "org.kde.image", "General");
            d.writeConfig("Image", "file://{}");
            d.reloadConfig();
        }});
        "#,
        escaped
    )
}

fn run_qdbus_script(cmd: &str, script: &str) -> Result<()> {
    let output = Command::new(cmd)
        .args([
            "org.kde.plasmashell",
            "/PlasmaShell",
            "org.kde.PlasmaShell.evaluateScript",
            script,
        ])
        .output()
        .with_context(|| format!("Failed to run {}", cmd))?;

    if !output.status.success() {
        anyhow::bail!("{} returned an error", cmd);
    }
    Ok(())
}
