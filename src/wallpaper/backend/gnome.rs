use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

const BACKGROUND_SCHEMA: &str = "/org/gnome/desktop/background";

pub fn apply_wallpaper(path: &Path) -> Result<()> {
    let uri = gvariant_string(&format!("file://{}", path.display()));

    dconf_write("picture-uri", &uri)?;
    dconf_write("picture-uri-dark", &uri)?;
    dconf_write("picture-options", "'zoom'")?;

    Ok(())
}

/// Quote `s` as a GVariant string literal for `dconf write`
fn gvariant_string(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn dconf_write(key: &str, value: &str) -> Result<()> {
    let output = Command::new("dconf")
        .args(["write", &format!("{}/{}", BACKGROUND_SCHEMA, key), value])
        .output()
        .with_context(|| format!("Failed to set {} with dconf", key))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("dconf write {} failed: {}", key, stderr.trim());
    }
    Ok(())
}
