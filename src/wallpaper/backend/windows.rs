use anyhow::Result;
use std::path::Path;

#[cfg(windows)]
pub fn apply_wallpaper(path: &Path) -> Result<()> {
    let path = path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("wallpaper path is not valid UTF-8"))?;
    // SystemParametersInfoW(SPI_SETDESKWALLPAPER, ...) underneath
    ::wallpaper::set_from_path(path)
        .map_err(|e| anyhow::anyhow!("Windows rejected wallpaper: {}", e))
}

#[cfg(not(windows))]
pub fn apply_wallpaper(_path: &Path) -> Result<()> {
    anyhow::bail!("the Windows wallpaper backend is only available on Windows")
}
