//! Native wallpaper calls, one module per desktop

use anyhow::Result;
use std::path::Path;

use crate::common::Desktop;

mod gnome;
mod hyprland;
mod kde;
mod macos;
mod sway;
mod windows;
mod x11;

/// The single OS call that changes the live desktop background
pub trait DesktopBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Apply an already validated image given by absolute path
    fn apply(&self, path: &Path) -> Result<()>;
}

pub struct SystemBackend {
    desktop: Desktop,
}

impl SystemBackend {
    pub fn new(desktop: Desktop) -> Self {
        Self { desktop }
    }

    /// Use the configured desktop, or detect the running one
    pub fn from_override(desktop: Option<Desktop>) -> Self {
        Self::new(desktop.unwrap_or_else(Desktop::detect))
    }

    #[cfg(test)]
    pub fn desktop(&self) -> Desktop {
        self.desktop
    }
}

impl DesktopBackend for SystemBackend {
    fn name(&self) -> &str {
        self.desktop.name()
    }

    fn apply(&self, path: &Path) -> Result<()> {
        match self.desktop {
            Desktop::Gnome => gnome::apply_wallpaper(path),
            Desktop::Kde => kde::apply_wallpaper(path),
            Desktop::Sway => sway::apply_wallpaper(path),
            Desktop::Hyprland => hyprland::apply_wallpaper(path),
            Desktop::X11 => x11::apply_wallpaper(path),
            Desktop::Macos => macos::apply_wallpaper(path),
            Desktop::Windows => windows::apply_wallpaper(path),
            Desktop::Unknown => anyhow::bail!(
                "Could not detect a supported desktop environment; \
                 set `desktop` in the config file to choose a wallpaper backend"
            ),
        }
    }
}
