use serde::{Deserialize, Serialize};
use std::env;

/// Desktop environments with a known way of applying a wallpaper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Desktop {
    Gnome,
    Kde,
    Sway,
    Hyprland,
    /// Any other X11 session, handled through feh
    X11,
    Macos,
    Windows,
    Unknown,
}

/// Snapshot of the session variables used for detection
#[derive(Debug, Default, Clone)]
pub struct SessionEnv {
    pub current_desktop: Option<String>,
    pub session_desktop: Option<String>,
    pub desktop_session: Option<String>,
    pub hyprland_signature: bool,
    pub swaysock: bool,
    pub display: bool,
}

impl SessionEnv {
    pub fn from_env() -> Self {
        Self {
            current_desktop: env::var("XDG_CURRENT_DESKTOP").ok(),
            session_desktop: env::var("XDG_SESSION_DESKTOP").ok(),
            desktop_session: env::var("DESKTOP_SESSION").ok(),
            hyprland_signature: env::var_os("HYPRLAND_INSTANCE_SIGNATURE").is_some(),
            swaysock: env::var_os("SWAYSOCK").is_some(),
            display: env::var_os("DISPLAY").is_some(),
        }
    }
}

impl Desktop {
    /// Detect the desktop of the running session
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            return Desktop::Macos;
        }
        if cfg!(windows) {
            return Desktop::Windows;
        }
        Self::from_session(&SessionEnv::from_env())
    }

    pub fn from_session(session: &SessionEnv) -> Self {
        // XDG_CURRENT_DESKTOP may be a colon separated list like "ubuntu:GNOME"
        let names = [
            &session.current_desktop,
            &session.session_desktop,
            &session.desktop_session,
        ];
        for name in names.into_iter().flatten() {
            for part in name.split(':') {
                if let Some(desktop) = Self::from_name(part) {
                    return desktop;
                }
            }
        }

        if session.hyprland_signature {
            return Desktop::Hyprland;
        }
        if session.swaysock {
            return Desktop::Sway;
        }
        if session.display {
            return Desktop::X11;
        }

        Desktop::Unknown
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "gnome" | "gnome-xorg" | "gnome-wayland" | "ubuntu" | "unity" | "budgie" => {
                Some(Desktop::Gnome)
            }
            "kde" | "plasma" | "plasmawayland" | "plasmax11" => Some(Desktop::Kde),
            "sway" => Some(Desktop::Sway),
            "hyprland" => Some(Desktop::Hyprland),
            _ => None,
        }
    }

    /// Get a human-readable name for the desktop
    pub fn name(self) -> &'static str {
        match self {
            Desktop::Gnome => "GNOME",
            Desktop::Kde => "KDE Plasma",
            Desktop::Sway => "Sway",
            Desktop::Hyprland => "Hyprland",
            Desktop::X11 => "X11",
            Desktop::Macos => "macOS",
            Desktop::Windows => "Windows",
            Desktop::Unknown => "unknown",
        }
    }
}
