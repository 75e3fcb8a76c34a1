use anyhow::Result;
use colored::*;

use super::cli::ConfigCommands;
use super::{API_KEY_ENV, ApiKeySource, AppConfig};
use crate::common::Desktop;
use crate::ui::prelude::*;

pub fn handle_config_command(command: ConfigCommands, mut config: AppConfig) -> Result<()> {
    match command {
        ConfigCommands::Show => show(&config),
        ConfigCommands::Path => {
            emit(
                Level::Info,
                "config.path",
                &config.path().display().to_string(),
                Some(serde_json::json!({ "path": config.path() })),
            );
            Ok(())
        }
        ConfigCommands::SetKey { key } => {
            config.set_api_key(key)?;
            emit(
                Level::Success,
                "config.api_key.saved",
                &format!(
                    "{} API key saved to {}",
                    char::from(NerdFont::Key),
                    config.path().display()
                ),
                None,
            );
            if std::env::var_os(API_KEY_ENV).is_some() {
                emit(
                    Level::Warn,
                    "config.api_key.shadowed",
                    &format!(
                        "{} {} is set and takes precedence over the config file",
                        char::from(NerdFont::Warning),
                        API_KEY_ENV
                    ),
                    None,
                );
            }
            Ok(())
        }
        ConfigCommands::SetDir { dir } => {
            config.set_wallpaper_dir(dir)?;
            let dir = config.wallpaper_dir();
            emit(
                Level::Success,
                "config.wallpaper_dir.saved",
                &format!(
                    "{} Wallpapers will be stored in {}",
                    char::from(NerdFont::Folder),
                    dir.display()
                ),
                Some(serde_json::json!({ "wallpaper_dir": dir })),
            );
            Ok(())
        }
        ConfigCommands::Init { force } => {
            let path = config.path();
            if AppConfig::init_file(path, force)? {
                emit(
                    Level::Success,
                    "config.init.written",
                    &format!(
                        "{} Wrote {}",
                        char::from(NerdFont::Check),
                        path.display()
                    ),
                    Some(serde_json::json!({ "path": path })),
                );
            } else {
                emit(
                    Level::Warn,
                    "config.init.exists",
                    &format!(
                        "{} {} already exists, pass --force to overwrite",
                        char::from(NerdFont::Warning),
                        path.display()
                    ),
                    Some(serde_json::json!({ "path": path })),
                );
            }
            Ok(())
        }
    }
}

/// Keep only the last four characters visible
fn mask_key(key: &str) -> String {
    let count = key.chars().count();
    if count <= 4 {
        return "*".repeat(count.max(4));
    }
    let tail: String = key.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}

fn show(config: &AppConfig) -> Result<()> {
    let key = config.api_key_with_source().map(|(key, source)| {
        let source = match source {
            ApiKeySource::Environment => API_KEY_ENV.to_string(),
            ApiKeySource::ConfigFile => "config file".to_string(),
        };
        (mask_key(key), source)
    });
    let desktop = match config.desktop {
        Some(desktop) => format!("{} (configured)", desktop.name()),
        None => format!("{} (detected)", Desktop::detect().name()),
    };
    let log_file = config
        .log_file_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "disabled".to_string());

    if get_output_format() == OutputFormat::Json {
        emit(
            Level::Info,
            "config.show",
            "Effective configuration",
            Some(serde_json::json!({
                "config_file": config.path(),
                "api_key": key.as_ref().map(|(k, _)| k),
                "api_key_source": key.as_ref().map(|(_, s)| s),
                "wallpaper_dir": config.wallpaper_dir(),
                "desktop": desktop,
                "log_file": log_file,
            })),
        );
        return Ok(());
    }

    let api_key = match &key {
        Some((masked, source)) => format!("{} (from {})", masked, source),
        None => "not set".red().to_string(),
    };
    let rows = [
        (NerdFont::File, "Config file", config.path().display().to_string()),
        (NerdFont::Key, "API key", api_key),
        (
            NerdFont::Folder,
            "Wallpapers",
            config.wallpaper_dir().display().to_string(),
        ),
        (NerdFont::Desktop, "Desktop", desktop),
        (NerdFont::List, "Log file", log_file),
    ];

    separator(true);
    for (icon, label, value) in rows {
        println!(
            "  {} {:<12} {}",
            char::from(icon),
            format!("{}:", label).bright_black(),
            value
        );
    }
    separator(true);
    Ok(())
}
