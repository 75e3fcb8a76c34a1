mod apod;
mod app;
mod common;
mod completions;
mod config;
mod download;
mod error;
mod ui;
mod wallpaper;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use crate::completions::SupportedShell;
use crate::config::AppConfig;
use crate::config::cli::ConfigCommands;
use crate::error::WallpaperError;
use crate::ui::prelude::*;
use crate::wallpaper::WallpaperManager;
use crate::wallpaper::cli::WallpaperCommands;

/// Download NASA's Astronomy Picture of the Day and use it as your wallpaper
#[derive(Parser, Debug)]
#[command(name = "apodwall", author, version, about, long_about = None)]
struct Cli {
    /// Print debug events
    #[arg(short, long, global = true)]
    debug: bool,

    /// Output format
    #[arg(long, value_enum, global = true, default_value = "text")]
    output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Use this config file instead of the default one
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Wallpaper(WallpaperCommands),

    /// Inspect or change the configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: SupportedShell,
    },
}

pub fn cli_command() -> clap::Command {
    Cli::command()
}

async fn run(cli: Cli) -> Result<()> {
    let command = cli
        .command
        .unwrap_or(Commands::Wallpaper(WallpaperCommands::Browse));

    if let Commands::Completions { shell } = command {
        print!("{}", completions::generate(shell)?);
        return Ok(());
    }

    let config = AppConfig::load(cli.config.as_deref())?;
    ui::set_log_file(config.log_file_path());
    emit(
        Level::Debug,
        "startup.config",
        &format!("Loaded configuration from {}", config.path().display()),
        None,
    );

    match command {
        Commands::Config { command } => config::commands::handle_config_command(command, config),
        Commands::Wallpaper(command) => {
            let manager = Arc::new(WallpaperManager::from_config(&config)?);
            wallpaper::commands::handle_wallpaper_command(command, manager).await
        }
        Commands::Completions { .. } => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let color = !cli.no_color
        && std::env::var_os("NO_COLOR").is_none()
        && std::io::stdout().is_terminal();
    ui::init(cli.output, color);
    ui::set_debug_mode(cli.debug);

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<WallpaperError>() {
            Some(err) => emit_wallpaper_error(err),
            None => emit(
                Level::Error,
                "error",
                &format!("{} {:#}", char::from(NerdFont::Cross), e),
                None,
            ),
        }
        std::process::exit(1);
    }
}
