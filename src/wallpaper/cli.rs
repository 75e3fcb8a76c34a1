use chrono::NaiveDate;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug, Clone)]
pub enum WallpaperCommands {
    /// Download the Astronomy Picture of the Day
    Fetch(FetchArgs),
    /// Download an image from any URL into the wallpaper directory
    Download(DownloadArgs),
    /// Set an image as the desktop wallpaper
    Set(SetArgs),
    /// Set a random downloaded wallpaper
    Random,
    /// List downloaded wallpapers
    List,
    /// Show the stored APOD details of a downloaded wallpaper
    Show(ShowArgs),
    /// Interactive menu (default when no command is given)
    Browse,
}

#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Picture date (YYYY-MM-DD), defaults to today
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,
    /// Apply the picture after downloading it
    #[arg(long)]
    pub set: bool,
}

#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
    /// Image URL
    pub url: String,
    /// Apply the image after downloading it
    #[arg(long)]
    pub set: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SetArgs {
    /// Path to the wallpaper image
    pub path: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Path to a downloaded wallpaper
    pub path: PathBuf,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-01-01"),
            Ok(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        );
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("yesterday").is_err());
    }
}
