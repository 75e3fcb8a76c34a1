//! Interactive terminal browser
//!
//! A small menu loop on top of [`Dispatcher`]: downloads run as background
//! tasks while a spinner is shown, and every error is reported in place so the
//! menu keeps going.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use dialoguer::{Confirm, Input, Select};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

use super::dispatch::{AppEvent, Dispatcher};
use super::render;
use crate::apod::first_apod_date;
use crate::common::progress::create_spinner;
use crate::config::API_KEY_ENV;
use crate::ui::prelude::*;
use crate::wallpaper::WallpaperManager;
use crate::wallpaper::library::WallpaperEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Today,
    ForDate,
    Library,
    Random,
    Quit,
}

impl MenuAction {
    const ALL: [MenuAction; 5] = [
        MenuAction::Today,
        MenuAction::ForDate,
        MenuAction::Library,
        MenuAction::Random,
        MenuAction::Quit,
    ];

    fn label(self) -> String {
        let (icon, text) = match self {
            MenuAction::Today => (NerdFont::Download, "Download today's picture"),
            MenuAction::ForDate => (NerdFont::Calendar, "Download picture for a date"),
            MenuAction::Library => (NerdFont::Folder, "Browse downloaded wallpapers"),
            MenuAction::Random => (NerdFont::Refresh, "Set a random wallpaper"),
            MenuAction::Quit => (NerdFont::Exit, "Quit"),
        };
        format!("{} {}", char::from(icon), text)
    }
}

/// Parse a date typed at the prompt. Empty input means "go back".
fn parse_date_input(input: &str, today: NaiveDate) -> Result<Option<NaiveDate>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not a date in YYYY-MM-DD form", input))?;
    if date < first_apod_date() {
        return Err(format!(
            "The first APOD was published on {}",
            first_apod_date()
        ));
    }
    if date > today {
        return Err(format!("{} is in the future", date));
    }
    Ok(Some(date))
}

pub struct Browser {
    dispatcher: Dispatcher,
    events: UnboundedReceiver<AppEvent>,
}

impl Browser {
    pub fn new(manager: Arc<WallpaperManager>) -> Self {
        let (dispatcher, events) = Dispatcher::new(manager);
        Self { dispatcher, events }
    }

    fn manager(&self) -> &WallpaperManager {
        self.dispatcher.manager()
    }

    pub async fn run(mut self) -> Result<()> {
        if get_output_format() == OutputFormat::Json {
            anyhow::bail!("the interactive browser is not available with --output json");
        }

        if !self.manager().has_api_key() {
            emit(
                Level::Warn,
                "browse.no_api_key",
                &format!(
                    "{} No NASA API key configured. Set {} or run `apodwall config set-key <key>` to download pictures.",
                    char::from(NerdFont::Key),
                    API_KEY_ENV
                ),
                None,
            );
        }

        let labels: Vec<String> = MenuAction::ALL.iter().map(|a| a.label()).collect();
        loop {
            let selection = Select::new()
                .with_prompt("APOD wallpapers")
                .items(&labels.iter().map(String::as_str).collect::<Vec<_>>())
                .default(0)
                .interact_opt()
                .context("Failed to show selection dialog")?;

            let action = match selection {
                Some(idx) => MenuAction::ALL[idx],
                None => MenuAction::Quit,
            };

            match action {
                MenuAction::Today => self.download(None).await?,
                MenuAction::ForDate => {
                    if let Some(date) = prompt_date()? {
                        self.download(Some(date)).await?;
                    }
                }
                MenuAction::Library => self.library().await?,
                MenuAction::Random => {
                    match self.manager().set_random_wallpaper().await {
                        Ok(path) => render::render_applied(&path, self.manager().backend_name()),
                        Err(e) => emit_wallpaper_error(&e),
                    }
                }
                MenuAction::Quit => return Ok(()),
            }
        }
    }

    async fn download(&mut self, date: Option<NaiveDate>) -> Result<()> {
        if !self.dispatcher.request_download(date) {
            emit(
                Level::Warn,
                "browse.busy",
                &format!(
                    "{} A download is already running",
                    char::from(NerdFont::Warning)
                ),
                None,
            );
            return Ok(());
        }

        let what = date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "today".to_string());
        let spinner = create_spinner(format!("Fetching the APOD for {}...", what));
        let event = self.events.recv().await;
        spinner.finish_and_clear();

        let Some(AppEvent::Downloaded(result)) = event else {
            anyhow::bail!("download task ended without reporting a result");
        };
        match result {
            Ok(wallpaper) => {
                render::render_wallpaper(&wallpaper);
                if confirm("Set as wallpaper?")? {
                    self.apply(&wallpaper.path).await;
                }
            }
            Err(e) => emit_wallpaper_error(&e),
        }
        Ok(())
    }

    async fn apply(&self, path: &Path) {
        match self.manager().set_wallpaper(path).await {
            Ok(abs) => render::render_applied(&abs, self.manager().backend_name()),
            Err(e) => emit_wallpaper_error(&e),
        }
    }

    async fn library(&self) -> Result<()> {
        let entries = match self.manager().list_wallpapers() {
            Ok(entries) => entries,
            Err(e) => {
                emit(
                    Level::Error,
                    "browse.library.list_failed",
                    &format!("{} {:#}", char::from(NerdFont::Cross), e),
                    None,
                );
                return Ok(());
            }
        };
        if entries.is_empty() {
            emit(
                Level::Info,
                "browse.library.empty",
                &format!(
                    "{} No wallpapers downloaded yet in {}",
                    char::from(NerdFont::Info),
                    self.manager().wallpaper_dir().display()
                ),
                None,
            );
            return Ok(());
        }

        loop {
            let Some(entry) = pick_entry(&entries)? else {
                return Ok(());
            };

            let actions = [
                format!("{} Set as wallpaper", char::from(NerdFont::Desktop)),
                format!("{} Show details", char::from(NerdFont::Info)),
                format!("{} Back", char::from(NerdFont::Exit)),
            ];
            let choice = Select::new()
                .with_prompt(entry.display_name())
                .items(&actions.iter().map(String::as_str).collect::<Vec<_>>())
                .default(0)
                .interact_opt()
                .context("Failed to show selection dialog")?;

            match choice {
                Some(0) => self.apply(&entry.path).await,
                Some(1) => render::render_details(
                    &entry.path,
                    self.manager().wallpaper_details(&entry.path).as_ref(),
                ),
                _ => {}
            }
        }
    }
}

fn pick_entry(entries: &[WallpaperEntry]) -> Result<Option<&WallpaperEntry>> {
    let mut labels: Vec<String> = entries
        .iter()
        .map(|e| match &e.metadata {
            Some(m) => format!("{} {} ({})", char::from(NerdFont::Image), m.title, m.date),
            None => format!("{} {}", char::from(NerdFont::File), e.file_name),
        })
        .collect();
    labels.push(format!("{} Back", char::from(NerdFont::Exit)));

    let selection = Select::new()
        .with_prompt("Downloaded wallpapers")
        .items(&labels.iter().map(String::as_str).collect::<Vec<_>>())
        .default(0)
        .interact_opt()
        .context("Failed to show selection dialog")?;

    Ok(selection.and_then(|idx| entries.get(idx)))
}

fn prompt_date() -> Result<Option<NaiveDate>> {
    let today = Local::now().date_naive();
    loop {
        let input: String = Input::new()
            .with_prompt("Date (YYYY-MM-DD, empty to go back)")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read date")?;

        match parse_date_input(&input, today) {
            Ok(date) => return Ok(date),
            Err(msg) => emit(
                Level::Warn,
                "browse.date.invalid",
                &format!("{} {}", char::from(NerdFont::Warning), msg),
                None,
            ),
        }
    }
}

fn confirm(message: &str) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_parse_date_input() {
        assert_eq!(parse_date_input("  ", today()), Ok(None));
        assert_eq!(
            parse_date_input("2024-01-01", today()),
            Ok(NaiveDate::from_ymd_opt(2024, 1, 1))
        );
        assert_eq!(
            parse_date_input("1995-06-16", today()),
            Ok(Some(first_apod_date()))
        );
    }

    #[test]
    fn test_parse_date_input_rejects_out_of_range() {
        assert!(parse_date_input("01/02/2024", today()).is_err());
        assert!(parse_date_input("1995-06-15", today()).is_err());
        assert!(parse_date_input("2024-06-02", today()).is_err());
    }

    #[test]
    fn test_menu_labels_are_distinct() {
        let labels: Vec<String> = MenuAction::ALL.iter().map(|a| a.label()).collect();
        let mut dedup = labels.clone();
        dedup.dedup();
        assert_eq!(labels.len(), dedup.len());
        assert!(labels.last().unwrap().ends_with("Quit"));
    }
}
