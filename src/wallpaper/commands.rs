use anyhow::Result;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use std::path::Path;
use std::sync::Arc;

use crate::app::{Browser, render};
use crate::common::progress::create_spinner;
use crate::ui::prelude::*;
use crate::wallpaper::WallpaperManager;
use crate::wallpaper::cli::{DownloadArgs, FetchArgs, SetArgs, ShowArgs, WallpaperCommands};
use crate::wallpaper::library::WallpaperEntry;

pub async fn handle_wallpaper_command(
    command: WallpaperCommands,
    manager: Arc<WallpaperManager>,
) -> Result<()> {
    emit(
        Level::Debug,
        "wallpaper.backend",
        &format!("Using {} wallpaper backend", manager.backend_name()),
        None,
    );

    match command {
        WallpaperCommands::Fetch(args) => handle_fetch(&manager, args).await,
        WallpaperCommands::Download(args) => handle_download(&manager, args).await,
        WallpaperCommands::Set(args) => handle_set(&manager, args).await,
        WallpaperCommands::Random => handle_random(&manager).await,
        WallpaperCommands::List => handle_list(&manager),
        WallpaperCommands::Show(args) => handle_show(&manager, args),
        WallpaperCommands::Browse => Browser::new(manager).run().await,
    }
}

async fn handle_fetch(manager: &WallpaperManager, args: FetchArgs) -> Result<()> {
    let what = args
        .date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "today".to_string());
    emit(
        Level::Debug,
        "apod.fetch.start",
        &format!("Fetching the APOD for {}", what),
        None,
    );

    let spinner = create_spinner(format!("Fetching the APOD for {}...", what));
    let result = manager.get_apod_wallpaper(args.date).await;
    spinner.finish_and_clear();

    let wallpaper = result?;
    render::render_wallpaper(&wallpaper);

    if args.set {
        apply(manager, &wallpaper.path).await?;
    }
    Ok(())
}

async fn handle_download(manager: &WallpaperManager, args: DownloadArgs) -> Result<()> {
    let spinner = create_spinner(format!("Downloading {}...", args.url));
    let result = manager.download_wallpaper(&args.url).await;
    spinner.finish_and_clear();

    let path = result?;
    emit(
        Level::Success,
        "wallpaper.downloaded",
        &format!(
            "{} Saved {}",
            char::from(NerdFont::Download),
            path.display()
        ),
        Some(serde_json::json!({ "path": path, "url": args.url })),
    );

    if args.set {
        apply(manager, &path).await?;
    }
    Ok(())
}

async fn handle_set(manager: &WallpaperManager, args: SetArgs) -> Result<()> {
    apply(manager, &args.path).await
}

async fn handle_random(manager: &WallpaperManager) -> Result<()> {
    let path = manager.set_random_wallpaper().await?;
    render::render_applied(&path, manager.backend_name());
    Ok(())
}

async fn apply(manager: &WallpaperManager, path: &Path) -> Result<()> {
    let abs = manager.set_wallpaper(path).await?;
    render::render_applied(&abs, manager.backend_name());
    Ok(())
}

fn handle_list(manager: &WallpaperManager) -> Result<()> {
    let entries = manager.list_wallpapers()?;

    if get_output_format() == OutputFormat::Json {
        emit(
            Level::Info,
            "wallpaper.list",
            &format!("{} wallpapers", entries.len()),
            Some(serde_json::json!({
                "dir": manager.wallpaper_dir(),
                "wallpapers": entries,
            })),
        );
        return Ok(());
    }

    if entries.is_empty() {
        emit(
            Level::Info,
            "wallpaper.list.empty",
            &format!(
                "{} No wallpapers in {}",
                char::from(NerdFont::Info),
                manager.wallpaper_dir().display()
            ),
            None,
        );
        return Ok(());
    }

    println!("{}", list_table(&entries));
    emit(
        Level::Info,
        "wallpaper.list.summary",
        &format!(
            "{} {} wallpapers in {}",
            char::from(NerdFont::Folder),
            entries.len(),
            manager.wallpaper_dir().display()
        ),
        None,
    );
    Ok(())
}

fn list_table(entries: &[WallpaperEntry]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["APOD date", "Title", "File", "Downloaded"]);

    for entry in entries {
        let date = entry
            .metadata
            .as_ref()
            .map(|m| m.date.to_string())
            .unwrap_or_else(|| "-".to_string());
        let title = entry
            .metadata
            .as_ref()
            .map(|m| m.title.clone())
            .unwrap_or_else(|| "-".to_string());
        let downloaded = entry
            .modified
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![date, title, entry.file_name.clone(), downloaded]);
    }
    table
}

fn handle_show(manager: &WallpaperManager, args: ShowArgs) -> Result<()> {
    if !args.path.exists() {
        anyhow::bail!("{} does not exist", args.path.display());
    }
    let details = manager.wallpaper_details(&args.path);
    render::render_details(&args.path, details.as_ref());
    Ok(())
}
