use colored::*;
use std::path::Path;

use crate::apod::ApodRecord;
use crate::ui::prelude::*;
use crate::wallpaper::ApodWallpaper;

const WRAP_WIDTH: usize = 78;

/// Greedy word wrap; words longer than `width` get a line of their own
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

fn print_explanation(explanation: &str) {
    println!();
    for line in wrap(explanation, WRAP_WIDTH) {
        println!("  {}", line);
    }
}

fn print_field(icon: NerdFont, label: &str, value: &str) {
    println!(
        "  {} {:<10} {}",
        char::from(icon),
        format!("{}:", label).bright_black(),
        value
    );
}

/// Show a freshly downloaded APOD picture
pub fn render_wallpaper(wallpaper: &ApodWallpaper) {
    if get_output_format() == OutputFormat::Json {
        emit(
            Level::Success,
            "wallpaper.downloaded",
            &format!("Downloaded {}", wallpaper.title),
            serde_json::to_value(wallpaper).ok(),
        );
        return;
    }

    separator(false);
    println!(
        "{} {}",
        char::from(NerdFont::Star),
        wallpaper.title.bold().cyan()
    );
    separator(true);
    print_field(NerdFont::Calendar, "Date", &wallpaper.date.to_string());
    if let Some(copyright) = &wallpaper.copyright {
        print_field(NerdFont::Info, "Copyright", copyright.trim());
    }
    print_field(NerdFont::Globe, "Source", &wallpaper.source_url);
    print_field(NerdFont::File, "Saved to", &wallpaper.path.display().to_string());
    print_explanation(&wallpaper.explanation);
    separator(false);
}

/// Show stored details of a wallpaper already on disk
pub fn render_details(path: &Path, record: Option<&ApodRecord>) {
    if get_output_format() == OutputFormat::Json {
        emit(
            Level::Info,
            "wallpaper.details",
            &format!("Details for {}", path.display()),
            Some(serde_json::json!({
                "path": path,
                "metadata": record,
            })),
        );
        return;
    }

    let Some(record) = record else {
        emit(
            Level::Warn,
            "wallpaper.details.missing",
            &format!(
                "{} No APOD details stored for {}",
                char::from(NerdFont::Warning),
                path.display()
            ),
            None,
        );
        return;
    };

    separator(false);
    println!(
        "{} {}",
        char::from(NerdFont::Image),
        record.title.bold().cyan()
    );
    separator(true);
    print_field(NerdFont::Calendar, "Date", &record.date.to_string());
    if let Some(copyright) = &record.copyright {
        print_field(NerdFont::Info, "Copyright", copyright.trim());
    }
    print_field(NerdFont::Globe, "Source", record.best_image_url());
    print_field(NerdFont::File, "File", &path.display().to_string());
    print_explanation(&record.explanation);
    separator(false);
}

pub fn render_applied(path: &Path, backend: &str) {
    emit(
        Level::Success,
        "wallpaper.applied",
        &format!(
            "{} Wallpaper set to {}",
            char::from(NerdFont::Check),
            path.display()
        ),
        Some(serde_json::json!({ "path": path, "backend": backend })),
    );
}
