pub mod backend;
pub mod cli;
pub mod commands;
pub mod library;
pub mod manager;
pub mod setter;

pub use manager::{ApodWallpaper, WallpaperManager};
