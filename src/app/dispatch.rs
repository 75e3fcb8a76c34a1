use chrono::NaiveDate;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::error::WallpaperError;
use crate::ui::prelude::*;
use crate::wallpaper::{ApodWallpaper, WallpaperManager};

/// Results sent from background tasks back to the UI loop
#[derive(Debug)]
pub enum AppEvent {
    Downloaded(Result<ApodWallpaper, WallpaperError>),
}

/// Runs long operations off the UI loop, one at a time
pub struct Dispatcher {
    manager: Arc<WallpaperManager>,
    busy: Arc<AtomicBool>,
    events: UnboundedSender<AppEvent>,
}

/// Clears the in-progress flag when the task ends, even by panic
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Dispatcher {
    pub fn new(manager: Arc<WallpaperManager>) -> (Self, UnboundedReceiver<AppEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let dispatcher = Self {
            manager,
            busy: Arc::new(AtomicBool::new(false)),
            events,
        };
        (dispatcher, rx)
    }

    pub fn manager(&self) -> &Arc<WallpaperManager> {
        &self.manager
    }

    #[cfg(test)]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Start downloading the APOD for `date` in the background.
    ///
    /// Returns `false` without doing anything if a download is already in
    /// flight. The result arrives as [`AppEvent::Downloaded`].
    pub fn request_download(&self, date: Option<NaiveDate>) -> bool {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            emit(
                Level::Debug,
                "dispatch.busy",
                "Download already in progress; ignoring request",
                None,
            );
            return false;
        }

        let guard = BusyGuard(Arc::clone(&self.busy));
        let manager = Arc::clone(&self.manager);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = match date {
                Some(_) => manager.get_apod_wallpaper(date).await,
                None => manager.get_daily_apod_wallpaper().await,
            };
            // Release before sending so the UI never sees a stale busy flag
            drop(guard);
            let _ = events.send(AppEvent::Downloaded(result));
        });
        true
    }
}
