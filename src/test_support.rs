//! In-process HTTP server serving canned responses for client tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Clone)]
pub struct Canned {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// Advertise a longer body than is sent, then hang up
    pub truncate: bool,
}

impl Canned {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.as_bytes().to_vec(),
            truncate: false,
        }
    }

    pub fn bytes(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: "application/octet-stream",
            body,
            truncate: false,
        }
    }

    pub fn truncated(mut self) -> Self {
        self.truncate = true;
        self
    }
}

pub struct TestServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    /// Serve `routes` keyed by request path (query strings are ignored)
    pub async fn start(routes: Vec<(&str, Canned)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes: Arc<HashMap<String, Canned>> = Arc::new(
            routes
                .into_iter()
                .map(|(path, canned)| (path.to_string(), canned))
                .collect(),
        );
        let requests = Arc::new(Mutex::new(Vec::new()));

        let seen = Arc::clone(&requests);
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                let routes = Arc::clone(&routes);
                let seen = Arc::clone(&seen);
                tokio::spawn(async move {
                    let _ = handle(socket, routes, seen).await;
                });
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request targets (path plus query) in arrival order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn handle(
    mut socket: TcpStream,
    routes: Arc<HashMap<String, Canned>>,
    seen: Arc<Mutex<Vec<String>>>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let head = String::from_utf8_lossy(&buf);
    let target = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    let path = target.split('?').next().unwrap_or("/").to_string();
    seen.lock().unwrap().push(target);

    let canned = routes
        .get(&path)
        .cloned()
        .unwrap_or_else(|| Canned::json(404, r#"{"msg":"not found"}"#));

    let advertised = if canned.truncate {
        canned.body.len() * 2 + 16
    } else {
        canned.body.len()
    };
    let header = format!(
        "HTTP/1.1 {} Canned\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        canned.status, canned.content_type, advertised
    );
    socket.write_all(header.as_bytes()).await?;
    socket.write_all(&canned.body).await?;
    socket.flush().await?;
    socket.shutdown().await
}

/// Encode a small valid PNG
pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 3, image::Rgb([12, 34, 56]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Backend that records every apply call instead of touching the desktop
#[derive(Default)]
pub struct RecordingBackend {
    applied: Mutex<Vec<std::path::PathBuf>>,
    fail: bool,
}

impl RecordingBackend {
    pub fn failing() -> Self {
        Self {
            applied: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn applied(&self) -> Vec<std::path::PathBuf> {
        self.applied.lock().unwrap().clone()
    }
}

impl crate::wallpaper::backend::DesktopBackend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    fn apply(&self, path: &std::path::Path) -> anyhow::Result<()> {
        self.applied.lock().unwrap().push(path.to_path_buf());
        if self.fail {
            anyhow::bail!("desktop refused the image");
        }
        Ok(())
    }
}

pub fn sample_record() -> crate::apod::ApodRecord {
    crate::apod::ApodRecord {
        title: "Sample Nebula".into(),
        explanation: "Gas and dust.".into(),
        date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        media_type: crate::apod::MediaType::Image,
        url: "https://apod.example/photo.jpg".into(),
        hdurl: Some("https://apod.example/hd/photo.jpg".into()),
        copyright: Some("A. Astronomer".into()),
    }
}

/// APOD source returning a fixed record (or status error) and recording calls
pub struct FakeSource {
    result: Result<crate::apod::ApodRecord, u16>,
    calls: Mutex<Vec<Option<chrono::NaiveDate>>>,
    gate: Option<Arc<tokio::sync::Notify>>,
}

impl FakeSource {
    pub fn ok(record: crate::apod::ApodRecord) -> Self {
        Self {
            result: Ok(record),
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            result: Err(status),
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Calls block until the returned gate is notified
    pub fn gated(record: crate::apod::ApodRecord) -> (Self, Arc<tokio::sync::Notify>) {
        let gate = Arc::new(tokio::sync::Notify::new());
        let source = Self {
            gate: Some(Arc::clone(&gate)),
            ..Self::ok(record)
        };
        (source, gate)
    }

    pub fn calls(&self) -> Vec<Option<chrono::NaiveDate>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl crate::apod::ApodSource for FakeSource {
    async fn get_apod(
        &self,
        date: Option<chrono::NaiveDate>,
    ) -> Result<crate::apod::ApodRecord, crate::error::WallpaperError> {
        self.calls.lock().unwrap().push(date);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.result {
            Ok(record) => Ok(record.clone()),
            Err(status) => Err(crate::error::WallpaperError::api(format!(
                "APOD API returned status {}",
                status
            ))
            .with_detail("status", status)),
        }
    }
}

/// Image fetcher that writes fixed bytes (or fails) and records requested URLs
pub struct FakeFetcher {
    bytes: Option<Vec<u8>>,
    file_name: Option<String>,
    urls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn writing(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Some(bytes),
            file_name: None,
            urls: Mutex::new(Vec::new()),
        }
    }

    /// Always save under `file_name` instead of a timestamped name
    pub fn writing_named(bytes: Vec<u8>, file_name: &str) -> Self {
        Self {
            file_name: Some(file_name.to_string()),
            ..Self::writing(bytes)
        }
    }

    pub fn failing() -> Self {
        Self {
            bytes: None,
            file_name: None,
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl crate::download::ImageFetcher for FakeFetcher {
    async fn download(
        &self,
        url: &str,
        dest_dir: &std::path::Path,
    ) -> Result<std::path::PathBuf, crate::error::WallpaperError> {
        self.urls.lock().unwrap().push(url.to_string());
        let Some(bytes) = &self.bytes else {
            return Err(crate::error::WallpaperError::download("connection reset")
                .with_detail("url", url));
        };
        let name = self.file_name.clone().unwrap_or_else(|| {
            crate::download::wallpaper_file_name(url, chrono::Local::now().naive_local())
        });
        let path = dest_dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        Ok(path)
    }
}
