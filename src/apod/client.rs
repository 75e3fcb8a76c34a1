use async_trait::async_trait;
use chrono::NaiveDate;

use super::{ApodRecord, ApodSource, first_apod_date};
use crate::common::http;
use crate::error::WallpaperError;
use crate::ui::prelude::*;

pub const APOD_ENDPOINT: &str = "https://api.nasa.gov/planetary/apod";

/// Client for NASA's Astronomy Picture of the Day API
pub struct ApodClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl ApodClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, WallpaperError> {
        let http = http::client().map_err(|e| {
            WallpaperError::api("Failed to create HTTP client").with_detail("reason", e)
        })?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            endpoint: APOD_ENDPOINT.to_string(),
        })
    }

    #[cfg(test)]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn query(&self, date: Option<NaiveDate>) -> Vec<(&'static str, String)> {
        let mut params = vec![("api_key", self.api_key.clone())];
        if let Some(date) = date {
            params.push(("date", date.format("%Y-%m-%d").to_string()));
        }
        params.push(("hd", "true".to_string()));
        params
    }
}

#[async_trait]
impl ApodSource for ApodClient {
    async fn get_apod(&self, date: Option<NaiveDate>) -> Result<ApodRecord, WallpaperError> {
        if let Some(date) = date.filter(|d| *d < first_apod_date()) {
            return Err(
                WallpaperError::api("There is no Astronomy Picture of the Day for that date")
                    .with_detail("date", date)
                    .with_detail("first_date", first_apod_date()),
            );
        }

        let label = date.map_or_else(|| "today".to_string(), |d| d.to_string());
        emit(
            Level::Debug,
            "apod.request",
            &format!("Requesting APOD for {} from {}", label, self.endpoint),
            None,
        );

        // without_url keeps the API key out of error details
        let response = self
            .http
            .get(&self.endpoint)
            .query(&self.query(date))
            .send()
            .await
            .map_err(|e| {
                WallpaperError::api("Failed to reach the APOD API")
                    .with_detail("endpoint", &self.endpoint)
                    .with_detail("reason", e.without_url())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = http::error_body(response).await;
            return Err(
                WallpaperError::api(format!("APOD API returned status {}", status.as_u16()))
                    .with_detail("status", status.as_u16())
                    .with_detail("body", body),
            );
        }

        let body = response.text().await.map_err(|e| {
            WallpaperError::api("Failed to read APOD response")
                .with_detail("reason", e.without_url())
        })?;

        let record: ApodRecord = serde_json::from_str(&body).map_err(|e| {
            WallpaperError::api("Failed to parse APOD response").with_detail("reason", e)
        })?;

        emit(
            Level::Debug,
            "apod.received",
            &format!("Received APOD \"{}\" ({})", record.title, record.date),
            None,
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_support::{Canned, TestServer};

    const RECORD: &str = r#"{
        "date": "2024-01-01",
        "explanation": "Stars.",
        "hdurl": "https://example.com/hd.jpg",
        "media_type": "image",
        "title": "Stars",
        "url": "https://example.com/sd.jpg"
    }"#;

    #[tokio::test]
    async fn test_get_apod_sends_key_date_and_hd() {
        let server = TestServer::start(vec![("/planetary/apod", Canned::json(200, RECORD))]).await;
        let client = ApodClient::new("secret")
            .unwrap()
            .with_endpoint(server.url("/planetary/apod"));

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let record = client.get_apod(Some(date)).await.unwrap();
        assert_eq!(record.title, "Stars");

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].contains("api_key=secret"));
        assert!(requests[0].contains("date=2024-01-01"));
        assert!(requests[0].contains("hd=true"));
    }

    #[tokio::test]
    async fn test_get_apod_without_date_omits_param() {
        let server = TestServer::start(vec![("/apod", Canned::json(200, RECORD))]).await;
        let client = ApodClient::new("k").unwrap().with_endpoint(server.url("/apod"));

        client.get_apod(None).await.unwrap();
        assert!(!server.requests()[0].contains("date="));
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let server = TestServer::start(vec![(
            "/apod",
            Canned::json(403, r#"{"error":{"code":"API_KEY_INVALID"}}"#),
        )])
        .await;
        let client = ApodClient::new("bad").unwrap().with_endpoint(server.url("/apod"));

        let err = client.get_apod(None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.details()["status"], "403");
        assert!(err.details()["body"].contains("API_KEY_INVALID"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_api_error() {
        let server = TestServer::start(vec![("/apod", Canned::json(200, "not json"))]).await;
        let client = ApodClient::new("k").unwrap().with_endpoint(server.url("/apod"));

        let err = client.get_apod(None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert!(err.details().contains_key("reason"));
    }

    #[tokio::test]
    async fn test_date_before_first_apod_is_rejected_locally() {
        let server = TestServer::start(vec![("/apod", Canned::json(200, RECORD))]).await;
        let client = ApodClient::new("k").unwrap().with_endpoint(server.url("/apod"));

        let date = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        let err = client.get_apod(Some(date)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_hides_key() {
        let client = ApodClient::new("very-secret")
            .unwrap()
            .with_endpoint("http://127.0.0.1:9/apod");

        let err = client.get_apod(None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert!(!err.details()["reason"].contains("very-secret"));
    }
}
