use reqwest::Client;

const USER_AGENT: &str = concat!("apodwall/", env!("CARGO_PKG_VERSION"));

/// Longest response body kept in error details
const MAX_BODY_DETAIL: usize = 512;

/// Shared HTTP client configuration for API calls and downloads
pub fn client() -> reqwest::Result<Client> {
    Client::builder().user_agent(USER_AGENT).build()
}

/// Read an error response body for diagnostics, capped in length
pub async fn error_body(response: reqwest::Response) -> String {
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    truncate_body(body)
}

fn truncate_body(body: String) -> String {
    if body.chars().count() <= MAX_BODY_DETAIL {
        return body;
    }
    let mut cut: String = body.chars().take(MAX_BODY_DETAIL).collect();
    cut.push('…');
    cut
}
