//! HTTP client creation and page fetching with retry logic.

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::constants::{BROWSER_USER_AGENT, HTTP_POOL_MAX_IDLE_PER_HOST, retry};
use crate::error::AppError;

/// Creates a configured HTTP client with connection pooling, timeout
/// handling and a browser User-Agent.
///
/// # Returns
/// * `Result<Client, reqwest::Error>` - A configured reqwest HTTP client or error
pub fn create_http_client(timeout_seconds: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .pool_max_idle_per_host(HTTP_POOL_MAX_IDLE_PER_HOST)
        .user_agent(BROWSER_USER_AGENT)
        .build()
}

/// Fetch one page as HTML text.
///
/// This function:
/// - Implements retry logic with exponential backoff for transient failures
/// - Respects Retry-After headers for rate limiting
/// - Maps HTTP status codes to specific error types
///
/// # Arguments
/// * `client` - HTTP client for making requests
/// * `url` - URL to fetch
///
/// # Returns
/// * `Result<String, AppError>` - Page body or error
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, AppError> {
    info!("Fetching page: {url}");

    let mut attempt = 0u32;
    let mut backoff = Duration::from_millis(retry::INITIAL_BACKOFF_MS);
    let response = loop {
        match client.get(url).send().await {
            Ok(resp) => {
                let status = resp.status();
                if (status.as_u16() == 429 || status.is_server_error())
                    && attempt < retry::MAX_RETRIES
                {
                    // Respect Retry-After if provided
                    let retry_after = resp
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|h| h.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .map(Duration::from_secs);
                    let wait = retry_after.unwrap_or(backoff);
                    warn!(
                        "Transient {} from {}. Retrying in {:?} (attempt {}/{})",
                        status,
                        url,
                        wait,
                        attempt + 1,
                        retry::MAX_RETRIES
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                    backoff = backoff.saturating_mul(2);
                    continue;
                }
                break resp;
            }
            Err(e) => {
                if (e.is_timeout() || e.is_connect()) && attempt < retry::MAX_RETRIES {
                    warn!(
                        "Request error {} for {}. Retrying in {:?} (attempt {}/{})",
                        e,
                        url,
                        backoff,
                        attempt + 1,
                        retry::MAX_RETRIES
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                    backoff = backoff.saturating_mul(2);
                    continue;
                }
                error!("Request failed for URL {}: {}", url, e);
                return if e.is_timeout() {
                    Err(AppError::network_timeout(url))
                } else if e.is_connect() {
                    Err(AppError::network_connection(url, e.to_string()))
                } else {
                    Err(AppError::PageFetch(e))
                };
            }
        }
    };

    let status = response.status();
    debug!("Response status: {status}");

    if !status.is_success() {
        let status_code = status.as_u16();
        let reason = status.canonical_reason().unwrap_or("Unknown error");
        error!("HTTP {} - {} (URL: {})", status_code, reason, url);

        return Err(match status_code {
            404 => AppError::page_not_found(url),
            429 => AppError::rate_limit(reason, url),
            400..=499 => AppError::client_error(status_code, reason, url),
            502 | 503 => AppError::service_unavailable(status_code, reason, url),
            _ => AppError::server_error(status_code, reason, url),
        });
    }

    let body = response.text().await.map_err(AppError::PageFetch)?;
    debug!("Response length: {} bytes", body.len());

    if body.trim().is_empty() {
        return Err(AppError::page_no_data("Response body is empty", url));
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_page_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let client = create_http_client(5).unwrap();
        let body = fetch_page(&client, &format!("{}/stats", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_fetch_page_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = create_http_client(5).unwrap();
        let result = fetch_page(&client, &format!("{}/missing", server.uri())).await;
        assert!(matches!(result, Err(AppError::PageNotFound { .. })));
    }

    #[tokio::test]
    async fn test_fetch_page_retries_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>recovered</html>"))
            .mount(&server)
            .await;

        let client = create_http_client(5).unwrap();
        let body = fetch_page(&client, &format!("{}/flaky", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "<html>recovered</html>");
    }

    #[tokio::test]
    async fn test_fetch_page_empty_body_is_no_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/empty"))
            .respond_with(ResponseTemplate::new(200).set_body_string("   "))
            .mount(&server)
            .await;

        let client = create_http_client(5).unwrap();
        let result = fetch_page(&client, &format!("{}/empty", server.uri())).await;
        assert!(matches!(result, Err(AppError::PageNoData { .. })));
    }
}
