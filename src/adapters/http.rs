use crate::utils::error::{PortalError, Result};
use reqwest::header::{HeaderMap, ACCEPT, RETRY_AFTER};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Retry rule for rate-limited (429) responses. Other statuses are returned
/// to the caller untouched.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Back-off before retry number `attempt` (0-based). A server supplied
    /// `Retry-After` wins but is still capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let delay = retry_after.unwrap_or_else(|| {
            self.base_delay
                .saturating_mul(2u32.saturating_pow(attempt.min(16)))
        });
        delay.min(self.max_delay)
    }
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Bearer-authenticated JSON transport shared by the CRM and CMS adapters.
#[derive(Debug, Clone)]
pub struct HubSpotHttp {
    client: Client,
    token: String,
    retry: RetryPolicy,
}

impl HubSpotHttp {
    pub fn new(token: String, timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            token,
            retry,
        })
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let request = self.client.get(url).query(query);
        let response = self.send(request).await?;
        Self::parse(response).await
    }

    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(url).json(body);
        let response = self.send(request).await?;
        Self::parse(response).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = request
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json");

        let mut attempt = 0;
        loop {
            let pending = request.try_clone().ok_or_else(|| PortalError::ProcessingError {
                message: "request body cannot be replayed for retry".to_string(),
            })?;

            let response = pending.send().await?;
            tracing::debug!("HubSpot {} -> {}", response.url(), response.status());

            if response.status() != StatusCode::TOO_MANY_REQUESTS
                || attempt >= self.retry.max_retries
            {
                return Ok(response);
            }

            let delay = self.retry.delay_for(attempt, retry_after(response.headers()));
            attempt += 1;
            tracing::warn!(
                "⏳ Rate limited by HubSpot, retry {}/{} in {:?}",
                attempt,
                self.retry.max_retries,
                delay
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PortalError::ApiError {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn fast_retry(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(0),
            max_delay: Duration::from_millis(0),
        }
    }

    #[test]
    fn test_delay_grows_exponentially_and_is_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0, None), Duration::from_millis(250));
        assert_eq!(policy.delay_for(2, None), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(10, None), Duration::from_secs(10));
        assert_eq!(
            policy.delay_for(0, Some(Duration::from_secs(3))),
            Duration::from_secs(3)
        );
        assert_eq!(
            policy.delay_for(0, Some(Duration::from_secs(60))),
            Duration::from_secs(10)
        );
    }

    #[tokio::test]
    async fn test_get_json_sends_bearer_token() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/things")
                .query_param("limit", "3")
                .header("authorization", "Bearer pat-test");
            then.status(200).json_body(serde_json::json!({"ok": true}));
        });

        let http = HubSpotHttp::new("pat-test".to_string(), Duration::from_secs(5), fast_retry(0))
            .unwrap();
        let value: serde_json::Value = http
            .get_json(&server.url("/things"), &[("limit", "3".to_string())])
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn test_non_success_becomes_api_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404).body("not here");
        });

        let http = HubSpotHttp::new("t".to_string(), Duration::from_secs(5), fast_retry(0)).unwrap();
        let err = http
            .get_json::<serde_json::Value>(&server.url("/missing"), &[])
            .await
            .unwrap_err();

        match err {
            PortalError::ApiError { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "not here");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rate_limit_retries_stop_at_maximum() {
        let server = MockServer::start();
        let limited = server.mock(|when, then| {
            when.method(GET).path("/limited");
            then.status(429);
        });

        let http = HubSpotHttp::new("t".to_string(), Duration::from_secs(5), fast_retry(5)).unwrap();
        let err = http
            .get_json::<serde_json::Value>(&server.url("/limited"), &[])
            .await
            .unwrap_err();

        // 第一次請求加上五次重試
        limited.assert_hits(6);
        assert!(matches!(err, PortalError::ApiError { status: 429, .. }));
    }

    #[tokio::test]
    async fn test_rate_limited_request_succeeds_on_later_attempt() {
        use axum::{extract::State, http::StatusCode as AxumStatus, routing::get, Json, Router};
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route(
                "/flaky",
                get(|State(hits): State<Arc<AtomicUsize>>| async move {
                    if hits.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(AxumStatus::TOO_MANY_REQUESTS)
                    } else {
                        Ok(Json(serde_json::json!({"results": [1, 2]})))
                    }
                }),
            )
            .with_state(hits.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let http = HubSpotHttp::new("t".to_string(), Duration::from_secs(5), fast_retry(5)).unwrap();
        let value: serde_json::Value = http
            .get_json(&format!("http://{}/flaky", addr), &[])
            .await
            .unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert_eq!(value["results"], serde_json::json!([1, 2]));
    }

    #[tokio::test]
    async fn test_post_json_is_replayed_after_rate_limit() {
        let server = MockServer::start();
        let limited = server.mock(|when, then| {
            when.method(POST)
                .path("/batch")
                .json_body(serde_json::json!({"inputs": []}));
            then.status(429).header("Retry-After", "0");
        });

        let http = HubSpotHttp::new("t".to_string(), Duration::from_secs(5), fast_retry(2)).unwrap();
        let result = http
            .post_json::<_, serde_json::Value>(
                &server.url("/batch"),
                &serde_json::json!({"inputs": []}),
            )
            .await;

        limited.assert_hits(3);
        assert!(result.is_err());
    }
}
