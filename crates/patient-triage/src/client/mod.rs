//! reqwest transport for the healthcare assessment API.

mod normalize;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Response, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::workflows::assessment::{
    AlertLists, AssessmentSubmitter, PagedPatientSource, PatientPage, SourceError,
    SubmissionError, SubmissionResponse,
};

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("API key contains characters not allowed in an HTTP header")]
    InvalidApiKey,
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Client for the `/patients` and `/submit-assessment` endpoints.
///
/// GET requests are retried on connection failures and 500/502/503/504 with a linear backoff.
/// Rate limiting (429) is surfaced to the caller untouched, and POST requests are never retried.
#[derive(Debug, Clone)]
pub struct HealthcareApiClient {
    http: reqwest::Client,
    base_url: String,
    transport_retries: u32,
    transport_backoff: Duration,
}

impl HealthcareApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        let api_key =
            HeaderValue::from_str(&config.api_key).map_err(|_| ClientError::InvalidApiKey)?;
        headers.insert(API_KEY_HEADER, api_key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            transport_retries: config.transport_retries,
            transport_backoff: config.transport_backoff,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_page(&self, page: u32, limit: u32) -> Result<Response, SourceError> {
        let url = self.endpoint("patients");
        let mut attempt = 0;

        loop {
            let outcome = self
                .http
                .get(&url)
                .query(&[("page", page), ("limit", limit)])
                .send()
                .await;

            let retryable = match &outcome {
                Ok(response) => is_retryable_status(response.status()),
                Err(err) => err.is_connect() || err.is_timeout() || err.is_request(),
            };

            if !retryable || attempt >= self.transport_retries {
                return outcome.map_err(|err| SourceError::Transport(err.to_string()));
            }

            attempt += 1;
            match &outcome {
                Ok(response) => warn!(
                    page,
                    attempt,
                    status = response.status().as_u16(),
                    "patient source error, retrying"
                ),
                Err(err) => warn!(page, attempt, error = %err, "patient source unreachable, retrying"),
            }
            tokio::time::sleep(self.transport_backoff * attempt).await;
        }
    }
}

#[async_trait]
impl PagedPatientSource for HealthcareApiClient {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<PatientPage, SourceError> {
        let response = self.get_page(page, limit).await?;
        let status = response.status();
        debug!(page, limit, status = status.as_u16(), "GET /patients");

        if status == StatusCode::TOO_MANY_REQUESTS {
            let header_delay = retry_after_header(&response);
            let body = response.text().await.unwrap_or_default();
            let retry_after = retry_after_body(&body).or(header_delay);
            return Err(SourceError::RateLimited { retry_after });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|_| SourceError::UnrecognizedResponse { page })?;
        normalize::normalize_page(body, page, limit)
    }
}

#[async_trait]
impl AssessmentSubmitter for HealthcareApiClient {
    async fn submit(&self, alerts: &AlertLists) -> Result<SubmissionResponse, SubmissionError> {
        let response = self
            .http
            .post(self.endpoint("submit-assessment"))
            .json(alerts)
            .send()
            .await
            .map_err(|err| SubmissionError::Transport(err.to_string()))?;

        let status = response.status();
        debug!(status = status.as_u16(), "POST /submit-assessment");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SubmissionError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<SubmissionResponse>()
            .await
            .map_err(|err| SubmissionError::InvalidResponse(err.to_string()))
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

fn retry_after_header(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(seconds)
}

/// Reads `retry_after` (seconds) from a JSON error body.
fn retry_after_body(body: &str) -> Option<Duration> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("retry_after")?.as_f64().and_then(seconds)
}

fn seconds(value: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_after_is_read_from_json_body() {
        assert_eq!(
            retry_after_body(r#"{"error":"Rate limit exceeded","retry_after":2}"#),
            Some(Duration::from_secs(2))
        );
        assert_eq!(retry_after_body(r#"{"error":"Rate limit exceeded"}"#), None);
        assert_eq!(retry_after_body("Too Many Requests"), None);
        assert_eq!(retry_after_body(r#"{"retry_after":-1}"#), None);
    }

    #[test]
    fn only_server_faults_are_retryable() {
        assert!(is_retryable_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(is_retryable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(!is_retryable_status(StatusCode::NOT_FOUND));
    }

    #[test]
    fn rejects_api_keys_with_control_characters() {
        let config = ApiConfig {
            api_key: "bad\nkey".to_string(),
            ..ApiConfig::default()
        };
        assert!(matches!(
            HealthcareApiClient::new(&config),
            Err(ClientError::InvalidApiKey)
        ));
    }

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9000/api/".to_string(),
            ..ApiConfig::default()
        };
        let client = HealthcareApiClient::new(&config).expect("client builds");
        assert_eq!(client.endpoint("patients"), "http://127.0.0.1:9000/api/patients");
    }
}
