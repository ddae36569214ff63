use std::time::{Duration, Instant};

use chrono::Utc;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::models::{round2, ProbeResult, ProbeStatus};

/// Hard cap on a single health check.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

pub fn build_client() -> reqwest::Result<Client> {
    Client::builder().timeout(PROBE_TIMEOUT).build()
}

/// Runs one health check against `url` and classifies the outcome. Every
/// failure mode maps to a status, so the caller never sees an error.
pub async fn check_endpoint(client: &Client, url: &str) -> ProbeResult {
    let started = Instant::now();
    let outcome = client.get(url).send().await;
    let observed_at = Utc::now();

    match outcome {
        Ok(response) => ProbeResult {
            status: classify_response(response.status()),
            response_time_ms: Some(round2(started.elapsed().as_secs_f64() * 1000.0)),
            observed_at,
        },
        Err(err) if err.is_timeout() => ProbeResult {
            status: ProbeStatus::Degraded,
            response_time_ms: Some(PROBE_TIMEOUT.as_millis() as f64),
            observed_at,
        },
        Err(err) if err.is_connect() => {
            debug!(url, error = %err, "endpoint unreachable");
            ProbeResult {
                status: ProbeStatus::Major,
                response_time_ms: None,
                observed_at,
            }
        }
        Err(err) => {
            debug!(url, error = %err, "health check failed");
            ProbeResult {
                status: ProbeStatus::Investigating,
                response_time_ms: None,
                observed_at,
            }
        }
    }
}

fn classify_response(code: StatusCode) -> ProbeStatus {
    if code.is_success() {
        ProbeStatus::Operational
    } else if matches!(code.as_u16(), 500 | 502 | 503 | 504) {
        ProbeStatus::Major
    } else {
        ProbeStatus::Degraded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_responding_with(status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn success_is_operational_with_a_timing() {
        let server = mock_responding_with(200).await;
        let client = build_client().unwrap();

        let result = check_endpoint(&client, &server.uri()).await;

        assert_eq!(result.status, ProbeStatus::Operational);
        assert!(result.response_time_ms.is_some());
    }

    #[tokio::test]
    async fn server_errors_are_major_with_a_timing() {
        let server = mock_responding_with(503).await;
        let client = build_client().unwrap();

        let result = check_endpoint(&client, &server.uri()).await;

        assert_eq!(result.status, ProbeStatus::Major);
        assert!(result.response_time_ms.is_some());
    }

    #[tokio::test]
    async fn other_codes_are_degraded() {
        let server = mock_responding_with(404).await;
        let client = build_client().unwrap();

        let result = check_endpoint(&client, &server.uri()).await;

        assert_eq!(result.status, ProbeStatus::Degraded);
    }

    #[tokio::test]
    async fn timeout_is_degraded_with_the_fixed_timing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let client = Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        let result = check_endpoint(&client, &server.uri()).await;

        assert_eq!(result.status, ProbeStatus::Degraded);
        assert_eq!(result.response_time_ms, Some(5000.0));
    }

    #[tokio::test]
    async fn refused_connection_is_major_without_a_timing() {
        let client = build_client().unwrap();

        let result = check_endpoint(&client, "http://127.0.0.1:1/").await;

        assert_eq!(result.status, ProbeStatus::Major);
        assert_eq!(result.response_time_ms, None);
    }

    #[test]
    fn classification_table() {
        assert_eq!(classify_response(StatusCode::OK), ProbeStatus::Operational);
        assert_eq!(
            classify_response(StatusCode::NO_CONTENT),
            ProbeStatus::Operational
        );
        for code in [500, 502, 503, 504] {
            assert_eq!(
                classify_response(StatusCode::from_u16(code).unwrap()),
                ProbeStatus::Major
            );
        }
        assert_eq!(
            classify_response(StatusCode::NOT_FOUND),
            ProbeStatus::Degraded
        );
        assert_eq!(
            classify_response(StatusCode::TOO_MANY_REQUESTS),
            ProbeStatus::Degraded
        );
    }
}
