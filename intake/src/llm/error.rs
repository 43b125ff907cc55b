//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during LLM operations
///
/// None of these are retried by the clients; a failed call fails the turn.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LlmError {
    /// Map a transport error, keeping timeouts distinct
    pub fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(timeout)
        } else {
            LlmError::Network(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = LlmError::ApiError {
            status: 401,
            message: "invalid api key".to_string(),
        };
        assert_eq!(err.to_string(), "API error 401: invalid api key");

        let err = LlmError::Config("Unknown LLM provider".to_string());
        assert!(err.to_string().contains("Unknown LLM provider"));
    }

    #[tokio::test]
    async fn test_transport_timeout_maps_to_timeout() {
        // Accepts connections through the backlog but never answers
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        let timeout = Duration::from_millis(50);
        let http = reqwest::Client::builder().timeout(timeout).no_proxy().build().unwrap();

        let err = http.get(&url).send().await.unwrap_err();
        assert!(matches!(LlmError::from_transport(err, timeout), LlmError::Timeout(d) if d == timeout));
    }

    #[tokio::test]
    async fn test_transport_refused_maps_to_network() {
        // Bind then drop to get a port nothing listens on
        let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .no_proxy()
            .build().unwrap();

        let err = http.get(format!("http://{}/", addr)).send().await.unwrap_err();
        assert!(matches!(
            LlmError::from_transport(err, Duration::from_secs(5)),
            LlmError::Network(_)
        ));
    }
}
