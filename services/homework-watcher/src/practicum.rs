//! Practicum homework status API client

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{RequestFailure, WatcherError};
use crate::io::HttpClient;

/// Source of raw homework status payloads
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait HomeworkApi: Send + Sync {
    /// Fetch the status changes since `from_date` (UNIX seconds)
    async fn get_api_answer(&self, from_date: i64) -> crate::Result<serde_json::Value>;
}

/// Client for the grading API's homework status endpoint
pub struct PracticumClient {
    endpoint: String,
    authorization: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl PracticumClient {
    pub fn new(endpoint: &str, token: &str, http: Arc<dyn HttpClient>) -> Self {
        tracing::debug!("Created PracticumClient for {}", endpoint);
        Self {
            endpoint: endpoint.to_string(),
            authorization: format!("OAuth {}", token),
            http,
        }
    }
}

#[async_trait]
impl HomeworkApi for PracticumClient {
    async fn get_api_answer(&self, from_date: i64) -> crate::Result<serde_json::Value> {
        tracing::debug!(
            "Requesting homework statuses from {} with from_date={}",
            self.endpoint,
            from_date
        );

        let from_date_str = from_date.to_string();
        let response = self
            .http
            .get(
                &self.endpoint,
                &[("Authorization", self.authorization.as_str())],
                &[("from_date", from_date_str.as_str())],
            )
            .await
            .map_err(|e| WatcherError::ApiRequest {
                endpoint: self.endpoint.clone(),
                from_date,
                failure: RequestFailure::Transport(e.to_string()),
            })?;

        tracing::debug!("API answered with status {}", response.status);

        if response.status != 200 {
            return Err(WatcherError::ApiRequest {
                endpoint: self.endpoint.clone(),
                from_date,
                failure: RequestFailure::Status(response.status),
            });
        }

        serde_json::from_str(&response.body).map_err(|e| WatcherError::Decode {
            endpoint: self.endpoint.clone(),
            from_date,
            cause: e.to_string(),
        })
    }
}
