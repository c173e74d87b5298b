//! HTTP client for the record store API

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use wm_core::{CollectionRecord, DashboardData, FieldError, FilterCriteria, NewCollection};

const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiClientError {
    #[error("Could not reach the server: {0}")]
    Network(String),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Please correct the highlighted fields")]
    Validation(Vec<FieldError>),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    fields: Vec<FieldError>,
}

/// Turn a non-success response into an error, keeping field errors when
/// the server sent them
pub fn error_from_body(status: u16, body: &str) -> ApiClientError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.fields.is_empty() => ApiClientError::Validation(parsed.fields),
        Ok(parsed) => ApiClientError::Status {
            status,
            message: parsed.error,
        },
        Err(_) if body.trim().is_empty() => ApiClientError::Status {
            status,
            message: "request failed".to_string(),
        },
        Err(_) => ApiClientError::Status {
            status,
            message: body.trim().to_string(),
        },
    }
}

#[derive(Clone)]
pub struct ApiClient {
    base: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Client for the API URL baked in at build time (`WM_API_URL`)
    pub fn from_build_env() -> Self {
        Self::new(option_env!("WM_API_URL").unwrap_or(DEFAULT_API_URL))
    }

    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn collections(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<Vec<CollectionRecord>, ApiClientError> {
        send(self.client.get(self.url("/api/collections")).query(criteria)).await
    }

    pub async fn dashboard(&self) -> Result<DashboardData, ApiClientError> {
        send(self.client.get(self.url("/api/dashboard"))).await
    }

    pub async fn submit(&self, input: &NewCollection) -> Result<CollectionRecord, ApiClientError> {
        send(self.client.post(self.url("/api/collections")).json(input)).await
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiClientError> {
    let response = request
        .send()
        .await
        .map_err(|e| ApiClientError::Network(e.to_string()))?;

    let status = response.status();
    if status.is_success() {
        return response
            .json()
            .await
            .map_err(|e| ApiClientError::Decode(e.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!("API request failed with {}: {}", status, body);
    Err(error_from_body(status.as_u16(), &body))
}
