//! HTTP adapter for the engine's generation and persistence endpoints.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use mindgrowth_shared::{
    ErrorBody, GenerateRequest, GenerateResponse, SaveRequest, SaveResponse, GENERATE_PATH,
    GENERATE_STREAM_PATH, SAVE_PATH,
};
use reqwest::Client;
use serde::Serialize;

use crate::ports::outbound::{ApiError, GenerationPort, PersistencePort};

/// Default base URL for the Engine server
pub const DEFAULT_ENGINE_URL: &str = "http://localhost:3000";

#[derive(Clone)]
pub struct EngineHttpClient {
    client: Client,
    base_url: String,
}

impl EngineHttpClient {
    pub fn new(base_url: &str) -> Self {
        // Report generation streams for a while; match the engine's upstream ceiling
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Uses `MINDGROWTH_ENGINE_URL`, falling back to the local default.
    pub fn from_env() -> Self {
        let base_url = std::env::var("MINDGROWTH_ENGINE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENGINE_URL.to_string());
        Self::new(&base_url)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::ServerError {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

impl Default for EngineHttpClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENGINE_URL)
    }
}

#[async_trait]
impl GenerationPort for EngineHttpClient {
    async fn generate(&self, request: GenerateRequest) -> Result<String, ApiError> {
        let response: GenerateResponse = self
            .post(GENERATE_PATH, &request)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::ParseError(e.to_string()))?;
        Ok(response.text)
    }

    async fn generate_streamed(&self, request: GenerateRequest) -> Result<String, ApiError> {
        let mut chunks = self.post(GENERATE_STREAM_PATH, &request).await?.bytes_stream();

        // Chunk borders may split a character, so decode once at the end
        let mut bytes = Vec::new();
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(|e| ApiError::RequestFailed(e.to_string()))?;
            bytes.extend_from_slice(&chunk);
        }

        String::from_utf8(bytes).map_err(|e| ApiError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl PersistencePort for EngineHttpClient {
    async fn save(&self, request: SaveRequest) -> Result<(), ApiError> {
        let response: SaveResponse = self
            .post(SAVE_PATH, &request)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::ParseError(e.to_string()))?;

        if !response.success {
            return Err(ApiError::ServerError {
                status: 200,
                message: "save was not acknowledged".to_string(),
            });
        }
        Ok(())
    }
}

/// The engine's `{"error": ...}` message, or the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().to_string())
}
