use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::clients::traits::{ApiError, Endpoint, GenerationApi};
use crate::config::ApiConfig;
use crate::error::NicheScoutError;
use crate::schemas::{ErrorBody, ExportResponse, QueryParams, QueryResult, ServerStatus};

/// reqwest-backed client for the generation server
pub struct HttpGenerationClient {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpGenerationClient {
    pub fn new(config: ApiConfig) -> crate::error::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| NicheScoutError::Config {
                message: format!("Failed to build reqwest client with timeout: {}", e),
            })?;
        Ok(Self { client, config })
    }

    fn endpoint_path(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Primary => &self.config.primary_path,
            Endpoint::Fallback => &self.config.fallback_path,
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            // Non-JSON error pages still count as a status failure
            let body = serde_json::from_str::<ErrorBody>(&text).unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl GenerationApi for HttpGenerationClient {
    async fn health(&self) -> Result<ServerStatus, ApiError> {
        let url = self.config.url(&self.config.health_path);
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::decode(response).await
    }

    async fn generate(
        &self,
        endpoint: Endpoint,
        params: &QueryParams,
    ) -> Result<QueryResult, ApiError> {
        let url = self.config.url(self.endpoint_path(endpoint));
        debug!("POST {} ({})", url, endpoint.as_str());
        let response = self
            .client
            .post(&url)
            .json(params)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        debug!("generation response status: {}", response.status());
        Self::decode(response).await
    }

    async fn format_export(&self, result: &QueryResult) -> Result<ExportResponse, ApiError> {
        let url = self.config.url(&self.config.export_path);
        debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .json(result)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        // The export route reports failures in the body as well as the status
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        match serde_json::from_str::<ExportResponse>(&text) {
            Ok(body) => Ok(body),
            Err(_) if !status.is_success() => Err(ApiError::Status {
                status: status.as_u16(),
                body: ErrorBody::default(),
            }),
            Err(e) => Err(ApiError::Decode(e.to_string())),
        }
    }
}
