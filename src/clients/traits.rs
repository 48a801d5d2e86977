use async_trait::async_trait;
use thiserror::Error;

use crate::schemas::{ErrorBody, ExportResponse, QueryParams, QueryResult, ServerStatus};

/// Which generation route a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Model-backed generation
    Primary,
    /// Template-based generation used when the model provider fails
    Fallback,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Primary => "primary",
            Endpoint::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("server returned {status}")]
    Status { status: u16, body: ErrorBody },
    #[error("decode error: {0}")]
    Decode(String),
}

/// Remote surface of the question-generation server.
#[async_trait]
pub trait GenerationApi: Send + Sync {
    async fn health(&self) -> Result<ServerStatus, ApiError>;

    async fn generate(
        &self,
        endpoint: Endpoint,
        params: &QueryParams,
    ) -> Result<QueryResult, ApiError>;

    async fn format_export(&self, result: &QueryResult) -> Result<ExportResponse, ApiError>;
}
