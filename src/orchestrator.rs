//! Generate → verify → fallback → store pipeline.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::clients::{ApiError, Endpoint, GenerationApi};
use crate::error::{NicheScoutError, Result};
use crate::schemas::{QueryParams, QueryResult, ServerStatus};
use crate::sessions::ResultSession;

/// Structured code a server sends when the model provider is unavailable.
pub const PROVIDER_UNAVAILABLE_CODE: &str = "provider_unavailable";

/// How a failed primary generation should be handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// Reroute to the fallback endpoint
    ProviderUnavailable,
    /// Surface as a server error
    Fatal { status: u16, message: String },
}

/// Decides whether a failed primary call is a provider failure.
#[derive(Debug, Clone)]
pub struct FailureClassifier {
    triggers: Vec<String>,
}

impl FailureClassifier {
    pub fn new(triggers: Vec<String>) -> Self {
        Self { triggers }
    }

    pub fn classify(&self, status: u16, code: Option<&str>, message: Option<&str>) -> FailureKind {
        if code.is_some_and(|c| c.eq_ignore_ascii_case(PROVIDER_UNAVAILABLE_CODE)) {
            return FailureKind::ProviderUnavailable;
        }

        // Compatibility shim for servers that only send free text
        if status == 500
            && let Some(text) = message
            && self.triggers.iter().any(|t| text.contains(t.as_str()))
        {
            return FailureKind::ProviderUnavailable;
        }

        FailureKind::Fatal {
            status,
            message: message.unwrap_or("No details").to_string(),
        }
    }
}

/// Runs one submission at a time through discrete steps and keeps the last
/// successful result in its session.
pub struct RequestOrchestrator<A: GenerationApi> {
    api: A,
    classifier: FailureClassifier,
    session: Arc<ResultSession>,
}

impl<A: GenerationApi> RequestOrchestrator<A> {
    pub fn new(api: A, classifier: FailureClassifier) -> Self {
        Self {
            api,
            classifier,
            session: Arc::new(ResultSession::new()),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn session(&self) -> &Arc<ResultSession> {
        &self.session
    }

    /// Full pipeline. On success the result is stored in the session.
    pub async fn submit(&self, params: &QueryParams) -> Result<QueryResult> {
        Self::validate(params)?;
        let ticket = self.session.begin();
        debug!(ticket, niche = %params.niche, "submission started");

        let status = self.check_liveness().await?;
        info!("Server online, model: {}", status.model_info);

        let result = self.request_generation(params).await?;
        let result = Self::verify_result(result)?;

        if !self.session.commit(ticket, result.clone()).await {
            debug!(ticket, "discarding superseded result");
            return Err(NicheScoutError::Superseded { ticket });
        }
        info!("Generated {} questions", result.questions.len());
        Ok(result)
    }

    /// Required fields must be non-blank. No network access.
    pub fn validate(params: &QueryParams) -> Result<()> {
        let missing = params.missing_required();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(NicheScoutError::Validation {
                message: format!("missing required fields: {}", missing.join(", ")),
            })
        }
    }

    /// Probe the health endpoint. Any failure aborts the pipeline.
    pub async fn check_liveness(&self) -> Result<ServerStatus> {
        let status = self.api.health().await.map_err(|e| {
            warn!("Liveness check failed: {}", e);
            NicheScoutError::Connectivity {
                message: e.to_string(),
            }
        })?;
        if !status.model_available() {
            warn!("No model available on the server, the fallback generator will be used");
        }
        Ok(status)
    }

    /// Primary generation, rerouted once to the fallback endpoint on a
    /// provider failure.
    pub async fn request_generation(&self, params: &QueryParams) -> Result<QueryResult> {
        match self.api.generate(Endpoint::Primary, params).await {
            Ok(result) => Ok(result),
            Err(ApiError::Status { status, body }) => {
                match self
                    .classifier
                    .classify(status, body.code.as_deref(), body.error.as_deref())
                {
                    FailureKind::ProviderUnavailable => {
                        info!("Provider failure on primary endpoint, using fallback generator");
                        self.request_fallback(params).await
                    }
                    FailureKind::Fatal { status, message } => {
                        Err(NicheScoutError::Server { status, message })
                    }
                }
            }
            Err(other) => Err(Self::transport_failure(other)),
        }
    }

    async fn request_fallback(&self, params: &QueryParams) -> Result<QueryResult> {
        self.api
            .generate(Endpoint::Fallback, params)
            .await
            .map_err(|e| match e {
                ApiError::Status { status, body } => NicheScoutError::Server {
                    status,
                    message: body
                        .error
                        .unwrap_or_else(|| "fallback generator failed".to_string()),
                },
                other => Self::transport_failure(other),
            })
    }

    fn transport_failure(err: ApiError) -> NicheScoutError {
        match err {
            ApiError::Decode(message) => NicheScoutError::Serialization { message },
            other => NicheScoutError::Http {
                message: other.to_string(),
            },
        }
    }

    /// A successful call with no questions is still a failure.
    pub fn verify_result(result: QueryResult) -> Result<QueryResult> {
        if result.questions.is_empty() {
            return Err(NicheScoutError::EmptyResult);
        }
        Ok(result)
    }
}
