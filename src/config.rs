use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{NicheScoutError, Result};

/// Phrases the reference server puts in provider failures.
pub const DEFAULT_FALLBACK_TRIGGERS: &[&str] = &["API de Gemini", "modelo", "generar contenido"];

/// Main configuration structure loaded from niche_scout.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub export: ExportConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Endpoints and transport settings for the generation server
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub health_path: String,
    pub primary_path: String,
    pub fallback_path: String,
    pub export_path: String,
    pub timeout_ms: u64,
    /// Substrings in a provider error that route the request to the fallback endpoint
    pub fallback_triggers: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            health_path: "/test".to_string(),
            primary_path: "/generar_preguntas_gemini".to_string(),
            fallback_path: "/generar_preguntas_basicas".to_string(),
            export_path: "/exportar".to_string(),
            timeout_ms: 60_000,
            fallback_triggers: DEFAULT_FALLBACK_TRIGGERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ApiConfig {
    /// Join the base URL with an endpoint path.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Where and how exports are written
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub pdf: PdfConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
            pdf: PdfConfig::default(),
        }
    }
}

/// Page geometry for PDF export, in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PdfConfig {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
}

impl Default for PdfConfig {
    fn default() -> Self {
        // A4
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 20.0,
        }
    }
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub log_level: String,
    pub color: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: "niche_scout=info".to_string(),
            color: true,
        }
    }
}

impl RuntimeConfig {
    /// Load runtime configuration from environment variables
    pub fn load_from_env() -> Self {
        Self {
            log_level: std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "niche_scout=info".to_string()),
            color: std::env::var("NO_COLOR").is_err(),
        }
    }
}

/// Load `.env` (or the file named by NICHE_ENV_FILE) into the process
/// environment. Variables already set are left alone.
pub fn load_env() {
    if let Ok(env_path) = std::env::var("NICHE_ENV_FILE") {
        let _ = dotenvy::from_path(env_path);
    } else {
        let _ = dotenvy::from_path(".env");
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables
    /// Uses NICHE_SCOUT_CONFIG environment variable or defaults to "niche_scout.toml"
    pub fn load() -> Result<Self> {
        load_env();

        let config_path = std::env::var("NICHE_SCOUT_CONFIG")
            .unwrap_or_else(|_| "niche_scout.toml".to_string());

        let mut config: Config = if let Ok(content) = std::fs::read_to_string(&config_path) {
            toml::from_str(&content)?
        } else {
            tracing::debug!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        config.apply_env_overrides();
        config.runtime = RuntimeConfig::load_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Env-first overrides on top of the file values
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("NICHE_API_URL") {
            self.api.base_url = url;
            tracing::debug!("NICHE_API_URL env override applied");
        }
        if let Some(timeout) = std::env::var("NICHE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.api.timeout_ms = timeout;
        }
        if let Ok(dir) = std::env::var("NICHE_OUTPUT_DIR") {
            self.export.output_dir = PathBuf::from(dir);
        }
        if let Ok(triggers) = std::env::var("NICHE_FALLBACK_TRIGGERS") {
            self.api.fallback_triggers = triggers
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
    }

    /// Validate and clamp loaded values
    pub fn validate(&mut self) -> Result<()> {
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(NicheScoutError::Config {
                message: format!(
                    "API base URL '{}' must start with http:// or https://",
                    self.api.base_url
                ),
            });
        }

        if self.api.timeout_ms == 0 {
            self.api.timeout_ms = 1_000;
        } else if self.api.timeout_ms > 600_000 {
            tracing::warn!(
                "timeout_ms {} exceeds max 600000, clamping",
                self.api.timeout_ms
            );
            self.api.timeout_ms = 600_000;
        }

        if self.api.fallback_triggers.is_empty() {
            tracing::warn!("No fallback triggers configured; only structured error codes will trigger fallback");
        }

        let pdf = &self.export.pdf;
        if pdf.margin_mm * 2.0 >= pdf.page_width_mm || pdf.margin_mm * 2.0 >= pdf.page_height_mm {
            return Err(NicheScoutError::Config {
                message: format!(
                    "PDF margin {}mm leaves no printable area on a {}x{}mm page",
                    pdf.margin_mm, pdf.page_width_mm, pdf.page_height_mm
                ),
            });
        }

        Ok(())
    }
}
