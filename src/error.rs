//! Domain-specific error types for niche-scout

use thiserror::Error;

/// Main error type for the generation pipeline and exporters
#[derive(Error, Debug)]
pub enum NicheScoutError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Connectivity error: {message}")]
    Connectivity { message: String },

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Empty result: the server returned no questions")]
    EmptyResult,

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Superseded: submission {ticket} was replaced by a newer one")]
    Superseded { ticket: u64 },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("HTTP error: {message}")]
    Http { message: String },

    #[error("IO error: {message}")]
    Io { message: String },
}

impl NicheScoutError {
    /// Single user-visible line for the status area of the view.
    pub fn user_message(&self) -> String {
        match self {
            NicheScoutError::Validation { .. } => {
                "Please fill in the required fields (niche and audience).".to_string()
            }
            NicheScoutError::Connectivity { .. } => {
                "Error: cannot reach the server. Make sure it is running.".to_string()
            }
            NicheScoutError::Server { status, message } => {
                format!("Server error: {status}. Details: {message}. Please try again.")
            }
            NicheScoutError::EmptyResult => {
                "No questions could be generated. Try a different niche.".to_string()
            }
            NicheScoutError::Export { message } => format!("Export failed: {message}"),
            NicheScoutError::Superseded { .. } => {
                "A newer request replaced this one.".to_string()
            }
            other => format!("{other}. Please try again."),
        }
    }
}

impl From<serde_json::Error> for NicheScoutError {
    fn from(err: serde_json::Error) -> Self {
        NicheScoutError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for NicheScoutError {
    fn from(err: reqwest::Error) -> Self {
        NicheScoutError::Http {
            message: format!("HTTP request failed: {}", err),
        }
    }
}

impl From<std::io::Error> for NicheScoutError {
    fn from(err: std::io::Error) -> Self {
        NicheScoutError::Io {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for NicheScoutError {
    fn from(err: toml::de::Error) -> Self {
        NicheScoutError::Config {
            message: format!("Invalid config file: {}", err),
        }
    }
}

/// Result type alias for niche-scout operations
pub type Result<T> = std::result::Result<T, NicheScoutError>;
