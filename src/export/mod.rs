//! Exports of the last successful result.

pub mod json;
pub mod pdf;
pub mod text;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use crate::clients::GenerationApi;
use crate::config::ExportConfig;
use crate::error::{NicheScoutError, Result};
use crate::schemas::QueryResult;
use crate::sessions::ResultSession;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1f]"#).expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Json,
    Txt,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Txt => "txt",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Txt => "text/plain;charset=utf-8",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = NicheScoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "txt" | "text" => Ok(ExportFormat::Txt),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(NicheScoutError::Validation {
                message: format!("unknown export format '{other}' (expected json, txt or pdf)"),
            }),
        }
    }
}

/// A built export, not yet written anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub filename: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

/// `niche_questions_<niche>_<date>.<ext>` with whitespace runs turned into
/// underscores. Path separators and other characters filesystems reject also
/// become underscores, so the name is always a single path component.
pub fn export_filename(niche: &str, date: NaiveDate, format: ExportFormat) -> String {
    let niche = WHITESPACE.replace_all(niche, "_");
    format!(
        "niche_questions_{}_{}.{}",
        UNSAFE_CHARS.replace_all(&niche, "_"),
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Keep only the final path component of a server-suggested name.
fn sanitize_filename(name: &str) -> Option<String> {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

/// Build an export of `result` in `format`.
pub async fn build_export<A: GenerationApi + ?Sized>(
    api: &A,
    result: &QueryResult,
    format: ExportFormat,
    config: &ExportConfig,
    today: NaiveDate,
) -> Result<ExportedFile> {
    let local_name = export_filename(result.niche(), today, format);
    match format {
        ExportFormat::Json => {
            let (data, suggested) = json::format_json(api, result).await?;
            Ok(ExportedFile {
                filename: suggested
                    .as_deref()
                    .and_then(sanitize_filename)
                    .unwrap_or(local_name),
                format,
                bytes: data.into_bytes(),
            })
        }
        ExportFormat::Txt => Ok(ExportedFile {
            filename: local_name,
            format,
            bytes: text::render_text(result).into_bytes(),
        }),
        ExportFormat::Pdf => Ok(ExportedFile {
            filename: local_name,
            format,
            bytes: pdf::render_pdf(result, &config.pdf)?,
        }),
    }
}

/// Writes exports of a session's last result into the output directory.
pub struct Exporter<'a, A: GenerationApi + ?Sized> {
    api: &'a A,
    session: &'a ResultSession,
    config: &'a ExportConfig,
}

impl<'a, A: GenerationApi + ?Sized> Exporter<'a, A> {
    pub fn new(api: &'a A, session: &'a ResultSession, config: &'a ExportConfig) -> Self {
        Self {
            api,
            session,
            config,
        }
    }

    /// Export the last result. Fails without touching the filesystem when
    /// nothing has been generated yet.
    pub async fn export(&self, format: ExportFormat) -> Result<PathBuf> {
        let result = self
            .session
            .last_result()
            .await
            .ok_or_else(|| NicheScoutError::Export {
                message: "No data to export. Generate questions first.".to_string(),
            })?;

        let today = chrono::Utc::now().date_naive();
        let file = build_export(self.api, &result, format, self.config, today).await?;
        self.write(&file).await
    }

    async fn write(&self, file: &ExportedFile) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.config.output_dir).await?;
        let path = self.config.output_dir.join(&file.filename);
        tokio::fs::write(&path, &file.bytes).await?;
        info!(
            "Exported {} ({}, {} bytes)",
            path.display(),
            file.format.content_type(),
            file.bytes.len()
        );
        Ok(path)
    }
}
