use tracing::debug;

use crate::clients::{ApiError, GenerationApi};
use crate::error::{NicheScoutError, Result};
use crate::schemas::QueryResult;

/// Ask the server for canonical JSON formatting of `result`.
///
/// Returns the formatted payload and the server's suggested filename.
pub async fn format_json<A: GenerationApi + ?Sized>(
    api: &A,
    result: &QueryResult,
) -> Result<(String, Option<String>)> {
    let response = api.format_export(result).await.map_err(|e| {
        let message = match &e {
            ApiError::Status { status, body } => body
                .error
                .clone()
                .unwrap_or_else(|| format!("server returned {status}")),
            other => other.to_string(),
        };
        NicheScoutError::Export { message }
    })?;

    if !response.success {
        return Err(NicheScoutError::Export {
            message: response
                .error
                .unwrap_or_else(|| "server rejected the export".to_string()),
        });
    }

    let data = response.data.ok_or_else(|| NicheScoutError::Export {
        message: "server returned no data".to_string(),
    })?;
    debug!("server formatted {} bytes of JSON", data.len());
    Ok((data, response.filename))
}
