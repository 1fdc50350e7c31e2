use camino::Utf8Path;
use codefix_types::receipt::AnalysisReceipt;
use fs_err as fs;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReceiptLoadError {
    #[error("io error: {message}")]
    Io { message: String },

    #[error("json parse error: {message}")]
    Json { message: String },

    #[error("toml parse error: {message}")]
    Toml { message: String },

    #[error("invalid source pattern `{pattern}`: {message}")]
    Pattern { pattern: String, message: String },
}

/// Load an analysis snapshot from `path`.
pub fn load_analysis(path: &Utf8Path) -> Result<AnalysisReceipt, ReceiptLoadError> {
    debug!(path = %path, "loading analysis snapshot");

    let contents = fs::read_to_string(path).map_err(|e| ReceiptLoadError::Io {
        message: e.to_string(),
    })?;
    let receipt: AnalysisReceipt =
        serde_json::from_str(&contents).map_err(|e| ReceiptLoadError::Json {
            message: e.to_string(),
        })?;

    if !receipt.schema.is_empty() && receipt.schema != codefix_types::schema::CODEFIX_ANALYSIS_V1
    {
        debug!(schema = %receipt.schema, "unrecognised snapshot schema; reading tolerantly");
    }

    debug!(
        diagnostics = receipt.diagnostics.len(),
        fixes = receipt.fixes.len(),
        "loaded analysis snapshot"
    );
    Ok(receipt)
}
