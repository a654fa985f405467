use std::path::PathBuf;
use thiserror::Error;

use crate::schema::REQUIRED_COLUMNS;

#[derive(Error, Debug)]
pub enum ChurnError {
    #[error("Default file '{}' not found.", .0.display())]
    DefaultFileNotFound(PathBuf),

    #[error("Please upload a file to continue.")]
    AwaitingUpload,

    #[error("{}", missing_columns_message())]
    MissingRequiredColumns { missing: Vec<String> },

    #[error("Column '{0}' not found in dataset")]
    MissingColumn(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Polars error: {0}")]
    Polars(String),
}

impl ChurnError {
    /// Halts that wait on the user rather than report a failure.
    pub fn is_informational(&self) -> bool {
        matches!(self, ChurnError::AwaitingUpload)
    }
}

impl From<polars::error::PolarsError> for ChurnError {
    fn from(err: polars::error::PolarsError) -> Self {
        ChurnError::Polars(err.to_string())
    }
}

fn missing_columns_message() -> String {
    let bullets: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| format!("- {}", c)).collect();
    format!("Uploaded file is missing required columns:\n\n{}", bullets.join("\n"))
}

pub type Result<T> = std::result::Result<T, ChurnError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_all_required() {
        let err = ChurnError::MissingRequiredColumns {
            missing: vec!["Risk Level".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Uploaded file is missing required columns:"));
        assert!(msg.contains("- Predicted Churn Risk"));
        assert!(msg.contains("- Actual Churn(Yes/No)"));
        assert!(msg.contains("- Risk Level"));
    }

    #[test]
    fn test_awaiting_upload_is_informational() {
        assert!(ChurnError::AwaitingUpload.is_informational());
        assert!(!ChurnError::MissingColumn("tenure".into()).is_informational());
    }
}
