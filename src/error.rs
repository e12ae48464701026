use thiserror::Error;

/// Errors surfaced by the compliance evaluation core.
///
/// Configuration and snapshot-fetch problems are fatal to the invocation
/// that hit them; per-entity resolution problems are handled locally by the
/// evaluators and never reach this type.
#[derive(Debug, Error)]
pub enum ComplianceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Snapshot fetch failed during {audit_type} audit ({stage}): {message}")]
    SnapshotFetch {
        audit_type: String,
        stage: String,
        message: String,
    },

    #[error("Directory provider error: {0}")]
    Provider(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ComplianceError {
    /// Wrap a provider failure with the audit type and fetch stage it
    /// occurred in, so callers know what to retry.
    pub fn fetch_failure(audit_type: &str, stage: &str, err: ComplianceError) -> Self {
        ComplianceError::SnapshotFetch {
            audit_type: audit_type.to_string(),
            stage: stage.to_string(),
            message: err.to_string(),
        }
    }
}

pub type ComplianceResult<T> = Result<T, ComplianceError>;
