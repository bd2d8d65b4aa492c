use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Operation(#[from] ripple_operations::OperationError),

    #[error("failed to determine current directory")]
    CurrentDir(#[source] std::io::Error),

    #[error("failed to serialize output")]
    Json(#[from] serde_json::Error),

    #[error("failed to read confirmation")]
    Prompt(#[from] dialoguer::Error),

    #[error("operation cancelled by user")]
    Cancelled,

    #[error("failed to update: {}", packages.join(", "))]
    ApplyFailed { packages: Vec<String> },
}

pub type Result<T> = std::result::Result<T, CliError>;
