use thiserror::Error;

/// Construction-time violations of the record schema contract.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("a record schema must declare at least one step")]
    EmptyRecord,
    #[error("step `{0}` must declare at least one field")]
    EmptyStep(String),
    #[error("duplicate step name `{0}`")]
    DuplicateStep(String),
    #[error("duplicate field key `{0}`; field keys are unique across the whole record")]
    DuplicateField(String),
}

/// Error type that captures CLI and persistence failures.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid wizard definition: {0}")]
    Schema(#[from] SchemaError),
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error("{0}")]
    Usage(String),
}
