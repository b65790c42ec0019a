//! Error types for schema inference

use thiserror::Error;

/// Errors that can occur during schema inference
#[derive(Error, Debug)]
pub enum InferenceError {
    /// The dataset is neither a record nor a list of records
    #[error("Malformed input: expected a record or a list of records, found {0}")]
    MalformedInput(String),

    /// No records and no batch provider to draw them from
    #[error("No data: a dataset or a batch provider with a positive batch count must be given")]
    NoData,

    /// A batch provider callback failed
    #[error(transparent)]
    BatchProvider(anyhow::Error),

    /// The worker pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// Invalid configuration text
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for InferenceError {
    fn from(e: serde_json::Error) -> Self {
        InferenceError::JsonParse(e.to_string())
    }
}

impl From<rayon::ThreadPoolBuildError> for InferenceError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        InferenceError::ThreadPool(e.to_string())
    }
}
