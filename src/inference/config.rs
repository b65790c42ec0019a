//! Configuration for schema inference

use serde::{Deserialize, Serialize};

use super::error::InferenceError;

/// How batches are scheduled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Batches run concurrently on a worker pool
    #[default]
    Parallel,
    /// Batches run one after another on the calling thread (for step-through debugging)
    Sequential,
}

/// Configuration for schema inference
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InferenceConfig {
    /// Separator used to join path segments
    pub separator: String,

    /// Render type tags as lowercase text labels in the output
    pub render_types_as_text: bool,

    /// Batch scheduling mode
    pub execution_mode: ExecutionMode,

    /// Number of workers (0 = available parallelism)
    pub worker_count: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            separator: ".".to_string(),
            render_types_as_text: false,
            execution_mode: ExecutionMode::Parallel,
            worker_count: 0,
        }
    }
}

impl InferenceConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> InferenceConfigBuilder {
        InferenceConfigBuilder::default()
    }

    /// Load a configuration from YAML text; missing keys take their defaults
    pub fn from_yaml(text: &str) -> Result<Self, InferenceError> {
        let config: Self =
            serde_yaml::from_str(text).map_err(|e| InferenceError::Config(e.to_string()))?;
        config.validate()
    }

    /// Load a configuration from JSON text; missing keys take their defaults
    pub fn from_json(text: &str) -> Result<Self, InferenceError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| InferenceError::Config(e.to_string()))?;
        config.validate()
    }

    fn validate(self) -> Result<Self, InferenceError> {
        if self.separator.is_empty() {
            return Err(InferenceError::Config(
                "separator must not be empty".to_string(),
            ));
        }
        Ok(self)
    }

    /// Number of workers to size batches for
    pub fn effective_worker_count(&self) -> usize {
        if self.worker_count > 0 {
            return self.worker_count;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

/// Builder for InferenceConfig
#[derive(Debug, Default)]
pub struct InferenceConfigBuilder {
    config: InferenceConfig,
}

impl InferenceConfigBuilder {
    /// Set the path separator (an empty separator is ignored)
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        if !separator.is_empty() {
            self.config.separator = separator;
        }
        self
    }

    /// Render type tags as lowercase text labels
    pub fn render_types_as_text(mut self, render: bool) -> Self {
        self.config.render_types_as_text = render;
        self
    }

    /// Set the execution mode
    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.config.execution_mode = mode;
        self
    }

    /// Shorthand for [`ExecutionMode::Sequential`]
    pub fn sequential(self) -> Self {
        self.execution_mode(ExecutionMode::Sequential)
    }

    /// Set the number of workers (0 = available parallelism)
    pub fn worker_count(mut self, workers: usize) -> Self {
        self.config.worker_count = workers;
        self
    }

    /// Build the configuration
    pub fn build(self) -> InferenceConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InferenceConfig::default();
        assert_eq!(config.separator, ".");
        assert!(!config.render_types_as_text);
        assert_eq!(config.execution_mode, ExecutionMode::Parallel);
        assert_eq!(config.worker_count, 0);
    }

    #[test]
    fn test_builder() {
        let config = InferenceConfig::builder()
            .separator("|")
            .render_types_as_text(true)
            .sequential()
            .worker_count(3)
            .build();

        assert_eq!(config.separator, "|");
        assert!(config.render_types_as_text);
        assert_eq!(config.execution_mode, ExecutionMode::Sequential);
        assert_eq!(config.effective_worker_count(), 3);
    }

    #[test]
    fn test_empty_separator_ignored() {
        let config = InferenceConfig::builder().separator("").build();
        assert_eq!(config.separator, ".");
    }

    #[test]
    fn test_effective_worker_count_defaults_to_host() {
        let config = InferenceConfig::default();
        assert!(config.effective_worker_count() >= 1);
    }

    #[test]
    fn test_from_yaml() {
        let config = InferenceConfig::from_yaml(
            "separator: '/'\nrenderTypesAsText: true\nexecutionMode: sequential\n",
        )
        .unwrap();

        assert_eq!(config.separator, "/");
        assert!(config.render_types_as_text);
        assert_eq!(config.execution_mode, ExecutionMode::Sequential);
        assert_eq!(config.worker_count, 0);
    }

    #[test]
    fn test_from_json_rejects_empty_separator() {
        let err = InferenceConfig::from_json(r#"{"separator": ""}"#).unwrap_err();
        assert!(matches!(err, InferenceError::Config(_)));
    }

    #[test]
    fn test_from_json_invalid_text() {
        let err = InferenceConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, InferenceError::Config(_)));
    }
}
