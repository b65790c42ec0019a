//! Schema inference engine
//!
//! Splits a dataset into batches, builds a partial schema per batch on a
//! worker pool, and merges the partial schemas into the final result.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use rayon::prelude::*;
use tracing::{debug, info};

use super::builder::BatchSchemaBuilder;
use super::classify::{ChronoTimestampParser, TimestampParser};
use super::config::{ExecutionMode, InferenceConfig};
use super::error::InferenceError;
use super::flatten::Flattener;
use super::merge::merge_schemas;
use super::types::{InferredSchema, PartialSchema};
use super::value::Value;

/// Per-call inference options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InferOptions {
    /// Number of batches (0 = one batch per worker)
    pub batch_count: usize,
    /// Keep array index paths instead of collapsing them
    pub extended: bool,
}

impl InferOptions {
    /// Create options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of batches
    pub fn batch_count(mut self, batch_count: usize) -> Self {
        self.batch_count = batch_count;
        self
    }

    /// Keep array index paths as individual fields
    pub fn extended(mut self, extended: bool) -> Self {
        self.extended = extended;
        self
    }
}

/// Schema inference engine
///
/// Holds configuration and a worker pool; every call recomputes the schema
/// from the data it is given. The pool is built on the first parallel call
/// and shared by clones.
#[derive(Clone)]
pub struct SchemaInferrer {
    config: InferenceConfig,
    timestamp_parser: Arc<dyn TimestampParser>,
    thread_pool: Arc<OnceCell<rayon::ThreadPool>>,
}

impl SchemaInferrer {
    /// Create a new schema inferrer with default configuration
    pub fn new() -> Self {
        Self::with_config(InferenceConfig::default())
    }

    /// Create a new schema inferrer with custom configuration
    pub fn with_config(config: InferenceConfig) -> Self {
        Self {
            config,
            timestamp_parser: Arc::new(ChronoTimestampParser),
            thread_pool: Arc::new(OnceCell::new()),
        }
    }

    /// Replace the timestamp parser used to classify text values
    pub fn with_timestamp_parser(mut self, parser: Arc<dyn TimestampParser>) -> Self {
        self.timestamp_parser = parser;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Flattener using this inferrer's separator and timestamp parser
    pub fn flattener(&self) -> Flattener<'_> {
        Flattener::new(&self.config.separator, self.timestamp_parser.as_ref())
    }

    /// Infer the schema of a record or a list of records
    pub fn infer(&self, dataset: &Value) -> Result<InferredSchema, InferenceError> {
        self.infer_with(dataset, InferOptions::default())
    }

    /// Infer the schema of a record or a list of records with explicit options
    pub fn infer_with(
        &self,
        dataset: &Value,
        options: InferOptions,
    ) -> Result<InferredSchema, InferenceError> {
        match dataset {
            Value::Map(_) => self.infer_records(std::slice::from_ref(dataset), options),
            Value::List(records) => self.infer_records(records, options),
            other => Err(InferenceError::MalformedInput(
                other.kind_name().to_string(),
            )),
        }
    }

    /// Infer the schema of a JSON document (an object or an array of objects)
    pub fn infer_json(
        &self,
        dataset: &serde_json::Value,
        options: InferOptions,
    ) -> Result<InferredSchema, InferenceError> {
        self.infer_with(&Value::from(dataset), options)
    }

    /// Infer the schema of a materialized list of records.
    ///
    /// The records are split into contiguous batches, one per worker unless
    /// `options.batch_count` asks for a specific number.
    pub fn infer_records(
        &self,
        records: &[Value],
        options: InferOptions,
    ) -> Result<InferredSchema, InferenceError> {
        if records.is_empty() {
            return Err(InferenceError::NoData);
        }

        let target_batches = if options.batch_count > 0 {
            options.batch_count
        } else {
            self.config.effective_worker_count()
        };
        let batch_size = records.len().div_ceil(target_batches).max(1);
        let batches: Vec<&[Value]> = records.chunks(batch_size).collect();

        info!(
            records = records.len(),
            batches = batches.len(),
            batch_size,
            mode = ?self.config.execution_mode,
            "Inferring schema"
        );

        let flattener = self.flattener();
        let partials = self.run_batches(batches.len(), |index| {
            Ok(BatchSchemaBuilder::build(flattener, batches[index]))
        })?;

        Ok(self.finish(partials, options))
    }

    /// Infer a schema from batches produced on demand.
    ///
    /// `provider` is called once per batch index, on the worker building that
    /// batch, so data can be fetched close to where it is processed. A
    /// provider failure is returned unchanged as
    /// [`InferenceError::BatchProvider`].
    pub fn infer_batches<F>(
        &self,
        batch_count: usize,
        options: InferOptions,
        provider: F,
    ) -> Result<InferredSchema, InferenceError>
    where
        F: Fn(usize) -> anyhow::Result<Vec<Value>> + Sync,
    {
        if batch_count == 0 {
            return Err(InferenceError::NoData);
        }

        info!(
            batches = batch_count,
            mode = ?self.config.execution_mode,
            "Inferring schema from batch provider"
        );

        let flattener = self.flattener();
        let partials = self.run_batches(batch_count, |index| {
            let records = provider(index).map_err(InferenceError::BatchProvider)?;
            Ok(BatchSchemaBuilder::build(flattener, &records))
        })?;

        Ok(self.finish(partials, options))
    }

    /// Build every batch, concurrently unless running sequentially
    fn run_batches<F>(
        &self,
        batch_count: usize,
        build: F,
    ) -> Result<Vec<PartialSchema>, InferenceError>
    where
        F: Fn(usize) -> Result<PartialSchema, InferenceError> + Sync,
    {
        let build_logged = |index: usize| -> Result<PartialSchema, InferenceError> {
            let partial = build(index)?;
            debug!(
                batch = index,
                records = partial.record_count,
                fields = partial.fields.len(),
                "Batch complete"
            );
            Ok(partial)
        };

        match self.config.execution_mode {
            ExecutionMode::Sequential => (0..batch_count).map(build_logged).collect(),
            ExecutionMode::Parallel => self
                .worker_pool()?
                .install(|| (0..batch_count).into_par_iter().map(build_logged).collect()),
        }
    }

    /// Worker pool sized by the configuration, created on first use
    fn worker_pool(&self) -> Result<&rayon::ThreadPool, InferenceError> {
        self.thread_pool.get_or_try_init(|| {
            let workers = self.config.effective_worker_count();
            debug!(workers, "Creating worker pool");
            rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|index| format!("schema-inference-{}", index))
                .build()
                .map_err(InferenceError::from)
        })
    }

    fn finish(&self, partials: Vec<PartialSchema>, options: InferOptions) -> InferredSchema {
        let total_record_count = partials.iter().map(|p| p.record_count).sum();
        let mut schema = merge_schemas(
            partials,
            total_record_count,
            &self.config.separator,
            options.extended,
        );
        schema.render_types_as_text = self.config.render_types_as_text;

        info!(
            fields = schema.len(),
            records = schema.record_count,
            extended = options.extended,
            "Schema inferred"
        );
        schema
    }
}

impl Default for SchemaInferrer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SchemaInferrer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaInferrer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Infer the schema of a record or a list of records with default settings
pub fn infer_schema(dataset: &Value) -> Result<InferredSchema, InferenceError> {
    SchemaInferrer::new().infer(dataset)
}
