//! Schema inference for semi-structured records
//!
//! This module infers a flat schema from nested records: every leaf is
//! addressed by a field path, classified into a [`TypeTag`], and aggregated
//! into usage and size statistics.
//!
//! ## Features
//!
//! - **Type classification** - Native values and text literals (integers, decimals, booleans, timestamps)
//! - **Batch parallelism** - Records are split into batches built concurrently on a worker pool
//! - **Schema merging** - Partial schemas combine with type promotion (`Integer` + `Number` = `Number`)
//! - **Array collapsing** - Index paths (`tags.0`, `tags.1`) fold into one `Array` entry
//! - **Null elision** - Null-only paths disappear once a nested path exists below them
//!
//! ## Example
//!
//! ```rust,ignore
//! use schema_inference::inference::{InferOptions, SchemaInferrer};
//! use serde_json::json;
//!
//! let inferrer = SchemaInferrer::new();
//! let schema = inferrer.infer_json(
//!     &json!([{"name": "Alice", "tags": ["a"]}, {"name": "Bob", "age": "30"}]),
//!     InferOptions::new(),
//! )?;
//!
//! println!("{}", schema.to_json_pretty());
//! ```

mod builder;
mod classify;
mod config;
mod error;
mod flatten;
mod inferrer;
mod merge;
mod types;
mod value;

pub use builder::BatchSchemaBuilder;
pub use classify::{ChronoTimestampParser, TimestampParser, classify, value_size};
pub use config::{ExecutionMode, InferenceConfig, InferenceConfigBuilder};
pub use error::InferenceError;
pub use flatten::{FlatField, Flattener, parse_index};
pub use inferrer::{InferOptions, SchemaInferrer, infer_schema};
pub use merge::{collapse_arrays, elide_nulls, merge_partial_schemas, merge_schemas};
pub use types::{FieldSchema, InferredSchema, PartialSchema, Size, TypeStats, TypeTag};
pub use value::{Record, Value, parse_records};
