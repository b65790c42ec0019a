//! Schema Inference - Infer flat schemas from nested, semi-structured records
//!
//! Provides:
//! - Field path flattening of nested maps and lists
//! - Type classification of native values and text literals
//! - Parallel per-batch schema building and merging
//! - Usage and size statistics per field and type

pub mod inference;

// Re-export commonly used types
pub use inference::{
    ExecutionMode, FieldSchema, InferOptions, InferenceConfig, InferenceError, InferredSchema,
    SchemaInferrer, Size, TypeStats, TypeTag, Value, infer_schema, parse_records,
};
