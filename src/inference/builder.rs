//! Per-batch schema building

use std::collections::HashSet;

use tracing::{debug, trace};

use super::classify::value_size;
use super::flatten::{FlatField, Flattener};
use super::types::{FieldSchema, PartialSchema};
use super::value::Value;

/// Folds a batch of records into a [`PartialSchema`]
pub struct BatchSchemaBuilder<'a> {
    flattener: Flattener<'a>,
    schema: PartialSchema,
}

impl<'a> BatchSchemaBuilder<'a> {
    /// Create a builder over the given flattener
    pub fn new(flattener: Flattener<'a>) -> Self {
        Self {
            flattener,
            schema: PartialSchema::new(),
        }
    }

    /// Add one record to the batch schema.
    ///
    /// A path is counted once per record. When a literal key containing the
    /// separator collides with a nested path (`{"a": {"b": 1}, "a.b": 2}`),
    /// the first leaf in traversal order wins.
    pub fn add_record(&mut self, record: &Value) {
        self.schema.record_count += 1;

        let mut seen: HashSet<String> = HashSet::new();
        for FlatField { path, tag, value } in self.flattener.flatten(record) {
            if !seen.insert(path.clone()) {
                debug!(path = %path, "Skipping colliding field path");
                continue;
            }
            self.schema
                .fields
                .entry(path)
                .or_insert_with(|| FieldSchema::new(tag))
                .observe(tag, value_size(&value));
        }
    }

    /// Add a slice of records
    pub fn add_records(&mut self, records: &[Value]) {
        for record in records {
            self.add_record(record);
        }
    }

    /// Number of records added so far
    pub fn record_count(&self) -> usize {
        self.schema.record_count
    }

    /// Finish the batch
    pub fn finish(self) -> PartialSchema {
        trace!(
            records = self.schema.record_count,
            fields = self.schema.fields.len(),
            "Batch schema built"
        );
        self.schema
    }

    /// Build a partial schema from a batch of records in one call
    pub fn build(flattener: Flattener<'a>, records: &[Value]) -> PartialSchema {
        let mut builder = Self::new(flattener);
        builder.add_records(records);
        builder.finish()
    }
}
