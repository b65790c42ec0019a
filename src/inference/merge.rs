//! Schema merging utilities
//!
//! Combines the partial schemas built for each batch into one final schema,
//! then runs the post-processing passes:
//!
//! 1. null elision: a path only ever seen as null is dropped when a nested
//!    path under it exists (`k` was null in some records and `[4]` in others)
//! 2. array collapsing: index families (`a.0`, `a.1`, ...) are replaced by a
//!    single `Array` entry at `a` carrying usage and size bounds
//! 3. usage fractions against the total record count

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Bound;

use tracing::debug;

use super::flatten::parse_index;
use super::types::{FieldSchema, InferredSchema, PartialSchema, TypeTag};

/// Fold partial schemas into one, summing their record counts.
///
/// Uses the same type unification and count/min/max aggregation as batch
/// building, so the result does not depend on fold order or partitioning.
pub fn merge_partial_schemas(schemas: Vec<PartialSchema>) -> PartialSchema {
    let mut schemas = schemas.into_iter();
    let Some(mut merged) = schemas.next() else {
        return PartialSchema::new();
    };

    for schema in schemas {
        merged.record_count += schema.record_count;
        for (path, field) in schema.fields {
            match merged.fields.get_mut(&path) {
                Some(existing) => existing.merge_with(&field),
                None => {
                    merged.fields.insert(path, field);
                }
            }
        }
    }

    merged
}

/// Merge partial schemas and finalize them into an [`InferredSchema`].
///
/// `extended` keeps array index paths as individual fields instead of
/// collapsing them.
pub fn merge_schemas(
    schemas: Vec<PartialSchema>,
    total_record_count: usize,
    separator: &str,
    extended: bool,
) -> InferredSchema {
    let batch_count = schemas.len();
    let mut fields = merge_partial_schemas(schemas).fields;

    elide_nulls(&mut fields, separator);
    if !extended {
        collapse_arrays(&mut fields, separator);
    }

    for field in fields.values_mut() {
        field.usage = usage_fraction(field.usage_count, total_record_count);
    }

    InferredSchema::from_fields(fields, total_record_count, batch_count)
}

fn usage_fraction(usage_count: usize, total_record_count: usize) -> f64 {
    if total_record_count == 0 {
        return 0.0;
    }
    usage_count as f64 / total_record_count as f64
}

/// Drop null-only paths that have a structured extension (`path` + separator + ...)
pub fn elide_nulls(fields: &mut HashMap<String, FieldSchema>, separator: &str) {
    let paths: BTreeSet<&str> = fields.keys().map(String::as_str).collect();

    let elided: Vec<String> = fields
        .iter()
        .filter(|(_, field)| field.field_type == TypeTag::Null)
        .filter(|(path, _)| {
            let prefix = format!("{}{}", path, separator);
            paths
                .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
                .next()
                .is_some_and(|next| next.starts_with(&prefix))
        })
        .map(|(path, _)| path.clone())
        .collect();

    for path in elided {
        debug!(path = %path, "Eliding null field with structured extension");
        fields.remove(&path);
    }
}

/// Collapse index families into `Array` descriptors at their key prefix.
///
/// For each family the usage count is the highest usage among its index
/// paths, `min_size` the number of index paths reaching that usage, and
/// `max_size` one past the highest index. Families are processed deepest
/// prefix first. A descriptor whose own last segment is an index joins its
/// parent's family, so lists of lists collapse all the way up.
pub fn collapse_arrays(fields: &mut HashMap<String, FieldSchema>, separator: &str) {
    let mut families: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    for path in fields.keys() {
        if let Some((prefix, index)) = split_index(path, separator) {
            families
                .entry(prefix.to_string())
                .or_default()
                .insert(path.clone(), index);
        }
    }

    // parents sort before their children, so popping from the back visits
    // deeper families first
    while let Some((prefix, members)) = families.pop_last() {
        let usage_counts: Vec<usize> = members
            .keys()
            .filter_map(|path| fields.get(path).map(|f| f.usage_count))
            .collect();
        let usage_count = usage_counts.iter().copied().max().unwrap_or(0);
        let min_size = usage_counts.iter().filter(|&&u| u == usage_count).count();
        let max_size = members.values().map(|index| index + 1).max().unwrap_or(0);

        for path in members.keys() {
            fields.remove(path);
        }

        if let Some(existing) = fields.get(&prefix) {
            debug!(
                path = %prefix,
                replaced = %existing.field_type,
                "Array descriptor replaces existing field"
            );
        }

        if let Some((parent, index)) = split_index(&prefix, separator) {
            families
                .entry(parent.to_string())
                .or_default()
                .insert(prefix.clone(), index);
        }
        fields.insert(prefix, FieldSchema::array(usage_count, min_size, max_size));
    }
}

/// Split `prefix<sep><index>` into its key prefix and index
fn split_index<'p>(path: &'p str, separator: &str) -> Option<(&'p str, usize)> {
    let (prefix, last) = path.rsplit_once(separator)?;
    parse_index(last).map(|index| (prefix, index))
}
