//! Record flattening
//!
//! A record tree is walked depth-first and every scalar leaf becomes one
//! [`FlatField`] keyed by its field path: map keys and list indices joined
//! with the configured separator (`user.tags.0` with the default `"."`).

use std::borrow::Cow;
use std::collections::BTreeMap;

use super::classify::{TimestampParser, classify};
use super::types::TypeTag;
use super::value::Value;

/// One classified leaf of a record
#[derive(Debug, Clone, PartialEq)]
pub struct FlatField<'a> {
    /// Field path
    pub path: String,
    /// Classified type
    pub tag: TypeTag,
    /// Coerced value
    pub value: Cow<'a, Value>,
}

/// Walks records into classified leaves and resolves field paths
#[derive(Clone, Copy)]
pub struct Flattener<'a> {
    separator: &'a str,
    parser: &'a dyn TimestampParser,
}

impl<'a> Flattener<'a> {
    /// Create a flattener joining path segments with `separator`
    pub fn new(separator: &'a str, parser: &'a dyn TimestampParser) -> Self {
        Self { separator, parser }
    }

    /// Path separator
    pub fn separator(&self) -> &str {
        self.separator
    }

    /// Flatten a record into its classified leaves
    pub fn flatten<'v>(&self, record: &'v Value) -> Vec<FlatField<'v>> {
        let mut fields = Vec::new();
        self.flatten_into(record, "", &mut fields);
        fields
    }

    fn flatten_into<'v>(&self, value: &'v Value, prefix: &str, out: &mut Vec<FlatField<'v>>) {
        match value {
            Value::Map(map) => {
                for (key, child) in map {
                    let path = self.join(prefix, key);
                    self.flatten_into(child, &path, out);
                }
            }
            Value::List(items) => {
                for (index, child) in items.iter().enumerate() {
                    let path = self.join(prefix, &index.to_string());
                    self.flatten_into(child, &path, out);
                }
            }
            scalar => {
                let (tag, value) = classify(scalar, self.parser);
                out.push(FlatField {
                    path: prefix.to_string(),
                    tag,
                    value,
                });
            }
        }
    }

    fn join(&self, prefix: &str, segment: &str) -> String {
        if prefix.is_empty() {
            segment.to_string()
        } else {
            format!("{}{}{}", prefix, self.separator, segment)
        }
    }

    /// Resolve a field path against a record
    pub fn value_at<'v>(&self, record: &'v Value, path: &str) -> Option<&'v Value> {
        let mut current = record;
        for token in path.split(self.separator) {
            current = match current {
                Value::Map(map) => map.get(token)?,
                Value::List(items) => items.get(parse_index(token)?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Write `value` at a field path, creating intermediate maps and lists.
    ///
    /// An index segment creates a list (padded with nulls up to the index),
    /// any other segment a map. Returns `false` without writing when the
    /// path addresses an existing list with a non-index segment.
    pub fn insert_at(&self, record: &mut Value, path: &str, value: Value) -> bool {
        let mut current = record;
        for token in path.split(self.separator) {
            match child_slot(current, token) {
                Some(slot) => current = slot,
                None => return false,
            }
        }
        *current = value;
        true
    }
}

/// Parse a path segment as a list index
pub fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

fn child_slot<'v>(node: &'v mut Value, token: &str) -> Option<&'v mut Value> {
    let index = parse_index(token);
    if !node.is_container() {
        *node = match index {
            Some(_) => Value::List(Vec::new()),
            None => Value::Map(BTreeMap::new()),
        };
    }
    match node {
        Value::Map(map) => Some(map.entry(token.to_string()).or_insert(Value::Null)),
        Value::List(items) => {
            let index = index?;
            if items.len() <= index {
                items.resize(index + 1, Value::Null);
            }
            items.get_mut(index)
        }
        _ => None,
    }
}
