//! Type tags, field entries and schemas

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Semantic type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TypeTag {
    /// Absent / null
    Null,
    /// Boolean (native or `"true"`/`"false"` text)
    Boolean,
    /// Whole number
    Integer,
    /// Real number
    Number,
    /// Date and/or time
    Timestamp,
    /// Free text
    Text,
    /// Collapsed array descriptor (synthesized, never classified)
    Array,
    /// Top type: unknown or irreconcilable
    Generic,
}

impl TypeTag {
    /// Structured type name
    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::Null => "Null",
            TypeTag::Boolean => "Boolean",
            TypeTag::Integer => "Integer",
            TypeTag::Number => "Number",
            TypeTag::Timestamp => "Timestamp",
            TypeTag::Text => "Text",
            TypeTag::Array => "Array",
            TypeTag::Generic => "Generic",
        }
    }

    /// Lowercase text label
    pub fn label(&self) -> &'static str {
        match self {
            TypeTag::Null => "null",
            TypeTag::Boolean => "boolean",
            TypeTag::Integer => "integer",
            TypeTag::Number => "number",
            TypeTag::Timestamp => "timestamp",
            TypeTag::Text => "text",
            TypeTag::Array => "array",
            TypeTag::Generic => "generic",
        }
    }

    /// Check if this is a numeric tag
    pub fn is_numeric(&self) -> bool {
        matches!(self, TypeTag::Integer | TypeTag::Number)
    }

    /// Check if occurrences of this tag track min/max sizes
    pub fn has_size(&self) -> bool {
        matches!(self, TypeTag::Text | TypeTag::Integer | TypeTag::Number)
    }

    /// Least specific tag that still covers both tags
    pub fn lowest_common_type(self, other: TypeTag) -> TypeTag {
        if self == other {
            return self;
        }
        if self.is_numeric() && other.is_numeric() {
            return TypeTag::Number;
        }
        TypeTag::Generic
    }

    /// Dominant tag after observing `incoming` at a field currently typed `self`.
    ///
    /// Null never erases an established type, and a null-typed field adopts
    /// the first concrete tag it sees.
    pub fn absorb(self, incoming: TypeTag) -> TypeTag {
        match (self, incoming) {
            (current, new) if current == new => current,
            (TypeTag::Null, new) => new,
            (current, TypeTag::Null) => current,
            (current, new) => new.lowest_common_type(current),
        }
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Observed size of a value: text length or integer value (exact), or a real
/// number
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Size {
    /// Integer value or text length
    Integer(i64),
    /// Real number
    Number(f64),
}

impl Size {
    /// Size as a float (lossy above 2^53)
    pub fn as_f64(&self) -> f64 {
        match self {
            Size::Integer(i) => *i as f64,
            Size::Number(f) => *f,
        }
    }

    /// Total order over sizes; integers compare exactly
    pub fn total_cmp(&self, other: &Size) -> Ordering {
        match (self, other) {
            (Size::Integer(a), Size::Integer(b)) => a.cmp(b),
            (a, b) => a.as_f64().total_cmp(&b.as_f64()),
        }
    }

    fn smaller(self, other: Size) -> Size {
        if other.total_cmp(&self) == Ordering::Less {
            other
        } else {
            self
        }
    }

    fn larger(self, other: Size) -> Size {
        if other.total_cmp(&self) == Ordering::Greater {
            other
        } else {
            self
        }
    }
}

impl From<i64> for Size {
    fn from(value: i64) -> Self {
        Size::Integer(value)
    }
}

impl From<f64> for Size {
    fn from(value: f64) -> Self {
        Size::Number(value)
    }
}

/// Occurrence statistics for one type at one field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeStats {
    /// Number of occurrences
    pub count: usize,
    /// Smallest size seen (text length or numeric value)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Size>,
    /// Largest size seen (text length or numeric value)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Size>,
}

impl TypeStats {
    /// Record one occurrence
    pub fn observe(&mut self, size: Option<Size>) {
        self.count += 1;
        if let Some(size) = size {
            self.min = Some(self.min.map_or(size, |min| min.smaller(size)));
            self.max = Some(self.max.map_or(size, |max| max.larger(size)));
        }
    }

    /// Fold already-aggregated statistics into these
    pub fn merge(&mut self, other: &TypeStats) {
        self.count += other.count;
        self.min = match (self.min, other.min) {
            (Some(a), Some(b)) => Some(a.smaller(b)),
            (a, b) => a.or(b),
        };
        self.max = match (self.max, other.max) {
            (Some(a), Some(b)) => Some(a.larger(b)),
            (a, b) => a.or(b),
        };
    }
}

/// Aggregate schema entry for one field path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    /// Dominant type
    #[serde(rename = "type")]
    pub field_type: TypeTag,
    /// Number of occurrences of this path (null occurrences included)
    pub usage_count: usize,
    /// Fraction of all records using this path (set when finalized)
    pub usage: f64,
    /// Per-type statistics (empty for array descriptors)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub types: BTreeMap<TypeTag, TypeStats>,
    /// Minimum array length (array descriptors only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<usize>,
    /// Maximum array length (array descriptors only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<usize>,
}

impl FieldSchema {
    /// Create an empty entry first seen with `field_type`
    pub fn new(field_type: TypeTag) -> Self {
        Self {
            field_type,
            usage_count: 0,
            usage: 0.0,
            types: BTreeMap::new(),
            min_size: None,
            max_size: None,
        }
    }

    /// Create a collapsed array descriptor
    pub fn array(usage_count: usize, min_size: usize, max_size: usize) -> Self {
        Self {
            field_type: TypeTag::Array,
            usage_count,
            usage: 0.0,
            types: BTreeMap::new(),
            min_size: Some(min_size),
            max_size: Some(max_size),
        }
    }

    /// Check if this entry is a collapsed array descriptor
    pub fn is_array(&self) -> bool {
        self.field_type == TypeTag::Array
    }

    /// Record one occurrence of `tag`, with its size when the tag is sized
    pub fn observe(&mut self, tag: TypeTag, size: Option<Size>) {
        self.field_type = self.field_type.absorb(tag);
        self.usage_count += 1;
        let size = if tag.has_size() { size } else { None };
        self.types.entry(tag).or_default().observe(size);
    }

    /// Fold another batch's entry for the same path into this one
    pub fn merge_with(&mut self, other: &FieldSchema) {
        for (tag, stats) in &other.types {
            self.types.entry(*tag).or_default().merge(stats);
        }
        self.usage_count += other.usage_count;
        self.field_type = self.field_type.absorb(other.field_type);
    }

    /// Statistics for one type, if it was observed
    pub fn type_stats(&self, tag: TypeTag) -> Option<&TypeStats> {
        self.types.get(&tag)
    }
}

/// Schema built from a single batch of records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialSchema {
    /// Entries by field path
    pub fields: HashMap<String, FieldSchema>,
    /// Records consumed to build this schema
    pub record_count: usize,
}

impl PartialSchema {
    /// Create an empty partial schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the entry for a path
    pub fn get(&self, path: &str) -> Option<&FieldSchema> {
        self.fields.get(path)
    }
}

/// Final inferred schema, ordered by descending usage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InferredSchema {
    /// Entries in output order
    pub fields: Vec<(String, FieldSchema)>,
    /// Total records analyzed
    pub record_count: usize,
    /// Number of batches the records were split into
    pub batch_count: usize,
    /// Serialize type tags as lowercase labels
    pub render_types_as_text: bool,
}

impl InferredSchema {
    /// Build a schema from finalized entries, sorting them by descending usage
    /// (ties by path)
    pub fn from_fields(
        fields: impl IntoIterator<Item = (String, FieldSchema)>,
        record_count: usize,
        batch_count: usize,
    ) -> Self {
        let mut fields: Vec<_> = fields.into_iter().collect();
        fields.sort_by(|(path_a, a), (path_b, b)| {
            b.usage.total_cmp(&a.usage).then_with(|| path_a.cmp(path_b))
        });
        Self {
            fields,
            record_count,
            batch_count,
            render_types_as_text: false,
        }
    }

    /// Get the entry for a path
    pub fn get(&self, path: &str) -> Option<&FieldSchema> {
        self.fields
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, field)| field)
    }

    /// Check if a path is present
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Field paths in output order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(p, _)| p.as_str())
    }

    /// Iterate entries in output order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSchema)> {
        self.fields.iter().map(|(p, f)| (p.as_str(), f))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the schema has no entries
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Type name for a tag, honoring the rendering mode
    pub fn render_type(&self, tag: TypeTag) -> &'static str {
        if self.render_types_as_text {
            tag.label()
        } else {
            tag.name()
        }
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    /// Convert to pretty JSON string
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Serialized form of a field with its type tags rendered as names or labels
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderedField<'a> {
    #[serde(rename = "type")]
    field_type: &'static str,
    usage_count: usize,
    usage: f64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    types: BTreeMap<&'static str, &'a TypeStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_size: Option<usize>,
}

impl Serialize for InferredSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (path, field) in &self.fields {
            let rendered = RenderedField {
                field_type: self.render_type(field.field_type),
                usage_count: field.usage_count,
                usage: field.usage,
                types: field
                    .types
                    .iter()
                    .map(|(tag, stats)| (self.render_type(*tag), stats))
                    .collect(),
                min_size: field.min_size,
                max_size: field.max_size,
            };
            map.serialize_entry(path, &rendered)?;
        }
        map.end()
    }
}
