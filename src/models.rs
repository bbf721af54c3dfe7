use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Insertion-ordered mapping from category name to count.
pub type Counts = IndexMap<String, f64>;

/// Insertion-ordered mapping from group key to its bucket.
pub type KeyedAgg = IndexMap<String, Bucket>;

/// One aggregated category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub count: f64,
}

impl Bucket {
    pub fn new(label: impl Into<String>, count: f64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// A display label and its value, ready for a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesEntry {
    pub label: String,
    pub data: f64,
}

/// Series entry that remembers which aggregation key it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedSeriesEntry {
    pub key: String,
    pub label: String,
    pub data: f64,
}

impl From<KeyedSeriesEntry> for SeriesEntry {
    fn from(e: KeyedSeriesEntry) -> Self {
        Self {
            label: e.label,
            data: e.data,
        }
    }
}

/// Entry of a selection list (`<option value=..>text</option>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    pub value: String,
    pub text: String,
}

/// Dataset value did not have the shape the caller expected.
#[derive(Debug, thiserror::Error)]
pub enum ShapeError {
    #[error("no value at path `{0}`")]
    MissingPath(String),

    #[error("expected an object of numbers at `{path}`, found {found}")]
    NotAnObject { path: String, found: &'static str },

    #[error("entry `{key}` at `{path}` is not a number")]
    NotANumber { path: String, key: String },
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Walk a dotted path (`"devices.amd"`) into a JSON value.
/// An empty path returns the value itself.
pub fn pluck<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|seg| !seg.is_empty())
        .try_fold(value, |cur, seg| match cur {
            Value::Object(map) => map.get(seg),
            Value::Array(items) => seg.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

/// Convert the object at `path` into [`Counts`], keeping document order.
pub fn counts_from_value(value: &Value, path: &str) -> Result<Counts, ShapeError> {
    let target = pluck(value, path).ok_or_else(|| ShapeError::MissingPath(path.to_string()))?;
    let map = target.as_object().ok_or_else(|| ShapeError::NotAnObject {
        path: path.to_string(),
        found: kind_of(target),
    })?;
    map.iter()
        .map(|(k, v)| {
            v.as_f64()
                .map(|n| (k.clone(), n))
                .ok_or_else(|| ShapeError::NotANumber {
                    path: path.to_string(),
                    key: k.clone(),
                })
        })
        .collect()
}

/// Convert the array at `path` into a list of numbers.
pub fn values_from_value(value: &Value, path: &str) -> Result<Vec<f64>, ShapeError> {
    let target = pluck(value, path).ok_or_else(|| ShapeError::MissingPath(path.to_string()))?;
    let items = target.as_array().ok_or_else(|| ShapeError::NotAnObject {
        path: path.to_string(),
        found: kind_of(target),
    })?;
    items
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_f64().ok_or_else(|| ShapeError::NotANumber {
                path: path.to_string(),
                key: i.to_string(),
            })
        })
        .collect()
}
