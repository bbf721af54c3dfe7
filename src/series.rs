//! Stateless conversions from mappings and lists into chart series.

use crate::models::{KeyedAgg, KeyedSeriesEntry, OptionItem, SeriesEntry};
use indexmap::IndexMap;

/// Buckets to `{ key, label, data }` entries, in mapping order.
pub fn agg_to_series(data: &KeyedAgg) -> Vec<KeyedSeriesEntry> {
    data.iter()
        .map(|(key, bucket)| KeyedSeriesEntry {
            key: key.clone(),
            label: bucket.label.clone(),
            data: bucket.count,
        })
        .collect()
}

/// Index-keyed values to entries labelled by `namer(index)`.
pub fn list_to_series<N>(input: &[f64], namer: N) -> Vec<SeriesEntry>
where
    N: Fn(usize) -> String,
{
    input
        .iter()
        .enumerate()
        .map(|(i, &data)| SeriesEntry {
            label: namer(i),
            data,
        })
        .collect()
}

/// Mapping to entries labelled by their key.
pub fn map_to_series(input: &IndexMap<String, f64>) -> Vec<SeriesEntry> {
    map_to_series_with(input, str::to_string)
}

/// Mapping to entries labelled by `namer(key)`.
pub fn map_to_series_with<N>(input: &IndexMap<String, f64>, namer: N) -> Vec<SeriesEntry>
where
    N: Fn(&str) -> String,
{
    input
        .iter()
        .map(|(key, &data)| SeriesEntry {
            label: namer(key),
            data,
        })
        .collect()
}

/// Selection list over the keys of `map`, sorted by key.
pub fn create_option_list<V>(map: &IndexMap<String, V>) -> Vec<OptionItem> {
    create_option_list_with(map, str::to_string)
}

/// Selection list over the keys of `map`, with display text from `namer`.
///
/// Sorted ascending by text; entries with equal text keep their map order.
pub fn create_option_list_with<V, N>(map: &IndexMap<String, V>, namer: N) -> Vec<OptionItem>
where
    N: Fn(&str) -> String,
{
    let mut list: Vec<OptionItem> = map
        .keys()
        .map(|key| OptionItem {
            value: key.clone(),
            text: namer(key),
        })
        .collect();
    // `sort_by` is stable
    list.sort_by(|a, b| a.text.cmp(&b.text));
    list
}

/// Fraction to percentage, rounded to two decimals: `0.33333` -> `33.33`.
pub fn to_percent(val: f64) -> f64 {
    (val * 10_000.0).round() / 100.0
}
