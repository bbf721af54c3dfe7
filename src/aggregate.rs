//! Threshold reductions: fold low-share categories into a catch-all bucket.
//!
//! Every reduction here conserves the total: the values of the output sum to
//! the values of the input.
//!
//! Shares are `value / total`. When the total is zero (empty or all-zero
//! input) or not finite, every share is taken to be `0.0`, so a positive
//! threshold folds everything and a non-positive one folds nothing.

use crate::models::{Bucket, Counts, KeyedAgg};

fn share_fn(total: f64) -> impl Fn(f64) -> f64 {
    let usable = total.is_finite() && total != 0.0;
    move |value| if usable { value / total } else { 0.0 }
}

/// Fold every entry whose share is below `threshold` into `combine_key`.
///
/// A share exactly at the threshold is kept. An existing `combine_key` entry
/// is always preserved and absorbs the folded values.
///
/// ```
/// # use telemetry_charts::{aggregate, models::Counts};
/// let counts: Counts = [("a", 10.0), ("b", 5.0), ("c", 85.0)]
///     .into_iter()
///     .map(|(k, v)| (k.to_string(), v))
///     .collect();
/// let out = aggregate::reduce(&counts, "other", 0.1);
/// assert_eq!(out["a"], 10.0);
/// assert_eq!(out["other"], 5.0);
/// assert!(!out.contains_key("b"));
/// ```
pub fn reduce(data: &Counts, combine_key: &str, threshold: f64) -> Counts {
    reduce_where(data, combine_key, threshold, |_| true)
}

/// Like [`reduce`], but only keys accepted by `keep` may stay separate;
/// rejected keys are folded regardless of their share.
pub fn reduce_where<P>(data: &Counts, combine_key: &str, threshold: f64, keep: P) -> Counts
where
    P: Fn(&str) -> bool,
{
    let share = share_fn(data.values().sum());

    let mut out = Counts::with_capacity(data.len());
    if let Some(&v) = data.get(combine_key) {
        out.insert(combine_key.to_string(), v);
    }

    for (key, &value) in data {
        if key == combine_key {
            continue;
        }
        if keep(key) && (threshold <= 0.0 || share(value) >= threshold) {
            out.insert(key.clone(), value);
        } else {
            *out.entry(combine_key.to_string()).or_insert(0.0) += value;
        }
    }
    out
}

/// Group raw keys by `key_fn`, summing counts per group.
///
/// The label of a group comes from `label_fn(raw_key, group_key)` on the
/// first raw key that lands in it; later merges keep that label.
pub fn map_to_keyed_agg<K, L>(data: &Counts, key_fn: K, label_fn: L) -> KeyedAgg
where
    K: Fn(&str) -> String,
    L: Fn(&str, &str) -> String,
{
    let mut out = KeyedAgg::new();
    for (key, &count) in data {
        let group = key_fn(key);
        match out.get_mut(&group) {
            Some(bucket) => bucket.count += count,
            None => {
                let label = label_fn(key, &group);
                out.insert(group, Bucket { label, count });
            }
        }
    }
    out
}

/// Fold every bucket whose share is strictly below `threshold` into the
/// `combine_key` bucket, creating it with `combine_label` when absent.
///
/// Buckets at or above the threshold pass through unchanged. A bucket that
/// already sits under `combine_key` absorbs the folded counts and keeps its
/// own label.
pub fn reduce_agg(
    data: &KeyedAgg,
    threshold: f64,
    combine_key: &str,
    combine_label: &str,
) -> KeyedAgg {
    let share = share_fn(data.values().map(|b| b.count).sum());

    let mut out = KeyedAgg::with_capacity(data.len());
    for (key, bucket) in data {
        let is_combine = key == combine_key;
        let folded = !is_combine && threshold > 0.0 && share(bucket.count) < threshold;
        if !folded && !is_combine {
            out.insert(key.clone(), bucket.clone());
            continue;
        }

        match out.get_mut(combine_key) {
            Some(acc) => {
                acc.count += bucket.count;
                if is_combine {
                    acc.label = bucket.label.clone();
                }
            }
            None => {
                let label = if is_combine {
                    bucket.label.clone()
                } else {
                    combine_label.to_string()
                };
                out.insert(
                    combine_key.to_string(),
                    Bucket {
                        label,
                        count: bucket.count,
                    },
                );
            }
        }
    }
    out
}
