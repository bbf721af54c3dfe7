//! Display models for bar, pie and table views.
//!
//! The models hold everything a surface needs besides pixels: ordering,
//! tick labels, percentages, legend and tooltip text. [`render`] draws them
//! with plotters; any other surface can consume them directly.
//!
//! - Pie slices are sorted by size, largest first, and carry their share of
//!   the total with one decimal.
//! - Table rows are named through a [`NameLookup`], sorted by count, and carry
//!   their share with two decimals.
//! - A zero total yields `0.0%` everywhere rather than `NaN`.

pub mod hover;
pub mod options;
pub mod render;
pub mod types;
pub mod util;

pub use hover::{HoverChange, HoverTracker};
pub use options::{BarOptions, BarOverrides, OptionsError, PieOptions, PieOverrides};
pub use types::{DEFAULT_SIZE, ValueFormat};

use crate::models::{Counts, SeriesEntry};
use crate::names::NameLookup;
use std::cmp::Ordering;
use std::fmt;
use util::share_percent;

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// Bars in label order; x positions are the label indices.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    labels: Vec<String>,
    values: Vec<f64>,
    pub format: ValueFormat,
}

impl BarChart {
    pub fn new(entries: &[SeriesEntry], format: ValueFormat) -> Self {
        Self {
            labels: entries.iter().map(|e| e.label.clone()).collect(),
            values: entries.iter().map(|e| e.data).collect(),
            format,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// `(index, value)` points.
    pub fn points(&self) -> Vec<(usize, f64)> {
        self.values.iter().copied().enumerate().collect()
    }

    /// `(index, label)` x-axis ticks.
    pub fn ticks(&self) -> Vec<(usize, &str)> {
        self.labels.iter().map(String::as_str).enumerate().collect()
    }

    /// `"label - value"` for the bar at `index`.
    pub fn tooltip(&self, index: usize) -> Option<String> {
        let label = self.labels.get(index)?;
        let value = self.values.get(index)?;
        Some(format!("{label} - {}", self.format.exact(*value)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub data: f64,
    /// Share of the total, one decimal.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    slices: Vec<PieSlice>,
    total: f64,
}

impl PieChart {
    pub fn new(mut entries: Vec<SeriesEntry>) -> Self {
        entries.sort_by(|a, b| descending(a.data, b.data));
        let total: f64 = entries.iter().map(|e| e.data).sum();
        let slices = entries
            .into_iter()
            .map(|e| PieSlice {
                percent: share_percent(e.data, total, 1),
                label: e.label,
                data: e.data,
            })
            .collect();
        Self { slices, total }
    }

    pub fn slices(&self) -> &[PieSlice] {
        &self.slices
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// `"label - 12.3%"`.
    pub fn legend_label(&self, index: usize) -> Option<String> {
        let s = self.slices.get(index)?;
        Some(format!("{} - {:.1}%", s.label, s.percent))
    }

    /// `"label - 12.3% (N sessions)"`.
    pub fn tooltip(&self, index: usize) -> Option<String> {
        let s = self.slices.get(index)?;
        Some(format!("{} - {:.1}% ({} sessions)", s.label, s.percent, s.data))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRow {
    pub name: String,
    pub count: f64,
    /// Share of the total, two decimals.
    pub percent: f64,
}

impl fmt::Display for DeviceRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {:.2}%  ({})", self.name, self.percent, self.count)
    }
}

/// Per-device table, most common first.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceTable {
    rows: Vec<DeviceRow>,
}

impl DeviceTable {
    pub fn new<N: NameLookup + ?Sized>(devices: &Counts, names: &N) -> Self {
        let total: f64 = devices.values().sum();
        let mut rows: Vec<DeviceRow> = devices
            .iter()
            .map(|(raw, &count)| DeviceRow {
                name: names.device_name(raw),
                count,
                percent: share_percent(count, total, 2),
            })
            .collect();
        rows.sort_by(|a, b| descending(a.count, b.count));
        Self { rows }
    }

    pub fn rows(&self) -> &[DeviceRow] {
        &self.rows
    }
}

impl fmt::Display for DeviceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::DeviceNames;

    fn entries(items: &[(&str, f64)]) -> Vec<SeriesEntry> {
        items
            .iter()
            .map(|(l, d)| SeriesEntry {
                label: l.to_string(),
                data: *d,
            })
            .collect()
    }

    #[test]
    fn bar_ticks_and_tooltips() {
        let bar = BarChart::new(&entries(&[("d3d9", 12.5), ("d3d11", 80.0)]), ValueFormat::Percent);
        assert_eq!(bar.ticks(), vec![(0, "d3d9"), (1, "d3d11")]);
        assert_eq!(bar.points(), vec![(0, 12.5), (1, 80.0)]);
        assert_eq!(bar.tooltip(1).unwrap(), "d3d11 - 80.00%");
        assert!(bar.tooltip(2).is_none());
    }

    #[test]
    fn pie_sorts_descending_with_one_decimal() {
        let pie = PieChart::new(entries(&[("a", 1.0), ("b", 2.0), ("c", 0.0)]));
        let labels: Vec<&str> = pie.slices().iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["b", "a", "c"]);
        assert_eq!(pie.legend_label(0).unwrap(), "b - 66.7%");
        assert_eq!(pie.tooltip(1).unwrap(), "a - 33.3% (1 sessions)");
        assert_eq!(pie.total(), 3.0);
    }

    #[test]
    fn pie_with_zero_total_has_no_nan() {
        let pie = PieChart::new(entries(&[("a", 0.0), ("b", 0.0)]));
        assert!(pie.slices().iter().all(|s| s.percent == 0.0));
        assert_eq!(pie.legend_label(0).unwrap(), "a - 0.0%");
    }

    #[test]
    fn table_names_and_sorts_rows() {
        let mut devices = Counts::new();
        devices.insert("0x8086/0x0042".into(), 1.0);
        devices.insert("0x10de/0x0a20".into(), 3.0);
        let names = DeviceNames::new()
            .with_device("0x10de/0x0a20", "GeForce GT 220")
            .with_vendor("0x8086", "Intel");
        let table = DeviceTable::new(&devices, &names);
        assert_eq!(table.rows()[0].name, "GeForce GT 220");
        assert_eq!(table.rows()[0].percent, 75.0);
        assert_eq!(table.rows()[1].name, "Intel 0x0042");
        assert_eq!(
            table.to_string(),
            "GeForce GT 220  75.00%  (3)\nIntel 0x0042  25.00%  (1)\n"
        );
    }
}
