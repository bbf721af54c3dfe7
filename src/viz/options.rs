//! Chart options with an explicit, validated field set per chart type.
//!
//! Callers customize charts through typed override patches rather than
//! free-form nested objects. Overrides deserialize from JSON and reject
//! unknown fields, so a misspelled option fails loudly.

use serde::Deserialize;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum OptionsError {
    #[error("bar width must be in (0, 1], got {0}")]
    BarWidth(f64),

    #[error("axis bound must be finite, got {0}")]
    NonFiniteBound(f64),

    #[error("axis minimum {min} must be below maximum {max}")]
    EmptyRange { min: f64, max: f64 },
}

/// Horizontal placement of a bar relative to its tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarAlign {
    #[default]
    Center,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Settings shared by every chart type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridOptions {
    pub show_legend: bool,
    pub hoverable: bool,
    pub clickable: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            show_legend: true,
            hoverable: true,
            clickable: true,
        }
    }
}

/// Optional y-axis bounds. `None` means "fit the data".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AxisRange {
    fn validate(&self) -> Result<(), OptionsError> {
        for b in [self.min, self.max].into_iter().flatten() {
            if !b.is_finite() {
                return Err(OptionsError::NonFiniteBound(b));
            }
        }
        if let (Some(min), Some(max)) = (self.min, self.max)
            && min >= max
        {
            return Err(OptionsError::EmptyRange { min, max });
        }
        Ok(())
    }

    /// Resolve against the data extent.
    pub fn resolve(&self, data_min: f64, data_max: f64) -> (f64, f64) {
        let lo = self.min.unwrap_or(data_min.min(0.0));
        let mut hi = self.max.unwrap_or(data_max);
        if hi <= lo {
            hi = lo + 1.0;
        }
        (lo, hi)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarOptions {
    pub grid: GridOptions,
    pub align: BarAlign,
    /// Fraction of the tick spacing covered by a bar.
    pub bar_width: f64,
    pub fill: bool,
    pub line_width: u32,
    pub fill_color: Rgb,
    pub y_axis: AxisRange,
}

impl Default for BarOptions {
    fn default() -> Self {
        Self {
            grid: GridOptions::default(),
            align: BarAlign::Center,
            bar_width: 0.6,
            fill: true,
            line_width: 0,
            fill_color: Rgb(155, 200, 123),
            y_axis: AxisRange::default(),
        }
    }
}

/// Partial update for [`BarOptions`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BarOverrides {
    pub show_legend: Option<bool>,
    pub hoverable: Option<bool>,
    pub clickable: Option<bool>,
    pub align: Option<BarAlign>,
    pub bar_width: Option<f64>,
    pub fill: Option<bool>,
    pub line_width: Option<u32>,
    pub fill_color: Option<Rgb>,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
}

impl BarOptions {
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !(self.bar_width > 0.0 && self.bar_width <= 1.0) {
            return Err(OptionsError::BarWidth(self.bar_width));
        }
        self.y_axis.validate()
    }

    /// Apply `o` on top of these options and validate the result.
    pub fn with_overrides(&self, o: &BarOverrides) -> Result<Self, OptionsError> {
        let mut out = self.clone();
        if let Some(v) = o.show_legend {
            out.grid.show_legend = v;
        }
        if let Some(v) = o.hoverable {
            out.grid.hoverable = v;
        }
        if let Some(v) = o.clickable {
            out.grid.clickable = v;
        }
        if let Some(v) = o.align {
            out.align = v;
        }
        if let Some(v) = o.bar_width {
            out.bar_width = v;
        }
        if let Some(v) = o.fill {
            out.fill = v;
        }
        if let Some(v) = o.line_width {
            out.line_width = v;
        }
        if let Some(v) = o.fill_color {
            out.fill_color = v;
        }
        if o.y_min.is_some() {
            out.y_axis.min = o.y_min;
        }
        if o.y_max.is_some() {
            out.y_axis.max = o.y_max;
        }
        out.validate()?;
        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PieOptions {
    pub grid: GridOptions,
    /// Draw labels on the slices themselves (legend text is separate).
    pub show_slice_labels: bool,
}

/// Partial update for [`PieOptions`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PieOverrides {
    pub show_legend: Option<bool>,
    pub hoverable: Option<bool>,
    pub clickable: Option<bool>,
    pub show_slice_labels: Option<bool>,
}

impl PieOptions {
    pub fn with_overrides(&self, o: &PieOverrides) -> Self {
        let mut out = self.clone();
        if let Some(v) = o.show_legend {
            out.grid.show_legend = v;
        }
        if let Some(v) = o.hoverable {
            out.grid.hoverable = v;
        }
        if let Some(v) = o.clickable {
            out.grid.clickable = v;
        }
        if let Some(v) = o.show_slice_labels {
            out.show_slice_labels = v;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_defaults_are_valid() {
        let o = BarOptions::default();
        assert!(o.validate().is_ok());
        assert_eq!(o.bar_width, 0.6);
        assert!(o.grid.hoverable);
    }

    #[test]
    fn overrides_from_json() {
        let patch: BarOverrides =
            serde_json::from_str(r#"{"y_max": 100.0, "align": "left", "fill_color": [1, 2, 3]}"#)
                .unwrap();
        let o = BarOptions::default().with_overrides(&patch).unwrap();
        assert_eq!(o.y_axis.max, Some(100.0));
        assert_eq!(o.align, BarAlign::Left);
        assert_eq!(o.fill_color, Rgb(1, 2, 3));
        assert_eq!(o.bar_width, 0.6);
    }

    #[test]
    fn unknown_override_fields_are_rejected() {
        assert!(serde_json::from_str::<BarOverrides>(r#"{"yaxis": {"max": 1}}"#).is_err());
        assert!(serde_json::from_str::<PieOverrides>(r#"{"radius": 1}"#).is_err());
    }

    #[test]
    fn invalid_values_fail_validation() {
        let base = BarOptions::default();
        let wide = BarOverrides {
            bar_width: Some(1.5),
            ..Default::default()
        };
        assert_eq!(base.with_overrides(&wide), Err(OptionsError::BarWidth(1.5)));

        let inverted = BarOverrides {
            y_min: Some(5.0),
            y_max: Some(1.0),
            ..Default::default()
        };
        assert_eq!(
            base.with_overrides(&inverted),
            Err(OptionsError::EmptyRange { min: 5.0, max: 1.0 })
        );
    }

    #[test]
    fn axis_range_fits_data() {
        let r = AxisRange::default();
        assert_eq!(r.resolve(2.0, 10.0), (0.0, 10.0));
        assert_eq!(r.resolve(0.0, 0.0), (0.0, 1.0));
        let fixed = AxisRange {
            min: Some(-1.0),
            max: None,
        };
        assert_eq!(fixed.resolve(0.0, 4.0), (-1.0, 4.0));
    }

    #[test]
    fn pie_overrides() {
        let o = PieOptions::default().with_overrides(&PieOverrides {
            show_legend: Some(false),
            ..Default::default()
        });
        assert!(!o.grid.show_legend);
        assert!(!o.show_slice_labels);
    }
}
