//! Public types and constants for the visualization module.

use num_format::Locale;

/// How bar values are printed on the y axis and in tooltips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueFormat {
    #[default]
    Plain,
    /// Values are already percentages; a `%` sign is appended.
    Percent,
    /// Whole-number counts with thousands separators.
    Count(&'static Locale),
}

impl ValueFormat {
    /// Axis tick text.
    pub fn tick(&self, v: f64) -> String {
        match self {
            ValueFormat::Plain => format!("{v}"),
            ValueFormat::Percent => format!("{v}%"),
            ValueFormat::Count(locale) => super::util::format_count(v, locale),
        }
    }

    /// Tooltip text, with two decimals.
    pub fn exact(&self, v: f64) -> String {
        match self {
            ValueFormat::Plain => format!("{v:.2}"),
            ValueFormat::Percent => format!("{v:.2}%"),
            ValueFormat::Count(locale) => super::util::format_count(v, locale),
        }
    }
}

/// Default canvas size in pixels.
pub const DEFAULT_SIZE: (u32, u32) = (800, 400);
