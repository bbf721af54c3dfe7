//! Utility functions for visualization: colors, locale mapping, number formatting.

use num_format::{Locale, ToFormattedString};
use plotters::prelude::*;

/// Microsoft Office (2013+) chart series palette.
/// Order: Blue, Orange, Gray, Gold, Light Blue, Green, Dark Blue, Dark Orange, Dark Gray, Brownish Gold.
const OFFICE10: [RGBColor; 10] = [
    RGBColor(68, 114, 196),  // blue      (#4472C4)
    RGBColor(237, 125, 49),  // orange    (#ED7D31)
    RGBColor(165, 165, 165), // gray      (#A5A5A5)
    RGBColor(255, 192, 0),   // gold      (#FFC000)
    RGBColor(91, 155, 213),  // light blue(#5B9BD5)
    RGBColor(112, 173, 71),  // green     (#70AD47)
    RGBColor(38, 68, 120),   // dark blue (#264478)
    RGBColor(158, 72, 14),   // dark org. (#9E480E)
    RGBColor(99, 99, 99),    // dark gray (#636363)
    RGBColor(153, 115, 0),   // brownish  (#997300)
];

/// Get a slice color from the Office palette.
#[inline]
pub fn office_color(idx: usize) -> RGBColor {
    OFFICE10[idx % OFFICE10.len()]
}

/// Map a user-provided locale tag to a `num_format::Locale`.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> &'static Locale {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => &Locale::de,
        "fr" | "fr_fr" => &Locale::fr,
        "es" | "es_es" => &Locale::es,
        "it" | "it_it" => &Locale::it,
        "pt" | "pt_pt" | "pt_br" => &Locale::pt,
        "nl" | "nl_nl" => &Locale::nl,
        _ => &Locale::en, // default
    }
}

/// Whole-number count with locale thousands separators (`12,345`).
pub fn format_count(value: f64, locale: &Locale) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    (value.round() as i64).to_formatted_string(locale)
}

/// Percentage of `part` in `total`, rounded to `decimals`; `0.0` for a zero total.
pub fn share_percent(part: f64, total: f64, decimals: i32) -> f64 {
    if total == 0.0 || !total.is_finite() {
        return 0.0;
    }
    let scale = 10f64.powi(decimals);
    (part / total * 100.0 * scale).round() / scale
}
