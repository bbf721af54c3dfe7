use crate::models::SeriesEntry;
use anyhow::Result;
use csv::WriterBuilder;
use std::borrow::Cow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Prefix text cells that spreadsheet tools would evaluate as formulas.
fn sanitize_cell(s: &str) -> Cow<'_, str> {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@') => Cow::Owned(format!("'{s}")),
        _ => Cow::Borrowed(s),
    }
}

/// Save a series as CSV with a `label,value` header.
pub fn save_series_csv<P: AsRef<Path>>(series: &[SeriesEntry], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("label", "value"))?;
    for e in series {
        wtr.serialize((sanitize_cell(&e.label), e.data))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save a series as a pretty JSON array of `{label, data}` objects.
pub fn save_series_json<P: AsRef<Path>>(series: &[SeriesEntry], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(series)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
