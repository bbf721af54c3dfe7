//! Plotters adapter: draw bar and pie models to **SVG** or **PNG**.
//!
//! The output format follows the file extension (`.svg`, anything else is a
//! bitmap). Text uses the `ab_glyph` path, which does not discover system
//! fonts: call [`register_font_file`] once to get captions, axis labels and
//! legends. Without a registered font the charts are drawn without text.

use super::options::{BarAlign, BarOptions, PieOptions};
use super::util::office_color;
use super::{BarChart, PieChart};
use anyhow::{Context, Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::f64::consts::{FRAC_PI_2, TAU};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

static FONT_READY: AtomicBool = AtomicBool::new(false);

/// Register a TTF/OTF file as the "sans-serif" family used for all chart text.
pub fn register_font_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).with_context(|| format!("read font {}", path.display()))?;
    // Plotters keeps a reference for the rest of the process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    plotters::style::register_font("sans-serif", plotters::style::FontStyle::Normal, bytes)
        .map_err(|_| anyhow!("invalid font {}", path.display()))?;
    FONT_READY.store(true, Ordering::Release);
    Ok(())
}

fn fonts_ready() -> bool {
    FONT_READY.load(Ordering::Acquire)
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

/// Draw a bar chart to `out_path`.
pub fn render_bar<P: AsRef<Path>>(
    bar: &BarChart,
    opts: &BarOptions,
    title: Option<&str>,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    if bar.is_empty() {
        return Err(anyhow!("no data to plot"));
    }
    opts.validate()?;
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();

    if is_svg(out_path) {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_bar(root, bar, opts, title)
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_bar(root, bar, opts, title)
    }
}

/// Draw a pie chart to `out_path`.
pub fn render_pie<P: AsRef<Path>>(
    pie: &PieChart,
    opts: &PieOptions,
    title: Option<&str>,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    if !(pie.total() > 0.0) {
        return Err(anyhow!("no data to plot"));
    }
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();

    if is_svg(out_path) {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_pie(root, pie, opts, title)
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_pie(root, pie, opts, title)
    }
}

fn draw_bar<DB>(
    root: DrawingArea<DB, Shift>,
    bar: &BarChart,
    opts: &BarOptions,
    title: Option<&str>,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let text = fonts_ready();

    let values = bar.values();
    let data_min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let data_max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (y_lo, y_hi) = opts.y_axis.resolve(data_min, data_max * 1.05);
    let n = bar.len() as f64;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(20);
    if text {
        if let Some(t) = title {
            builder.caption(t, ("sans-serif", 20));
        }
        builder
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 40);
    }
    let mut chart = builder
        .build_cartesian_2d(-0.5f64..(n - 0.5), y_lo..y_hi)
        .map_err(|e| anyhow!("{:?}", e))?;

    if text {
        let labels = bar.labels();
        // Only integral positions carry a label
        let x_label_fmt = |x: &f64| {
            let i = x.round();
            if (x - i).abs() < 1e-6 && i >= 0.0 {
                labels.get(i as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        };
        let y_label_fmt = |y: &f64| bar.format.tick(*y);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(bar.len())
            .x_label_formatter(&x_label_fmt)
            .y_label_formatter(&y_label_fmt)
            .label_style(("sans-serif", 12))
            .draw()
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    let color = RGBColor(opts.fill_color.0, opts.fill_color.1, opts.fill_color.2);
    let style = if opts.fill {
        color.filled()
    } else {
        color.stroke_width(opts.line_width.max(1))
    };
    let width = opts.bar_width;
    let base = 0f64.clamp(y_lo, y_hi);

    chart
        .draw_series(bar.points().into_iter().map(|(i, v)| {
            let x = i as f64;
            let (x0, x1) = match opts.align {
                BarAlign::Center => (x - width / 2.0, x + width / 2.0),
                BarAlign::Left => (x, x + width),
            };
            Rectangle::new([(x0, base), (x1, v)], style.clone())
        }))
        .map_err(|e| anyhow!("{:?}", e))?;

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

/// Polygon approximating a pie wedge, starting and ending at `center`.
fn wedge(center: (i32, i32), radius: f64, start: f64, sweep: f64) -> Vec<(i32, i32)> {
    let steps = ((sweep / TAU) * 120.0).ceil().max(2.0) as usize;
    let mut pts = Vec::with_capacity(steps + 2);
    pts.push(center);
    for k in 0..=steps {
        let a = start + sweep * k as f64 / steps as f64;
        pts.push((
            center.0 + (radius * a.cos()).round() as i32,
            center.1 + (radius * a.sin()).round() as i32,
        ));
    }
    pts
}

fn draw_pie<DB>(
    root: DrawingArea<DB, Shift>,
    pie: &PieChart,
    opts: &PieOptions,
    title: Option<&str>,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let text = fonts_ready();

    let area = match title {
        Some(t) if text => root
            .titled(t, ("sans-serif", 20))
            .map_err(|e| anyhow!("{:?}", e))?,
        _ => root.clone(),
    };

    let show_legend = text && opts.grid.show_legend;
    let (w, _) = area.dim_in_pixel();
    let legend_w = if show_legend { w / 3 } else { 0 };
    let (pie_area, legend_area) = area.split_horizontally((w - legend_w) as i32);

    let (pw, ph) = pie_area.dim_in_pixel();
    let center = ((pw / 2) as i32, (ph / 2) as i32);
    let radius = (f64::from(pw.min(ph)) / 2.0 - 10.0).max(1.0);

    let total = pie.total();
    let mut start = -FRAC_PI_2;
    for (i, slice) in pie.slices().iter().enumerate() {
        if slice.data <= 0.0 {
            continue;
        }
        let sweep = slice.data / total * TAU;
        pie_area
            .draw(&Polygon::new(
                wedge(center, radius, start, sweep),
                office_color(i).filled(),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;

        if text && opts.show_slice_labels {
            let mid = start + sweep / 2.0;
            let at = (
                center.0 + (radius * 0.65 * mid.cos()) as i32,
                center.1 + (radius * 0.65 * mid.sin()) as i32,
            );
            pie_area
                .draw(&Text::new(
                    format!("{:.1}%", slice.percent),
                    at,
                    ("sans-serif", 12).into_font(),
                ))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
        start += sweep;
    }

    if show_legend {
        for i in 0..pie.slices().len() {
            let y = 20 + i as i32 * 20;
            legend_area
                .draw(&Rectangle::new([(0, y), (12, y + 12)], office_color(i).filled()))
                .map_err(|e| anyhow!("{:?}", e))?;
            legend_area
                .draw(&Text::new(
                    pie.legend_label(i).unwrap_or_default(),
                    (18, y),
                    ("sans-serif", 14).into_font(),
                ))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
