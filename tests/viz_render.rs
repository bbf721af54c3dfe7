use std::fs;
use std::path::PathBuf;
use telemetry_charts::models::SeriesEntry;
use telemetry_charts::viz::render::{render_bar, render_pie};
use telemetry_charts::viz::{
    BarChart, BarOptions, BarOverrides, PieChart, PieOptions, ValueFormat,
};

fn sample_series() -> Vec<SeriesEntry> {
    [("Windows 10", 61.0), ("Windows 7", 30.0), ("Other", 9.0)]
        .into_iter()
        .map(|(label, data)| SeriesEntry {
            label: label.into(),
            data,
        })
        .collect()
}

fn write_and_check<F: Fn(&PathBuf)>(maker: F, name: &str) {
    let dir = tempfile::tempdir().unwrap();
    let path: PathBuf = dir.path().join(name);
    maker(&path);
    let meta = fs::metadata(&path).expect("file created");
    assert!(meta.len() > 0, "{name} has content");
}

#[test]
fn bar_charts_produce_files() {
    let bar = BarChart::new(&sample_series(), ValueFormat::Percent);
    let left = BarOptions::default()
        .with_overrides(&BarOverrides {
            align: Some(telemetry_charts::viz::options::BarAlign::Left),
            fill: Some(false),
            line_width: Some(2),
            y_max: Some(100.0),
            ..Default::default()
        })
        .unwrap();

    for (i, opts) in [BarOptions::default(), left].iter().enumerate() {
        write_and_check(
            |p| render_bar(&bar, opts, Some("Windows versions"), p, 640, 360).unwrap(),
            &format!("bar{i}.svg"),
        );
    }
    write_and_check(
        |p| render_bar(&bar, &BarOptions::default(), None, p, 320, 200).unwrap(),
        "bar.png",
    );
}

#[test]
fn pie_charts_produce_files() {
    let pie = PieChart::new(sample_series());
    write_and_check(
        |p| render_pie(&pie, &PieOptions::default(), Some("Share"), p, 480, 320).unwrap(),
        "pie.svg",
    );
    write_and_check(
        |p| render_pie(&pie, &PieOptions::default(), None, p, 240, 240).unwrap(),
        "pie.png",
    );
}

#[test]
fn empty_inputs_are_errors() {
    let dir = tempfile::tempdir().unwrap();
    let bar = BarChart::new(&[], ValueFormat::Plain);
    let e = render_bar(&bar, &BarOptions::default(), None, dir.path().join("e.svg"), 100, 100)
        .unwrap_err();
    assert!(e.to_string().contains("no data"));

    let pie = PieChart::new(vec![SeriesEntry {
        label: "none".into(),
        data: 0.0,
    }]);
    let e = render_pie(&pie, &PieOptions::default(), None, dir.path().join("e.svg"), 100, 100)
        .unwrap_err();
    assert!(e.to_string().contains("no data"));
}

#[test]
fn invalid_bar_options_are_rejected_at_render() {
    let dir = tempfile::tempdir().unwrap();
    let bar = BarChart::new(&sample_series(), ValueFormat::Plain);
    let opts = BarOptions {
        bar_width: 0.0,
        ..BarOptions::default()
    };
    let e = render_bar(&bar, &opts, None, dir.path().join("x.svg"), 100, 100).unwrap_err();
    assert!(e.to_string().contains("bar width"));
}
