use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use telemetry_charts::models::{self, SeriesEntry};
use telemetry_charts::names::{DeviceNames, NameLookup, RawNames};
use telemetry_charts::sample::SampleInfo;
use telemetry_charts::viz::render::{self, register_font_file};
use telemetry_charts::viz::util::map_locale;
use telemetry_charts::viz::{
    BarChart, BarOptions, BarOverrides, DEFAULT_SIZE, DeviceTable, PieChart, PieOptions,
    PieOverrides, ValueFormat,
};
use telemetry_charts::{DataCache, HttpFetcher, SourceConfig};
use telemetry_charts::{aggregate, series, storage};

#[derive(Parser, Debug)]
#[command(
    name = "tchart",
    version,
    about = "Fold, shape and chart telemetry aggregate datasets"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reduce a counts object to top categories + other (and optionally save or plot it).
    Series(SeriesArgs),
    /// Per-device share table, optionally grouped by vendor.
    Table(TableArgs),
    /// Describe the session sample behind a dataset.
    Info(InfoArgs),
    /// List the keys of an object as a sorted selection list.
    Keys(KeysArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Kind {
    Bar,
    Pie,
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Dataset key (e.g. windows-features.json)
    key: String,
    /// Dotted path to the object inside the dataset (e.g. devices.d3d11)
    #[arg(short, long, default_value = "")]
    path: String,
    /// Load datasets from this directory instead of the configured source.
    #[arg(long)]
    local_dir: Option<String>,
}

#[derive(Args, Debug)]
struct SeriesArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Fold categories whose share is below this fraction (e.g. 0.02).
    #[arg(short, long, default_value_t = 0.0)]
    threshold: f64,
    /// Name of the catch-all category.
    #[arg(long, default_value = "Other")]
    other: String,
    /// Prefix for every label (e.g. "Firefox").
    #[arg(long)]
    prefix: Option<String>,
    /// Values are fractions; print and plot them as percentages.
    #[arg(long, default_value_t = false)]
    percent: bool,
    /// Save results to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    #[command(flatten)]
    chart: PlotArgs,
}

#[derive(Args, Debug)]
struct PlotArgs {
    /// Create a chart at the given path (.svg or .png).
    #[arg(long)]
    plot: Option<PathBuf>,
    /// Chart kind.
    #[arg(long, value_enum, default_value_t = Kind::Bar)]
    kind: Kind,
    /// Chart options as JSON (e.g. '{"bar_width": 0.8}').
    #[arg(long)]
    options: Option<String>,
    /// Chart title.
    #[arg(long)]
    title: Option<String>,
    /// TTF/OTF font used for chart text; charts have no text without one.
    #[arg(long)]
    font: Option<PathBuf>,
    /// Width of the plot in pixels.
    #[arg(long, default_value_t = DEFAULT_SIZE.0)]
    width: u32,
    /// Height of the plot in pixels.
    #[arg(long, default_value_t = DEFAULT_SIZE.1)]
    height: u32,
}

#[derive(Args, Debug)]
struct TableArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// JSON name table: {"devices": {..}, "vendors": {..}}
    #[arg(long)]
    names: Option<PathBuf>,
    /// Group devices by vendor before printing.
    #[arg(long, default_value_t = false)]
    by_vendor: bool,
    /// With --by-vendor: fold vendors whose share is below this fraction.
    #[arg(short, long, default_value_t = 0.0)]
    threshold: f64,
}

#[derive(Args, Debug)]
struct InfoArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Product name used to label versions.
    #[arg(long, default_value = "Firefox")]
    product: String,
    /// Locale for numbers (en, de, fr, ...).
    #[arg(long, default_value = "en")]
    locale: String,
}

#[derive(Args, Debug)]
struct KeysArgs {
    #[command(flatten)]
    source: SourceArgs,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Series(args) => cmd_series(args),
        Command::Table(args) => cmd_table(args),
        Command::Info(args) => cmd_info(args),
        Command::Keys(args) => cmd_keys(args),
    }
}

/// Fetch one dataset through a fresh cache and wait for it.
fn load_dataset(src: &SourceArgs) -> Result<Rc<Value>> {
    let config = match &src.local_dir {
        Some(dir) => SourceConfig::local_only(dir.clone()),
        None => SourceConfig::from_env()?,
    };
    let mut cache = DataCache::new(config, HttpFetcher::new()?);

    let slot = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&slot);
    cache.ensure_data(&src.key, move |v| *sink.borrow_mut() = Some(v));
    cache.run_until_idle();

    let loaded = slot.borrow_mut().take();
    loaded.ok_or_else(|| anyhow!("dataset {} could not be loaded", src.key))
}

fn cmd_series(args: SeriesArgs) -> Result<()> {
    let data = load_dataset(&args.source)?;
    let counts = models::counts_from_value(&data, &args.source.path)?;
    let reduced = aggregate::reduce(&counts, &args.other, args.threshold);

    let mut entries = match &args.prefix {
        Some(p) => series::map_to_series_with(&reduced, |k| {
            if k == args.other {
                k.to_string()
            } else {
                format!("{p} {k}")
            }
        }),
        None => series::map_to_series(&reduced),
    };
    if args.percent {
        for e in &mut entries {
            e.data = series::to_percent(e.data);
        }
    }

    for e in &entries {
        let suffix = if args.percent { "%" } else { "" };
        println!("{}\t{}{}", e.label, e.data, suffix);
    }

    if let Some(path) = args.out.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_series_csv(&entries, path)?,
            "json" => storage::save_series_json(&entries, path)?,
            other => bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} rows to {}", entries.len(), path.display());
    }

    let format = if args.percent {
        ValueFormat::Percent
    } else {
        ValueFormat::Plain
    };
    plot(&args.chart, entries, format)
}

fn plot(args: &PlotArgs, entries: Vec<SeriesEntry>, format: ValueFormat) -> Result<()> {
    let Some(path) = args.plot.as_ref() else {
        return Ok(());
    };
    if let Some(font) = &args.font {
        register_font_file(font)?;
    }
    let title = args.title.as_deref();

    match args.kind {
        Kind::Bar => {
            let overrides: BarOverrides = match &args.options {
                Some(raw) => serde_json::from_str(raw).context("parse --options")?,
                None => BarOverrides::default(),
            };
            let opts = BarOptions::default().with_overrides(&overrides)?;
            let bar = BarChart::new(&entries, format);
            render::render_bar(&bar, &opts, title, path, args.width, args.height)?;
        }
        Kind::Pie => {
            let overrides: PieOverrides = match &args.options {
                Some(raw) => serde_json::from_str(raw).context("parse --options")?,
                None => PieOverrides::default(),
            };
            let opts = PieOptions::default().with_overrides(&overrides);
            let pie = PieChart::new(entries);
            render::render_pie(&pie, &opts, title, path, args.width, args.height)?;
        }
    }
    eprintln!("Wrote plot to {}", path.display());
    Ok(())
}

fn cmd_table(args: TableArgs) -> Result<()> {
    let data = load_dataset(&args.source)?;
    let devices = models::counts_from_value(&data, &args.source.path)?;
    let names = match &args.names {
        Some(p) => Some(DeviceNames::from_json_file(p)?),
        None => None,
    };
    let lookup: &dyn NameLookup = match &names {
        Some(n) => n,
        None => &RawNames,
    };

    if !args.by_vendor {
        print!("{}", DeviceTable::new(&devices, lookup));
        return Ok(());
    }

    let by_vendor = aggregate::map_to_keyed_agg(
        &devices,
        |raw| raw.split('/').next().unwrap_or(raw).to_string(),
        |_, vendor| match &names {
            Some(n) => n.vendor_name(vendor).to_string(),
            None => vendor.to_string(),
        },
    );
    let reduced = aggregate::reduce_agg(&by_vendor, args.threshold, "other", "Other");
    let total: f64 = reduced.values().map(|b| b.count).sum();
    for e in series::agg_to_series(&reduced) {
        let share = if total > 0.0 { e.data / total } else { 0.0 };
        println!("{}\t{}%\t({})", e.label, series::to_percent(share), e.data);
    }
    Ok(())
}

fn cmd_info(args: InfoArgs) -> Result<()> {
    let data = load_dataset(&args.source)?;
    let target = models::pluck(&data, &args.source.path)
        .ok_or_else(|| anyhow!("no value at path `{}`", args.source.path))?;
    let info = SampleInfo::from_dataset(target).context("read sessions block")?;
    let locale = map_locale(&args.locale);

    println!("Size: {}", info.size_text(locale));
    println!("Source: {}", info.source_text());
    println!("Sample Makeup:");
    for slice in PieChart::new(info.share_series(&args.product)).slices() {
        println!("  {}\t{:.1}%", slice.label, slice.percent);
    }
    Ok(())
}

fn cmd_keys(args: KeysArgs) -> Result<()> {
    let data = load_dataset(&args.source)?;
    let target = models::pluck(&data, &args.source.path)
        .ok_or_else(|| anyhow!("no value at path `{}`", args.source.path))?;
    let Value::Object(map) = target else {
        bail!("value at `{}` is not an object", args.source.path);
    };
    let keys: indexmap::IndexMap<String, ()> = map.keys().map(|k| (k.clone(), ())).collect();
    for item in series::create_option_list(&keys) {
        println!("{}", item.value);
    }
    Ok(())
}
