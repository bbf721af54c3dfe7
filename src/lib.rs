//! telemetry_charts
//!
//! Shape telemetry aggregate datasets into chart series. Pairs with the
//! `tchart` CLI.
//!
//! ### Features
//! - Per-session dataset cache that fetches each key once and queues callers
//! - Threshold folding of long-tail categories into an "other" bucket
//! - Series builders for bar, pie and selection-list views
//! - Pie/bar/table display models, rendered to SVG/PNG through plotters
//!
//! ### Example
//! ```no_run
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use telemetry_charts::{DataCache, HttpFetcher, SourceConfig};
//! use telemetry_charts::{aggregate, models, series};
//!
//! let mut cache = DataCache::new(SourceConfig::from_env()?, HttpFetcher::new()?);
//! let slot = Rc::new(RefCell::new(None));
//! let sink = Rc::clone(&slot);
//! cache.ensure_data("windows-features.json", move |v| *sink.borrow_mut() = Some(v));
//! cache.run_until_idle();
//!
//! if let Some(data) = slot.borrow().as_ref() {
//!     let counts = models::counts_from_value(data, "d3d11")?;
//!     let reduced = aggregate::reduce(&counts, "Other", 0.02);
//!     for entry in series::map_to_series(&reduced) {
//!         println!("{} {}", entry.label, entry.data);
//!     }
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod aggregate;
pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod names;
pub mod sample;
pub mod series;
pub mod storage;
pub mod viz;

pub use api::{Completion, Fetch, FetchError, HttpFetcher, Ticket};
pub use cache::{Availability, DataCache};
pub use config::SourceConfig;
pub use models::{Bucket, Counts, KeyedAgg, SeriesEntry};
