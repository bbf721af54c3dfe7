//! Fetch collaborator for the dataset cache.
//!
//! The cache only talks to the [`Fetch`] trait: it starts a fetch for a key and
//! later drains finished [`Completion`]s. [`HttpFetcher`] is the production
//! implementation; it moves each request onto a worker thread so the owner of
//! the cache never blocks while requests are in flight.
//!
//! Locations starting with `http://` or `https://` are loaded with a blocking
//! `reqwest` client. Anything else is treated as a file path.
//!
//! ### Notes
//! - Some dataset publishers wrap the JSON document in a JSON string; such
//!   payloads are decoded a second time.
//! - Transient failures (5xx / network errors) are retried with a short
//!   backoff before the completion is reported as failed.
//! - A worker that panics still reports, with [`FetchError::Disconnected`],
//!   so [`Fetch::wait`] never blocks on a dead thread.

use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde_json::Value;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

/// Identifies one started fetch; echoed back in its [`Completion`].
pub type Ticket = u64;

/// A finished fetch for one dataset key.
#[derive(Debug)]
pub struct Completion {
    pub key: String,
    pub ticket: Ticket,
    pub result: Result<Value, FetchError>,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request failed with HTTP {0}")]
    Status(u16),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("fetch worker exited without a result")]
    Disconnected,
}

/// Starts dataset fetches and reports their completion later.
pub trait Fetch {
    /// Begin loading `location` on behalf of `key`. Must not block.
    ///
    /// The completion must carry the same `ticket`.
    fn start(&mut self, ticket: Ticket, key: &str, location: &str);

    /// Completions that finished since the last call. Must not block.
    fn poll(&mut self) -> Vec<Completion>;

    /// Block until the next completion; `None` when nothing is in flight.
    fn wait(&mut self) -> Option<Completion>;
}

/// Decode a dataset payload, unwrapping double-encoded JSON.
pub fn decode_payload(bytes: &[u8]) -> Result<Value, FetchError> {
    match serde_json::from_slice::<Value>(bytes)? {
        Value::String(inner) => Ok(serde_json::from_str(&inner)?),
        other => Ok(other),
    }
}

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Threaded fetcher backed by a blocking HTTP client and the filesystem.
pub struct HttpFetcher {
    http: HttpClient,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    in_flight: usize,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(5))
            .user_agent(concat!("telemetry-charts/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            http,
            tx,
            rx,
            in_flight: 0,
        })
    }

    /// Number of fetches started but not yet handed out.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn settle(&mut self, c: Completion) -> Completion {
        self.in_flight = self.in_flight.saturating_sub(1);
        c
    }
}

fn load(http: &HttpClient, location: &str) -> Result<Value, FetchError> {
    if !is_remote(location) {
        let bytes = std::fs::read(Path::new(location))?;
        return decode_payload(&bytes);
    }

    let mut last_err: Option<FetchError> = None;
    for backoff_ms in [100u64, 300, 700] {
        match http.get(location).send() {
            Ok(r) if r.status().is_success() => {
                let bytes = r.bytes()?;
                return decode_payload(&bytes);
            }
            Ok(r) if r.status().is_server_error() => {
                last_err = Some(FetchError::Status(r.status().as_u16()));
            }
            Ok(r) => return Err(FetchError::Status(r.status().as_u16())),
            Err(e) => last_err = Some(e.into()),
        }
        thread::sleep(Duration::from_millis(backoff_ms));
    }
    Err(last_err.unwrap_or(FetchError::Disconnected))
}

/// Sends the worker's completion when dropped, including during a panic.
struct Report {
    key: String,
    ticket: Ticket,
    tx: Sender<Completion>,
    result: Option<Result<Value, FetchError>>,
}

impl Drop for Report {
    fn drop(&mut self) {
        let result = self.result.take().unwrap_or(Err(FetchError::Disconnected));
        // Receiver gone means the session ended; nothing left to notify.
        let _ = self.tx.send(Completion {
            key: std::mem::take(&mut self.key),
            ticket: self.ticket,
            result,
        });
    }
}

impl Fetch for HttpFetcher {
    fn start(&mut self, ticket: Ticket, key: &str, location: &str) {
        let http = self.http.clone();
        let report = Report {
            key: key.to_string(),
            ticket,
            tx: self.tx.clone(),
            result: None,
        };
        let location = location.to_string();
        self.in_flight += 1;
        thread::spawn(move || {
            let mut report = report;
            report.result = Some(load(&http, &location));
        });
    }

    fn poll(&mut self) -> Vec<Completion> {
        let mut done = Vec::new();
        while let Ok(c) = self.rx.try_recv() {
            done.push(self.settle(c));
        }
        done
    }

    fn wait(&mut self) -> Option<Completion> {
        if self.in_flight == 0 {
            return None;
        }
        // `self.tx` keeps the channel open, so `recv` only returns once a worker reports.
        match self.rx.recv() {
            Ok(c) => Some(self.settle(c)),
            Err(_) => None,
        }
    }
}
