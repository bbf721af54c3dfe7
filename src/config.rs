use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use std::env;

/// Remote location of the published aggregate datasets.
pub const DEFAULT_REMOTE_PREFIX: &str =
    "https://analysis-output.telemetry.mozilla.org/gfx-telemetry/data/";

/// Local directory (or URL prefix) used for keys served next to the dashboard.
pub const DEFAULT_LOCAL_PREFIX: &str = "data/";

// Allow -, _, . unescaped in key segments (dataset file names)
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Where dataset keys are loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub remote_prefix: String,
    pub local_prefix: String,
    /// Load keys from `remote_prefix` unless listed in `local_keys`.
    pub use_remote: bool,
    /// Keys that are always served from `local_prefix`.
    pub local_keys: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            remote_prefix: DEFAULT_REMOTE_PREFIX.to_string(),
            local_prefix: DEFAULT_LOCAL_PREFIX.to_string(),
            use_remote: true,
            local_keys: vec!["snapshots.json".to_string()],
        }
    }
}

impl SourceConfig {
    /// Load configuration from environment variables (and `.env`, if present).
    ///
    /// Recognized variables: `TCHART_REMOTE_PREFIX`, `TCHART_LOCAL_PREFIX`,
    /// `TCHART_USE_REMOTE`, `TCHART_LOCAL_KEYS` (comma separated).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Same as [`SourceConfig::from_env`] with an explicit variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let use_remote = match lookup("TCHART_USE_REMOTE") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::Invalid {
                name: "TCHART_USE_REMOTE",
                value: raw,
            })?,
            None => defaults.use_remote,
        };

        let local_keys = lookup("TCHART_LOCAL_KEYS")
            .map(|raw| {
                raw.split(',')
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.local_keys);

        Ok(Self {
            remote_prefix: lookup("TCHART_REMOTE_PREFIX").unwrap_or(defaults.remote_prefix),
            local_prefix: lookup("TCHART_LOCAL_PREFIX").unwrap_or(defaults.local_prefix),
            use_remote,
            local_keys,
        })
    }

    /// Serve every key from `dir`.
    #[must_use]
    pub fn local_only(dir: impl Into<String>) -> Self {
        Self {
            local_prefix: dir.into(),
            use_remote: false,
            ..Self::default()
        }
    }

    /// Location (URL or path) for a dataset key.
    pub fn resolve(&self, key: &str) -> String {
        let remote = self.use_remote && !self.local_keys.iter().any(|k| k == key);
        if remote {
            let encoded = key
                .split('/')
                .map(|seg| percent_encoding::utf8_percent_encode(seg, SAFE).to_string())
                .collect::<Vec<_>>()
                .join("/");
            format!("{}{}", self.remote_prefix, encoded)
        } else {
            join_prefix(&self.local_prefix, key)
        }
    }
}

fn join_prefix(prefix: &str, key: &str) -> String {
    if prefix.is_empty() || prefix.ends_with('/') {
        format!("{prefix}{key}")
    } else {
        format!("{prefix}/{key}")
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
