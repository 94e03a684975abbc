//! Source configuration, read from the environment (and `.env` via dotenvy).

use std::time::Duration;

use crate::fetch::Source;

/// Bundled snapshot tried first.
pub const DEFAULT_PRIMARY: &str = "dados.csv";

/// Published spreadsheet export used when the bundled snapshot is missing.
pub const DEFAULT_FALLBACK: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vQkJhKP1MWxMqBupRr3TmzbsuoZHF2ljzRG1lMCjZ--46ON-vVoPf4mgn5PqjmiWtOpphpmkPYFeYLK/pub?output=csv";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Feed locations and the timeout shared by the whole primary/fallback chain.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub primary: Source,
    pub fallback: Source,
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            primary: Source::parse(DEFAULT_PRIMARY),
            fallback: Source::parse(DEFAULT_FALLBACK),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl SourceConfig {
    /// Reads `KS_PRIMARY_SOURCE`, `KS_FALLBACK_SOURCE` and
    /// `KS_FETCH_TIMEOUT_SECS`, keeping defaults for unset or invalid values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(primary) = lookup("KS_PRIMARY_SOURCE").filter(|v| !v.trim().is_empty()) {
            config.primary = Source::parse(&primary);
        }
        if let Some(fallback) = lookup("KS_FALLBACK_SOURCE").filter(|v| !v.trim().is_empty()) {
            config.fallback = Source::parse(&fallback);
        }
        match lookup("KS_FETCH_TIMEOUT_SECS").map(|v| v.trim().parse::<u64>()) {
            Some(Ok(secs)) if secs > 0 => config.timeout = Duration::from_secs(secs),
            Some(_) => tracing::warn!("Ignoring invalid KS_FETCH_TIMEOUT_SECS"),
            None => {}
        }

        config
    }

    /// Applies command-line overrides on top of the environment values.
    pub fn with_overrides(
        mut self,
        primary: Option<&str>,
        fallback: Option<&str>,
        timeout_secs: Option<u64>,
    ) -> Self {
        if let Some(p) = primary {
            self.primary = Source::parse(p);
        }
        if let Some(f) = fallback {
            self.fallback = Source::parse(f);
        }
        if let Some(secs) = timeout_secs.filter(|s| *s > 0) {
            self.timeout = Duration::from_secs(secs);
        }
        self
    }
}
