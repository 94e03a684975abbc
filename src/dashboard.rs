//! Application state for one dashboard session.
//!
//! Holds the record snapshot from the last successful refresh and derives
//! the view for whichever tab is selected. Nothing is cached between
//! refreshes apart from the snapshot and its overview.

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::SourceConfig;
use crate::fetch::{HttpClient, fetch_csv};
use crate::intel::IntelReport;
use crate::leaderboard::aggregate_at;
use crate::overview::{OverviewSnapshot, summarize};
use crate::parser::parse_at;
use crate::record::{RankedEntry, RawRecord, TimeFrame};

/// Message shown whenever a refresh yields no data.
pub const NO_DATA_MESSAGE: &str =
    "Could not load the KS feed. Check the spreadsheet connection and retry.";

/// Result of a refresh. `Empty` and `Unreachable` look the same to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    /// A source answered but held no valid rows.
    Empty,
    /// No source could be read.
    Unreachable,
}

impl LoadOutcome {
    pub fn is_loaded(self) -> bool {
        matches!(self, LoadOutcome::Loaded(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", content = "data", rename_all = "snake_case")]
pub enum View {
    Overview(OverviewSnapshot),
    BlackList(IntelReport),
    Ranking(Vec<RankedEntry>),
}

#[derive(Debug, Default)]
pub struct Dashboard {
    records: Vec<RawRecord>,
    overview: Option<OverviewSnapshot>,
    refreshed_at: Option<DateTime<Local>>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-runs the whole pipeline. A failed refresh keeps the previous
    /// snapshot.
    pub async fn refresh<C: HttpClient>(&mut self, client: &C, config: &SourceConfig) -> LoadOutcome {
        match fetch_csv(client, config).await {
            Ok(text) => self.load_text(&text, Local::now()),
            Err(e) => {
                warn!(error = %e, "Refresh failed, keeping previous snapshot");
                LoadOutcome::Unreachable
            }
        }
    }

    /// Replaces the snapshot with the records parsed from `text`.
    pub fn load_text(&mut self, text: &str, now: DateTime<Local>) -> LoadOutcome {
        let records = parse_at(text, now);
        if records.is_empty() {
            warn!("Feed contained no valid rows");
            return LoadOutcome::Empty;
        }

        info!(records = records.len(), "Snapshot refreshed");
        self.overview = Some(summarize(&records));
        self.records = records;
        self.refreshed_at = Some(now);
        LoadOutcome::Loaded(self.records.len())
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Local>> {
        self.refreshed_at
    }

    /// Derives the view for `frame`; `None` until a refresh succeeds.
    pub fn view(&self, frame: TimeFrame, now: DateTime<Local>) -> Option<View> {
        let overview = self.overview.as_ref()?;
        let view = match frame {
            frame if frame.is_ranking() => View::Ranking(aggregate_at(&self.records, frame, now)),
            TimeFrame::BlackList => View::BlackList(overview.hunted_intel.clone()),
            _ => View::Overview(overview.clone()),
        };
        Some(view)
    }
}
