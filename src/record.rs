//! Core data types shared by the parser and the aggregation engines.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Rank label used when the rank column is blank.
pub const UNRANKED: &str = "Unranked";

/// Location label used when the location column is blank.
pub const UNKNOWN_AREA: &str = "Unknown Area";

/// Score of an ordinary kill.
pub const NORMAL_SCORE: u32 = 1;

/// Score of a kill flagged with the weight marker.
pub const HEAVY_SCORE: u32 = 2;

/// One validated row of the KS feed.
///
/// Only [`RawRecord::new`] and the parser construct these, so `player` is
/// never empty and `score` is always [`NORMAL_SCORE`] or [`HEAVY_SCORE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawRecord {
    pub player: String,
    pub score: u32,
    pub timestamp: DateTime<Local>,
    pub rank_label: String,
    pub location_label: String,
    pub hunted_name: Option<String>,
    pub usual_time: Option<String>,
}

impl RawRecord {
    /// Builds a record, applying the default labels for blank rank/location
    /// cells. Returns `None` when the player name is blank.
    pub fn new(
        player: &str,
        heavy: bool,
        timestamp: DateTime<Local>,
        rank_label: &str,
        location_label: &str,
    ) -> Option<Self> {
        let player = player.trim();
        if player.is_empty() {
            return None;
        }

        Some(RawRecord {
            player: player.to_string(),
            score: if heavy { HEAVY_SCORE } else { NORMAL_SCORE },
            timestamp,
            rank_label: or_default(rank_label, UNRANKED),
            location_label: or_default(location_label, UNKNOWN_AREA),
            hunted_name: None,
            usual_time: None,
        })
    }

    /// Attaches the hunted-target columns. Blank values stay absent.
    pub fn with_target_info(mut self, hunted_name: &str, usual_time: &str) -> Self {
        self.hunted_name = non_blank(hunted_name);
        self.usual_time = non_blank(usual_time);
        self
    }

    pub fn is_heavy(&self) -> bool {
        self.score > NORMAL_SCORE
    }
}

fn or_default(value: &str, default: &str) -> String {
    non_blank(value).unwrap_or_else(|| default.to_string())
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Tabs of the dashboard. Only the four ranking frames feed the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeFrame {
    Overview,
    BlackList,
    Daily,
    Weekly,
    Monthly,
    AllTime,
}

impl TimeFrame {
    pub fn is_ranking(self) -> bool {
        matches!(
            self,
            TimeFrame::Daily | TimeFrame::Weekly | TimeFrame::Monthly | TimeFrame::AllTime
        )
    }
}

/// Movement marker shown next to a leaderboard entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    /// Reserved for comparison against a prior period; never produced yet.
    Down,
    Same,
}

/// One row of a leaderboard for a given time frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub name: String,
    pub total_score: u32,
    pub games_played: u32,
    pub average_score: f64,
    pub trend: Trend,
}

/// A label with the score or sighting count attributed to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub name: String,
    pub count: u32,
}

impl LabelCount {
    pub fn new(name: &str, count: u32) -> Self {
        Self {
            name: name.to_string(),
            count,
        }
    }
}
