//! Global statistics for the overview tab.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Timelike};
use serde::Serialize;

use crate::intel::{IntelReport, build_intel};
use crate::record::{LabelCount, RawRecord};
use crate::utility::{pct, tally};

const TREND_DAYS: usize = 14;
const TOP_RESPAWNS: usize = 5;
const TOP_DOMINATORS: usize = 5;
const RECENT_ACTIVITY: usize = 5;

/// Weekday names indexed from Sunday.
pub const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WeightDistribution {
    pub normal: u32,
    pub heavy: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Domination {
    pub name: String,
    pub count: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewSnapshot {
    pub total_kills: u32,
    pub total_records: usize,
    pub weight_distribution: WeightDistribution,
    pub hourly_distribution: [u32; 24],
    /// Indexed from Sunday, see [`WEEKDAYS`].
    pub weekly_distribution: [u32; 7],
    pub busiest_day: &'static str,
    /// Score per active local calendar day (not the UTC date), oldest first.
    pub date_buckets: Vec<DailyCount>,
    pub avg_kills_per_day: u32,
    /// The last 14 entries of `date_buckets` (active days only).
    pub daily_trend: Vec<DailyCount>,
    pub kills_by_rank: Vec<LabelCount>,
    pub top_respawns: Vec<LabelCount>,
    pub domination_stats: Vec<Domination>,
    /// Last records of the feed, most recent first.
    pub recent_activity: Vec<RawRecord>,
    pub hunted_intel: IntelReport,
}

/// Computes every overview statistic from the full record list.
pub fn summarize(records: &[RawRecord]) -> OverviewSnapshot {
    let mut total_kills = 0u32;
    let mut weights = WeightDistribution::default();
    let mut hourly = [0u32; 24];
    let mut weekly = [0u32; 7];
    let mut by_date: BTreeMap<NaiveDate, u32> = BTreeMap::new();

    for rec in records {
        total_kills += rec.score;
        if rec.is_heavy() {
            weights.heavy += 1;
        } else {
            weights.normal += 1;
        }

        hourly[rec.timestamp.hour() as usize] += rec.score;
        weekly[rec.timestamp.weekday().num_days_from_sunday() as usize] += rec.score;
        *by_date.entry(rec.timestamp.date_naive()).or_default() += rec.score;
    }

    let date_buckets: Vec<DailyCount> = by_date
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect();
    let active_days = date_buckets.len().max(1) as f64;
    let daily_trend = date_buckets[date_buckets.len().saturating_sub(TREND_DAYS)..].to_vec();

    let kills_by_rank = tally(records.iter().map(|r| (r.rank_label.as_str(), r.score)))
        .into_iter()
        .map(|(name, count)| LabelCount::new(name, count))
        .collect();

    let top_respawns = tally(records.iter().map(|r| (r.location_label.as_str(), r.score)))
        .into_iter()
        .take(TOP_RESPAWNS)
        .map(|(name, count)| LabelCount::new(name, count))
        .collect();

    let domination_stats = tally(records.iter().map(|r| (r.player.as_str(), r.score)))
        .into_iter()
        .take(TOP_DOMINATORS)
        .map(|(name, count)| Domination {
            name: name.to_string(),
            count,
            percentage: pct(count, total_kills),
        })
        .collect();

    let recent_activity = records.iter().rev().take(RECENT_ACTIVITY).cloned().collect();

    OverviewSnapshot {
        total_kills,
        total_records: records.len(),
        weight_distribution: weights,
        hourly_distribution: hourly,
        weekly_distribution: weekly,
        busiest_day: busiest_day(&weekly),
        avg_kills_per_day: (total_kills as f64 / active_days).round() as u32,
        date_buckets,
        daily_trend,
        kills_by_rank,
        top_respawns,
        domination_stats,
        recent_activity,
        hunted_intel: build_intel(records),
    }
}

/// Weekday with the highest total; the earliest weekday wins ties.
fn busiest_day(weekly: &[u32; 7]) -> &'static str {
    let best = weekly.iter().copied().max().unwrap_or(0);
    let idx = weekly.iter().position(|&n| n == best).unwrap_or(0);
    WEEKDAYS[idx]
}
