//! Behavioural profiles of hunted targets.
//!
//! Targets come from the supplementary name/usual-time columns. The feed is
//! expected to hold only recent sightings, so no date cutoff is applied here.

use std::collections::HashMap;

use chrono::{DateTime, Local, TimeDelta};
use serde::Serialize;

use crate::record::{LabelCount, RawRecord};
use crate::utility::tally;

const TOP_LOCATIONS: usize = 3;

/// Targets not seen for longer than this are shown as inactive.
pub const INACTIVE_AFTER_DAYS: i64 = 7;

/// Peak-hour label for targets whose usual time never parses.
pub const UNKNOWN_HOUR: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntelTarget {
    pub name: String,
    pub count: u32,
    pub peak_hour: String,
    pub last_seen: DateTime<Local>,
    pub top_locations: Vec<LabelCount>,
}

impl IntelTarget {
    /// Whole days elapsed since the last sighting.
    pub fn days_since_seen(&self, now: DateTime<Local>) -> i64 {
        (now - self.last_seen).num_days()
    }

    pub fn is_inactive(&self, now: DateTime<Local>) -> bool {
        now - self.last_seen > TimeDelta::days(INACTIVE_AFTER_DAYS)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct IntelReport {
    /// Sightings per hour of day across all targets.
    pub time_distribution: [u32; 24],
    /// Sorted by sighting count, most sighted first.
    pub targets: Vec<IntelTarget>,
}

struct Sightings<'a> {
    name: &'a str,
    count: u32,
    hours: [u32; 24],
    last_seen: DateTime<Local>,
    locations: Vec<&'a str>,
}

/// Builds target profiles from every record carrying a hunted-target name.
pub fn build_intel(records: &[RawRecord]) -> IntelReport {
    let mut report = IntelReport::default();
    let mut targets: Vec<Sightings> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for rec in records {
        let Some(name) = rec.hunted_name.as_deref() else {
            continue;
        };

        let slot = *index.entry(name).or_insert_with(|| {
            targets.push(Sightings {
                name,
                count: 0,
                hours: [0; 24],
                last_seen: rec.timestamp,
                locations: Vec::new(),
            });
            targets.len() - 1
        });

        let target = &mut targets[slot];
        target.count += 1;
        target.last_seen = target.last_seen.max(rec.timestamp);
        target.locations.push(rec.location_label.as_str());

        if let Some(hour) = rec.usual_time.as_deref().and_then(parse_hour) {
            target.hours[hour] += 1;
            report.time_distribution[hour] += 1;
        }
    }

    report.targets = targets
        .into_iter()
        .map(|t| IntelTarget {
            name: t.name.to_string(),
            count: t.count,
            peak_hour: peak_hour_label(&t.hours),
            last_seen: t.last_seen,
            top_locations: tally(t.locations.into_iter().map(|l| (l, 1)))
                .into_iter()
                .take(TOP_LOCATIONS)
                .map(|(name, count)| LabelCount::new(name, count))
                .collect(),
        })
        .collect();
    report.targets.sort_by(|a, b| b.count.cmp(&a.count));

    report
}

/// Reads the hour from a usual-time cell such as `21:30`, `21h` or `9`.
pub fn parse_hour(usual_time: &str) -> Option<usize> {
    let digits: String = usual_time
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() || digits.len() > 2 {
        return None;
    }

    digits.parse::<usize>().ok().filter(|h| *h < 24)
}

fn peak_hour_label(hours: &[u32; 24]) -> String {
    let best = hours.iter().copied().max().unwrap_or(0);
    if best == 0 {
        return UNKNOWN_HOUR.to_string();
    }

    // earliest hour wins ties
    let hour = hours.iter().position(|&n| n == best).unwrap_or(0);
    format!("{hour:02}:00")
}

/// Coarse part of the day a peak hour falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DayPeriod {
    Night,
    Morning,
    Afternoon,
    Evening,
}

impl DayPeriod {
    pub fn label(self) -> &'static str {
        match self {
            DayPeriod::Night => "night",
            DayPeriod::Morning => "morning",
            DayPeriod::Afternoon => "afternoon",
            DayPeriod::Evening => "evening",
        }
    }
}

pub fn day_period(hour: usize) -> DayPeriod {
    match hour {
        0..=5 => DayPeriod::Night,
        6..=11 => DayPeriod::Morning,
        12..=17 => DayPeriod::Afternoon,
        _ => DayPeriod::Evening,
    }
}
