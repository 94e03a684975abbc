//! Rendering of computed views for the CLI.
//!
//! Supports pretty-printing, JSON serialization, and CSV export of a
//! leaderboard.

use std::fmt::Debug;

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use tracing::{debug, info};

use crate::intel::{IntelTarget, day_period, parse_hour};
use crate::record::RankedEntry;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl Debug) {
    debug!("{:#?}", value);
}

/// Prints a value as pretty JSON on stdout.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes a leaderboard to `path` as CSV with a header row, replacing any
/// existing file.
pub fn write_leaderboard(path: &str, entries: &[RankedEntry]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("cannot create {path}"))?;

    for entry in entries {
        writer.serialize(entry)?;
    }
    writer.flush()?;

    info!(path, rows = entries.len(), "Leaderboard exported");
    Ok(())
}

/// One line per entry: `#rank name score (games)`.
pub fn leaderboard_lines(entries: &[RankedEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|e| {
            format!(
                "#{:<3} {:<24} {:>5} KS  ({} kills)",
                e.rank, e.name, e.total_score, e.games_played
            )
        })
        .collect()
}

/// One line per target with its peak period and activity status as of `now`.
pub fn intel_lines(targets: &[IntelTarget], now: chrono::DateTime<chrono::Local>) -> Vec<String> {
    targets
        .iter()
        .map(|t| {
            let status = if t.is_inactive(now) { "inactive" } else { "active" };
            let locations: Vec<&str> = t.top_locations.iter().map(|l| l.name.as_str()).collect();
            let period = parse_hour(&t.peak_hour).map_or("", |h| day_period(h).label());
            format!(
                "{:<24} x{:<3} peak {} {:<9}  last seen {}d ago [{}]  {}",
                t.name,
                t.count,
                t.peak_hour,
                period,
                t.days_since_seen(now),
                status,
                locations.join(", ")
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{LabelCount, Trend};
    use chrono::{DateTime, Local, TimeDelta, TimeZone};
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn entries() -> Vec<RankedEntry> {
        vec![
            RankedEntry {
                rank: 1,
                name: "Bob".into(),
                total_score: 2,
                games_played: 1,
                average_score: 2.0,
                trend: Trend::Up,
            },
            RankedEntry {
                rank: 2,
                name: "Alice".into(),
                total_score: 1,
                games_played: 1,
                average_score: 1.0,
                trend: Trend::Up,
            },
        ]
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&entries());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&entries()).unwrap();
    }

    #[test]
    fn test_write_leaderboard_rows() {
        let path = temp_path("ks_board_test_leaderboard.csv");
        let _ = fs::remove_file(&path);

        write_leaderboard(&path, &entries()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "rank,name,total_score,games_played,average_score,trend");
        assert_eq!(lines[1], "1,Bob,2,1,2.0,up");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_leaderboard_overwrites() {
        let path = temp_path("ks_board_test_overwrite.csv");
        write_leaderboard(&path, &entries()).unwrap();
        write_leaderboard(&path, &entries()[..1]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);

        fs::remove_file(&path).unwrap();
    }

    fn target(peak_hour: &str, days_ago: i64, now: DateTime<Local>) -> IntelTarget {
        IntelTarget {
            name: "Viper".into(),
            count: 2,
            peak_hour: peak_hour.into(),
            last_seen: now - TimeDelta::days(days_ago),
            top_locations: vec![LabelCount::new("Zone1", 2)],
        }
    }

    #[test]
    fn test_intel_lines_label_peak_period() {
        let now = Local.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let lines = intel_lines(&[target("21:00", 1, now), target("03:00", 9, now)], now);

        assert!(lines[0].contains("peak 21:00 evening"));
        assert!(lines[0].contains("[active]"));
        assert!(lines[1].contains("peak 03:00 night"));
        assert!(lines[1].contains("[inactive]"));
        assert!(lines[1].ends_with("Zone1"));
    }

    #[test]
    fn test_intel_lines_unknown_peak_has_no_period() {
        let now = Local.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let line = &intel_lines(&[target("Unknown", 0, now)], now)[0];

        assert!(line.contains("peak Unknown "));
        for label in ["night", "morning", "afternoon", "evening"] {
            assert!(!line.contains(label));
        }
    }

    #[test]
    fn test_leaderboard_lines() {
        let lines = leaderboard_lines(&entries());
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("#1"));
        assert!(lines[0].contains("Bob"));
    }
}
