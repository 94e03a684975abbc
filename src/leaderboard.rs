//! Per-time-frame player rankings.

use std::collections::HashMap;

use chrono::{DateTime, Local, TimeDelta};

use crate::record::{RankedEntry, RawRecord, TimeFrame, Trend};

/// Entries ranked this high or better are tagged [`Trend::Up`].
const TRENDING_PLACES: usize = 3;

/// Ranks players by total score within `frame`, evaluated against the
/// current local time.
pub fn aggregate(records: &[RawRecord], frame: TimeFrame) -> Vec<RankedEntry> {
    aggregate_at(records, frame, Local::now())
}

/// Same as [`aggregate`] with an explicit evaluation instant.
///
/// Players are grouped by exact name. Equal totals keep the order in which
/// the players first appear in the feed.
pub fn aggregate_at(
    records: &[RawRecord],
    frame: TimeFrame,
    now: DateTime<Local>,
) -> Vec<RankedEntry> {
    let mut order: Vec<(&str, u32, u32)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for rec in records.iter().filter(|r| in_frame(r.timestamp, frame, now)) {
        let slot = *index.entry(rec.player.as_str()).or_insert_with(|| {
            order.push((rec.player.as_str(), 0, 0));
            order.len() - 1
        });
        order[slot].1 += rec.score;
        order[slot].2 += 1;
    }

    // stable: ties stay in first-seen order
    order.sort_by(|a, b| b.1.cmp(&a.1));

    order
        .into_iter()
        .enumerate()
        .map(|(i, (name, total, games))| RankedEntry {
            rank: i + 1,
            name: name.to_string(),
            total_score: total,
            games_played: games,
            average_score: if games == 0 { 0.0 } else { total as f64 / games as f64 },
            trend: if i < TRENDING_PLACES { Trend::Up } else { Trend::Same },
        })
        .collect()
}

/// Whether `ts` belongs to `frame` as seen from `now`. Non-ranking frames
/// admit everything.
pub fn in_frame(ts: DateTime<Local>, frame: TimeFrame, now: DateTime<Local>) -> bool {
    match frame {
        TimeFrame::Daily => ts.date_naive() == now.date_naive(),
        TimeFrame::Weekly => ts >= now - TimeDelta::days(7),
        TimeFrame::Monthly => ts >= now - TimeDelta::days(30),
        TimeFrame::AllTime | TimeFrame::Overview | TimeFrame::BlackList => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn rec(player: &str, heavy: bool, ts: DateTime<Local>) -> RawRecord {
        RawRecord::new(player, heavy, ts, "", "").unwrap()
    }

    fn now() -> DateTime<Local> {
        at(2024, 6, 15, 12)
    }

    #[test]
    fn test_all_time_ranks_by_score() {
        let records = vec![
            rec("Alice", false, at(2024, 3, 1, 0)),
            rec("Bob", true, at(2024, 3, 1, 0)),
        ];
        let board = aggregate_at(&records, TimeFrame::AllTime, now());

        assert_eq!(board.len(), 2);
        assert_eq!((board[0].rank, board[0].name.as_str(), board[0].total_score), (1, "Bob", 2));
        assert_eq!((board[1].rank, board[1].name.as_str(), board[1].total_score), (2, "Alice", 1));
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let t = at(2024, 3, 1, 0);
        let records = vec![
            rec("Zed", false, t),
            rec("Amy", false, t),
            rec("Kim", false, t),
            rec("Amy", false, t),
            rec("Zed", false, t),
        ];
        let board = aggregate_at(&records, TimeFrame::AllTime, now());
        let names: Vec<&str> = board.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Zed", "Amy", "Kim"]);
        assert_eq!(board[0].games_played, 2);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let t = at(2024, 3, 1, 0);
        let records = vec![rec("alice", false, t), rec("Alice", false, t)];
        assert_eq!(aggregate_at(&records, TimeFrame::AllTime, now()).len(), 2);
    }

    #[test]
    fn test_trend_tags() {
        let t = at(2024, 3, 1, 0);
        let records: Vec<RawRecord> = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|n| rec(n, false, t))
            .collect();
        let board = aggregate_at(&records, TimeFrame::AllTime, now());
        let trends: Vec<Trend> = board.iter().map(|e| e.trend).collect();
        assert_eq!(
            trends,
            vec![Trend::Up, Trend::Up, Trend::Up, Trend::Same, Trend::Same]
        );
    }

    #[test]
    fn test_windows() {
        let records = vec![
            rec("Today", false, at(2024, 6, 15, 1)),
            rec("Week", false, at(2024, 6, 10, 12)),
            rec("Month", false, at(2024, 5, 20, 12)),
            rec("Old", false, at(2023, 1, 1, 12)),
        ];
        let names = |frame| -> Vec<String> {
            aggregate_at(&records, frame, now())
                .into_iter()
                .map(|e| e.name)
                .collect()
        };

        assert_eq!(names(TimeFrame::Daily), vec!["Today"]);
        assert_eq!(names(TimeFrame::Weekly), vec!["Today", "Week"]);
        assert_eq!(names(TimeFrame::Monthly), vec!["Today", "Week", "Month"]);
        assert_eq!(names(TimeFrame::AllTime).len(), 4);
    }

    #[test]
    fn test_weekly_boundary_is_inclusive() {
        let edge = now() - TimeDelta::days(7);
        assert!(in_frame(edge, TimeFrame::Weekly, now()));
        assert!(!in_frame(edge - TimeDelta::seconds(1), TimeFrame::Weekly, now()));
    }

    #[test]
    fn test_average_score() {
        let t = at(2024, 3, 1, 0);
        let records = vec![rec("A", true, t), rec("A", false, t)];
        let board = aggregate_at(&records, TimeFrame::AllTime, now());
        assert_eq!(board[0].average_score, 1.5);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_at(&[], TimeFrame::Weekly, now()).is_empty());
    }
}
