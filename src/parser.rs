//! Parser for the loosely-structured KS CSV export.
//!
//! The export comes from a hand-maintained spreadsheet, so the parser is
//! forgiving: the delimiter is sniffed from the header, short or nameless
//! rows are dropped silently, and unreadable dates fall back to the current
//! instant rather than rejecting the row.

use std::sync::OnceLock;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeDelta, TimeZone};
use regex::Regex;
use tracing::debug;

use crate::columns::{self, cell};
use crate::record::RawRecord;

/// Parses CSV text into validated records, stamping bad dates with the
/// current local time.
pub fn parse(text: &str) -> Vec<RawRecord> {
    parse_at(text, Local::now())
}

/// Same as [`parse`] with an explicit fallback instant for unreadable dates.
pub fn parse_at(text: &str, now: DateTime<Local>) -> Vec<RawRecord> {
    let lines: Vec<&str> = text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.len() < 2 {
        debug!(lines = lines.len(), "CSV has no data rows");
        return Vec::new();
    }

    let delimiter = detect_delimiter(lines[0]);
    let mut records = Vec::with_capacity(lines.len() - 1);
    let mut skipped = 0usize;

    for line in &lines[1..] {
        let cols = split_line(line, delimiter);
        match row_to_record(&cols, now) {
            Some(rec) => records.push(rec),
            None => skipped += 1,
        }
    }

    debug!(
        lines = lines.len(),
        delimiter = %delimiter,
        admitted = records.len(),
        skipped,
        "CSV parsed"
    );

    records
}

/// Picks `;` when the header has strictly more semicolons than commas.
pub fn detect_delimiter(header: &str) -> char {
    let semicolons = header.matches(';').count();
    let commas = header.matches(',').count();
    if semicolons > commas { ';' } else { ',' }
}

/// Splits one line on `delimiter`, honouring double-quoted fields.
///
/// Quotes only toggle the in-quote state and are dropped; a doubled quote
/// inside a field is not unescaped. Every field is trimmed.
pub fn split_line(line: &str, delimiter: char) -> Vec<String> {
    let mut cols = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;

    for ch in line.chars() {
        if ch == '"' {
            in_quote = !in_quote;
        } else if ch == delimiter && !in_quote {
            cols.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }
    cols.push(current.trim().to_string());

    cols
}

/// The single place where a tokenized row is accepted, repaired or rejected.
pub fn row_to_record(cols: &[String], now: DateTime<Local>) -> Option<RawRecord> {
    if cols.len() <= columns::MIN_COLUMNS {
        return None;
    }

    let timestamp = parse_flexible_date(cell(cols, columns::DATE)).unwrap_or(now);

    let record = RawRecord::new(
        cell(cols, columns::PLAYER),
        columns::has_heavy_marker(cols),
        timestamp,
        cell(cols, columns::RANK),
        cell(cols, columns::LOCATION),
    )?;

    Some(record.with_target_info(
        cell(cols, columns::HUNTED_NAME),
        cell(cols, columns::USUAL_TIME),
    ))
}

fn day_first_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^([0-9]{1,2})[/\-.]([0-9]{1,2})[/\-.]([0-9]{2,4})(?:\s+([0-9]{1,2})[:h]([0-9]{1,2}))?")
            .expect("regex is valid")
    })
}

/// Reads `D/M/Y`, `D-M-Y` or `D.M.Y` with an optional `H:M` / `HhM` time,
/// then falls back to ISO-8601, RFC 3339/2822 and `March 1, 2024 [10:00]`
/// style dates. Other free-form layouts are not recognised.
pub fn parse_flexible_date(input: &str) -> Option<DateTime<Local>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    parse_day_first(s).or_else(|| parse_generic(s))
}

fn parse_day_first(s: &str) -> Option<DateTime<Local>> {
    let caps = day_first_pattern().captures(s)?;
    let num = |i: usize| -> Option<u32> {
        caps.get(i).map_or(Some(0), |m| m.as_str().parse().ok())
    };

    let day = num(1)?;
    let month = num(2)?;
    let mut year = num(3)? as i32;
    if year < 100 {
        year += 2000;
    }
    let hour = num(4)?;
    let minute = num(5)?;

    // Out-of-range parts roll over: 31/04 is 1 May, 24:00 is midnight next day.
    let months = year * 12 + month as i32 - 1;
    let first = NaiveDate::from_ymd_opt(months.div_euclid(12), months.rem_euclid(12) as u32 + 1, 1)?;
    let offset = TimeDelta::days(day as i64 - 1)
        + TimeDelta::hours(hour as i64)
        + TimeDelta::minutes(minute as i64);
    let naive = first.and_hms_opt(0, 0, 0)?.checked_add_signed(offset)?;
    Some(to_local(naive))
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%B %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M",
    "%b %d, %Y %H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%b %d, %Y"];

fn parse_generic(s: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Local));
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(to_local(naive));
        }
    }

    NAIVE_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(to_local)
}

// Wall-clock times inside a DST gap are read as UTC.
fn to_local(naive: NaiveDateTime) -> DateTime<Local> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| Local.from_utc_datetime(&naive))
}
