//! Positional layout of the KS spreadsheet export.
//!
//! The feed has no usable header, so every column is addressed by index.
//! All indices live here; a schema change is a one-place edit.
//!
//! | Col  | Meaning                          |
//! |------|----------------------------------|
//! | 0    | date                             |
//! | 2    | player name                      |
//! | 3    | rank label                       |
//! | 4    | hunted-target name               |
//! | 5    | location label                   |
//! | 8-13 | weight marker cells (`peso 02`)  |
//! | 12   | hunted-target usual time         |

use std::ops::Range;

pub const DATE: usize = 0;
pub const PLAYER: usize = 2;
pub const RANK: usize = 3;
pub const HUNTED_NAME: usize = 4;
pub const LOCATION: usize = 5;
pub const USUAL_TIME: usize = 12;

/// Cells scanned for the weight marker, end exclusive.
pub const WEIGHT_MARKERS: Range<usize> = 8..14;

/// Rows with this many columns or fewer are noise.
pub const MIN_COLUMNS: usize = 2;

/// Weight marker text, compared case-insensitively after trimming.
pub const HEAVY_MARKER: &str = "peso 02";

/// Returns the trimmed cell at `index`, or `""` when the row is short.
pub fn cell(cols: &[String], index: usize) -> &str {
    cols.get(index).map(|c| c.trim()).unwrap_or("")
}

/// True when any weight-marker cell holds [`HEAVY_MARKER`].
pub fn has_heavy_marker(cols: &[String]) -> bool {
    let end = WEIGHT_MARKERS.end.min(cols.len());
    let start = WEIGHT_MARKERS.start.min(end);
    cols[start..end]
        .iter()
        .any(|c| c.trim().eq_ignore_ascii_case(HEAVY_MARKER))
}
