//! Kill-score feed pipeline: fetch a CSV snapshot, parse it into validated
//! records, and derive leaderboards, overview statistics and target intel.

pub mod columns;
pub mod config;
pub mod dashboard;
pub mod fetch;
pub mod intel;
pub mod leaderboard;
pub mod output;
pub mod overview;
pub mod parser;
pub mod record;
pub mod utility;
