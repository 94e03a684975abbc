//! CLI entry point for the KS board.
//!
//! Every subcommand performs one full refresh (fetch then parse) and renders
//! a single view of the resulting snapshot.

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use ks_board::{
    config::SourceConfig,
    dashboard::{Dashboard, NO_DATA_MESSAGE, View},
    fetch::{BasicClient, CacheBust},
    output::{intel_lines, leaderboard_lines, print_json, print_pretty, write_leaderboard},
    record::TimeFrame,
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "ks_board")]
#[command(about = "Leaderboards and statistics from the KS spreadsheet feed", long_about = None)]
struct Cli {
    /// Primary source: local path or URL (overrides KS_PRIMARY_SOURCE)
    #[arg(long, global = true)]
    primary: Option<String>,

    /// Fallback source used when the primary is unavailable (overrides KS_FALLBACK_SOURCE)
    #[arg(long, global = true)]
    fallback: Option<String>,

    /// Timeout in seconds for the whole fetch (overrides KS_FETCH_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Window {
    Daily,
    Weekly,
    Monthly,
    AllTime,
}

impl From<Window> for TimeFrame {
    fn from(w: Window) -> Self {
        match w {
            Window::Daily => TimeFrame::Daily,
            Window::Weekly => TimeFrame::Weekly,
            Window::Monthly => TimeFrame::Monthly,
            Window::AllTime => TimeFrame::AllTime,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Rank players by KS within a time window
    Leaderboard {
        #[arg(short, long, value_enum, default_value_t = Window::AllTime)]
        window: Window,

        /// Also write the leaderboard to this CSV file
        #[arg(short, long)]
        export: Option<String>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Global statistics: totals, distributions, domination shares
    Overview {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Hunted-target profiles (black list)
    Intel {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Dump the parsed records
    Records {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/ks_board.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("ks_board.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = SourceConfig::from_env().with_overrides(
        cli.primary.as_deref(),
        cli.fallback.as_deref(),
        cli.timeout,
    );
    let client = CacheBust::new(BasicClient::with_timeout(config.timeout)?);

    let mut dashboard = Dashboard::new();
    let outcome = dashboard.refresh(&client, &config).await;
    if !outcome.is_loaded() {
        info!(?outcome, "No data available");
        eprintln!("{NO_DATA_MESSAGE}");
        return Ok(());
    }

    let now = Local::now();

    match cli.command {
        Commands::Leaderboard {
            window,
            export,
            json,
        } => {
            let Some(View::Ranking(board)) = dashboard.view(window.into(), now) else {
                return Ok(());
            };
            print_pretty(&board);

            if let Some(path) = export {
                write_leaderboard(&path, &board)?;
            }

            if json {
                print_json(&board)?;
            } else {
                for line in leaderboard_lines(&board) {
                    println!("{line}");
                }
            }
        }
        Commands::Overview { json } => {
            let Some(View::Overview(snap)) = dashboard.view(TimeFrame::Overview, now) else {
                return Ok(());
            };

            if json {
                print_json(&snap)?;
            } else {
                println!("Total KS:        {}", snap.total_kills);
                println!("Records:         {}", snap.total_records);
                println!("Busiest day:     {}", snap.busiest_day);
                println!("Avg KS per day:  {}", snap.avg_kills_per_day);
                println!(
                    "Weights:         {} normal / {} heavy",
                    snap.weight_distribution.normal, snap.weight_distribution.heavy
                );
                println!("Domination:");
                for d in &snap.domination_stats {
                    println!("  {:<24} {:>5} ({:.1}%)", d.name, d.count, d.percentage);
                }
                println!("Top respawns:");
                for r in &snap.top_respawns {
                    println!("  {:<24} {:>5}", r.name, r.count);
                }
            }
        }
        Commands::Intel { json } => {
            let Some(View::BlackList(intel)) = dashboard.view(TimeFrame::BlackList, now) else {
                return Ok(());
            };

            if json {
                print_json(&intel)?;
            } else if intel.targets.is_empty() {
                println!("No targets on the radar.");
            } else {
                for line in intel_lines(&intel.targets, now) {
                    println!("{line}");
                }
            }
        }
        Commands::Records { json } => {
            let records = dashboard.records();
            if json {
                print_json(&records)?;
            } else {
                for r in records {
                    println!(
                        "{}  {:<20} {}  {:<12} {}",
                        r.timestamp.format("%Y-%m-%d %H:%M"),
                        r.player,
                        r.score,
                        r.rank_label,
                        r.location_label
                    );
                }
            }
        }
    }

    Ok(())
}
