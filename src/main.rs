mod config;
mod error;
mod models;
mod scraper;
mod utils;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::AppConfig;
use crate::models::{ElapsedTime, Leaderboard};
use crate::scraper::parsers::{LeaderboardLayout, extract_leaderboard};
use crate::scraper::{LeaderboardSource, StravaScraper};

#[derive(Parser)]
#[command(name = "kom-getter", about = "Strava segment leaderboard scraper", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch a segment page and print its leaderboard
    Segment {
        /// Segment id, as in https://www.strava.com/segments/<ID>
        id: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Extract the leaderboard from a saved segment page
    Parse {
        /// Path to the saved HTML
        file: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// How many efforts to list
    #[arg(short = 'n', long, default_value_t = 10)]
    top: usize,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "kom_getter=info,warn",
        1 => "kom_getter=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load()?;

    match cli.command {
        Command::Segment { id, output } => {
            let scraper = StravaScraper::new(&config.scraper, &config.leaderboard)?;
            let result = scraper.fetch_leaderboard(&id).await?;

            if output.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_leaderboard(&result.segment_id, &result.leaderboard, output.top);
            }
        }

        Command::Parse { file, output } => {
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {:?}", file))?;
            let layout = LeaderboardLayout::from_config(&config.leaderboard)?;
            let board = extract_leaderboard(&html, &layout);
            info!("{:?}: {} efforts", file, board.efforts.len());

            if output.json {
                println!("{}", serde_json::to_string_pretty(&board)?);
            } else {
                print_leaderboard(&file.display().to_string(), &board, output.top);
            }
        }
    }

    Ok(())
}

fn print_leaderboard(segment: &str, board: &Leaderboard, top: usize) {
    let Some(kom) = board.kom() else {
        println!("No efforts found for segment {}", segment);
        return;
    };

    let time = match &kom.elapsed {
        ElapsedTime::Seconds(secs) => format!("{} seconds ({})", secs, utils::fmt_clock(*secs)),
        ElapsedTime::Unparsed(raw) => format!("{:?} (unparsed)", raw),
    };
    println!("KOM for segment: {} is {} with a time of {}", segment, kom.name, time);
    println!();

    let shown = top.min(board.efforts.len());
    println!("Top {}:", shown);
    for (i, effort) in board.efforts.iter().take(shown).enumerate() {
        println!("{}", utils::fmt_effort(i, effort));
    }

    if !board.is_clean() {
        println!();
        println!("{} row(s) had problems:", board.warnings.len());
        for w in &board.warnings {
            println!("  row {}: {}", w.row, w.issue);
        }
    }
}
