//! Assigns members to committees from a CSV preference sheet.
//!
//! Prints each committee's roster. Exits with 0 when every committee is full
//! or every member is placed, 2 when the run stalls short of both, and 1 on
//! any error.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use u_matching::deferred::{MatchConfig, MatchRunner};
use u_matching::instance::CommitteeSpec;
use u_matching::loader::load_csv_path;
use u_matching::report::Assignment;

const EXIT_STALLED: u8 = 2;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum Format {
    /// One block per committee.
    #[default]
    Text,
    /// The full assignment as JSON.
    Json,
}

#[derive(Parser)]
#[command(version, about = "Stable assignment of members to committees")]
struct Args {
    /// Preference sheet: a `name` column, `first_choice`..`sixth_choice`,
    /// and one rank column per committee.
    csv: PathBuf,

    /// TOML file listing `[[committee]]` tables with `name` and `capacity`.
    /// Defaults to the six standing committees.
    #[arg(long)]
    committees: Option<PathBuf>,

    /// Reject offers from committees a member did not list, instead of
    /// accepting any first offer.
    #[arg(long)]
    ranked_only: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t)]
    format: Format,

    /// Log progress to stderr; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Deserialize)]
struct RosterFile {
    committee: Vec<CommitteeSpec>,
}

fn read_roster(path: &Path) -> Result<Vec<CommitteeSpec>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading committee roster {}", path.display()))?;
    let roster: RosterFile = toml::from_str(&text)
        .with_context(|| format!("parsing committee roster {}", path.display()))?;
    Ok(roster.committee)
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<Assignment> {
    let committees = match &args.committees {
        Some(path) => read_roster(path)?,
        None => CommitteeSpec::default_roster(),
    };
    let instance = load_csv_path(&args.csv, &committees)
        .with_context(|| format!("loading {}", args.csv.display()))?;

    let config = MatchConfig::default().with_accept_any_first_offer(!args.ranked_only);
    let result = MatchRunner::run(&instance, &config).context("matching failed")?;
    Ok(Assignment::new(&instance, &result))
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let assignment = match run(&args) {
        Ok(assignment) => assignment,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    match args.format {
        Format::Text => print!("{assignment}"),
        Format::Json => match serde_json::to_string_pretty(&assignment) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        },
    }

    if assignment.termination.is_complete() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_STALLED)
    }
}
