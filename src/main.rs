use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use cg_scoreview::Error;
use cg_scoreview::config::ViewProfile;
use cg_scoreview::input::load_dataset;
use cg_scoreview::logging::{LogFormat, init_tracing};
use cg_scoreview::model::SelectionError;
use cg_scoreview::pipeline::controller::{ViewBoard, ViewError, ViewSnapshot};
use cg_scoreview::pipeline::table::{SortKey, sort_rows};
use cg_scoreview::report::json::{render_view_json, render_views_json};
use cg_scoreview::report::text::{render_groups_text, render_view_text};
use cg_scoreview::report::writer::write_reports;

#[derive(Parser, Debug)]
#[command(name = "cg-scoreview")]
#[command(about = "Filtered histogram and table views over a scored organization dataset")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log line format on stderr
    #[arg(long, value_enum, default_value_t = LogFormatArg::Text, global = true)]
    log_format: LogFormatArg,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List filter groups and the values each can select
    Groups {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Print one group's histogram and table for a selection
    View {
        #[command(flatten)]
        data: DataArgs,

        /// Filter group id (e.g. size, roe, ews)
        #[arg(long)]
        group: String,

        /// Value to select; "all" (or "*") for no restriction, "=V" for a literal value
        #[arg(long, default_value = "all")]
        select: String,

        /// Display-only sort, COLUMN[:asc|desc]; repeat for multi-column sort
        #[arg(long)]
        sort: Vec<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Maximum table rows in text output
        #[arg(long)]
        max_rows: Option<usize>,
    },
    /// Apply a file of `group=value` selection events and print the final views
    Replay {
        #[command(flatten)]
        data: DataArgs,

        #[arg(long)]
        events: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[arg(long)]
        max_rows: Option<usize>,
    },
    /// Write summary.json, report.txt and per-group TSVs
    Report {
        #[command(flatten)]
        data: DataArgs,

        #[arg(long)]
        out: PathBuf,

        /// Initial selection, `group=value`; repeatable
        #[arg(long)]
        select: Vec<String>,
    },
}

#[derive(Args, Debug, Clone)]
struct DataArgs {
    /// Dataset CSV (optionally .gz)
    #[arg(long)]
    input: PathBuf,

    /// Built-in profile
    #[arg(long, default_value = "nonlife", conflicts_with = "profile_file")]
    profile: String,

    /// JSON profile describing columns and filter groups
    #[arg(long)]
    profile_file: Option<PathBuf>,

    /// Histogram bin count (overrides the profile)
    #[arg(long)]
    bins: Option<usize>,

    /// Keep rows without a primary score (tables only)
    #[arg(long)]
    allow_missing_primary: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormatArg {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();
    let log_format = match cli.log_format {
        LogFormatArg::Text => LogFormat::Text,
        LogFormatArg::Json => LogFormat::Json,
    };
    init_tracing(cli.verbose, log_format);

    if let Err(err) = run(cli.command) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), Error> {
    match command {
        Command::Groups { data } => {
            let board = open_board(&data)?;
            let groups: Vec<_> = board.controllers().iter().map(|c| c.group()).collect();
            print!("{}", render_groups_text(&groups));
        }
        Command::View {
            data,
            group,
            select,
            sort,
            format,
            max_rows,
        } => {
            let mut board = open_board(&data)?;
            select_or_keep(&mut board, &group, &select)?;
            let mut snapshot = board
                .controller(&group)
                .map(|c| c.snapshot().clone())
                .ok_or_else(|| Error::Usage(format!("unknown filter group: {group}")))?;
            let keys = sort
                .iter()
                .map(|raw| SortKey::parse(raw))
                .collect::<Result<Vec<_>, _>>()?;
            sort_rows(&mut snapshot.table, &keys)?;
            print_views(&[&snapshot], format, max_rows)?;
        }
        Command::Replay {
            data,
            events,
            format,
            max_rows,
        } => {
            let mut board = open_board(&data)?;
            let text = fs::read_to_string(&events)?;
            let (applied, rejected) = replay_events(&mut board, &text)?;
            tracing::info!(applied, rejected, "events replayed");
            print_views(&board.snapshots(), format, max_rows)?;
        }
        Command::Report { data, out, select } => {
            let mut board = open_board(&data)?;
            for raw in &select {
                let (group, value) = parse_event(raw).ok_or_else(|| {
                    Error::Usage(format!("invalid --select {raw:?} (use group=value)"))
                })?;
                select_or_keep(&mut board, group, value)?;
            }
            let summary = write_reports(&board, &out)?;
            println!(
                "wrote {} group views for {} records to {}",
                summary.groups.len(),
                summary.dataset.n_records,
                out.display()
            );
        }
    }
    Ok(())
}

fn resolve_profile(data: &DataArgs) -> Result<ViewProfile, Error> {
    let mut profile = match &data.profile_file {
        Some(path) => ViewProfile::from_json_file(path)?,
        None => ViewProfile::builtin(&data.profile)?,
    };
    if let Some(bins) = data.bins {
        profile.bin_count = bins;
    }
    if data.allow_missing_primary {
        profile.allow_missing_primary = true;
    }
    profile.validate()?;
    Ok(profile)
}

fn open_board(data: &DataArgs) -> Result<ViewBoard, Error> {
    let profile = resolve_profile(data)?;
    let dataset = load_dataset(&data.input, &profile)?;
    Ok(ViewBoard::from_profile(dataset, &profile)?)
}

fn parse_event(line: &str) -> Option<(&str, &str)> {
    let (group, value) = line.split_once('=')?;
    let group = group.trim();
    if group.is_empty() {
        return None;
    }
    Some((group, value.trim()))
}

/// Applies one selection. A rejected value leaves the group on its previous
/// view and returns `Ok(false)`; an unknown group is an error.
fn select_or_keep(board: &mut ViewBoard, group: &str, raw: &str) -> Result<bool, Error> {
    match board.dispatch(group, raw) {
        Ok(_) => Ok(true),
        Err(ViewError::Selection(
            SelectionError::UnknownValue { .. } | SelectionError::AmbiguousSentinel { .. },
        )) => Ok(false),
        Err(err) => Err(err.into()),
    }
}

/// Dispatches each `group=value` line. Rejected events keep the group's
/// previous view; only malformed lines abort.
fn replay_events(board: &mut ViewBoard, text: &str) -> Result<(usize, usize), Error> {
    let mut applied = 0usize;
    let mut rejected = 0usize;
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (group, value) = parse_event(line).ok_or_else(|| {
            Error::Usage(format!("events line {}: expected group=value", idx + 1))
        })?;
        match board.dispatch(group, value) {
            Ok(_) => applied += 1,
            Err(_) => rejected += 1,
        }
    }
    Ok((applied, rejected))
}

fn print_views(
    snapshots: &[&ViewSnapshot],
    format: OutputFormat,
    max_rows: Option<usize>,
) -> Result<(), Error> {
    match format {
        OutputFormat::Json => {
            let json = match snapshots {
                [one] => render_view_json(one)?,
                many => render_views_json(many)?,
            };
            println!("{json}");
        }
        OutputFormat::Text => {
            for snapshot in snapshots {
                println!("{}", render_view_text(snapshot, max_rows));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
