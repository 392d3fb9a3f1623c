mod alignment;
mod error;
mod loader;
mod models;
mod normalize;
mod ranking;
mod shift;

use clap::Parser;
use error::AlignError;
use log::info;
use models::{Alignment, RankedEntry, ShiftResult};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "vote-align")]
#[command(about = "Analyze roll-call vote alignments to find best allies and worst enemies")]
struct Args {
    /// Path to the vote data CSV file
    #[arg(long)]
    csv: PathBuf,

    /// Entity to analyze (e.g. 'SENEGAL')
    #[arg(long)]
    entity: String,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    start: String,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    end: String,

    /// Minimum number of comparable votes for an entity to be considered
    #[arg(long, default_value_t = 20)]
    min_votes: u32,

    /// Number of top allies and enemies to show
    #[arg(long, default_value_t = 5)]
    top_n: usize,

    /// Emit results as JSON instead of the text report
    #[arg(long)]
    json: bool,
}

/// Everything the core produces for one analysis, as plain data.
#[derive(Serialize)]
struct Report<'a> {
    entity: &'a str,
    start: &'a str,
    end: &'a str,
    min_votes: u32,
    alignments: &'a HashMap<String, Alignment>,
    allies: &'a [RankedEntry],
    enemies: &'a [RankedEntry],
    shift: &'a Option<ShiftResult>,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), AlignError> {
    let table = loader::load_csv_path(&args.csv, &loader::LoadOptions::default())?;

    let start = loader::parse_when(&args.start)
        .ok_or_else(|| AlignError::InvalidDate(args.start.clone()))?;
    let end = loader::parse_when(&args.end)
        .ok_or_else(|| AlignError::InvalidDate(args.end.clone()))?;

    let entity = normalize::canonical_name(&args.entity);
    if table.entity_index(entity).is_none() {
        let similar = normalize::similar_entities(table.entities(), entity);
        if !similar.is_empty() {
            eprintln!("did you mean one of: {}?", similar.join(", "));
        }
        return Err(AlignError::EntityNotFound(entity.to_string()));
    }

    let window = table.filter_period(start, end);
    info!(
        "{} resolutions between {} and {}",
        window.len(),
        args.start,
        args.end
    );

    let alignments = alignment::compute_alignment(&window, entity)?;
    let (allies, enemies) =
        ranking::find_allies_and_enemies(&alignments, args.top_n, args.min_votes);
    let shift = shift::analyze_alignment_shift(&table, entity, start, end, args.min_votes)?;

    if args.json {
        let report = Report {
            entity,
            start: &args.start,
            end: &args.end,
            min_votes: args.min_votes,
            alignments: &alignments,
            allies: &allies,
            enemies: &enemies,
            shift: &shift,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).expect("report is serializable")
        );
        return Ok(());
    }

    print_report(args, entity, &allies, &enemies, &shift);
    Ok(())
}

fn print_report(
    args: &Args,
    entity: &str,
    allies: &[RankedEntry],
    enemies: &[RankedEntry],
    shift: &Option<ShiftResult>,
) {
    if allies.is_empty() {
        println!(
            "No valid vote comparisons with at least {} votes found for the specified period.",
            args.min_votes
        );
        return;
    }

    println!(
        "Analysis for {} between {} and {} (minimum {} votes):",
        entity, args.start, args.end, args.min_votes
    );

    println!("\nTop {} Allies:", args.top_n);
    for (rank, entry) in allies.iter().enumerate() {
        println!(
            "  {}. {} with {:.2}% votes in common ({} votes)",
            rank + 1,
            entry.entity,
            entry.fraction * 100.0,
            entry.votes
        );
    }

    println!("\nTop {} Enemies:", args.top_n);
    for (rank, entry) in enemies.iter().enumerate() {
        println!(
            "  {}. {} with {:.2}% votes in common ({} votes)",
            rank + 1,
            entry.entity,
            entry.fraction * 100.0,
            entry.votes
        );
    }

    match shift {
        Some(result) => {
            println!("\nBiggest Alignment Shift: {}", result.entity);
            println!("  Direction: {}", result.direction);
            println!(
                "  First half alignment: {:.2}% ({} votes)",
                result.first_fraction * 100.0,
                result.first_votes
            );
            println!(
                "  Second half alignment: {:.2}% ({} votes)",
                result.second_fraction * 100.0,
                result.second_votes
            );
            println!(
                "  Shift: {:.2}% {}",
                result.shift.abs() * 100.0,
                if result.shift > 0.0 { "increase" } else { "decrease" }
            );
        }
        None => println!(
            "\nNo significant alignment shifts detected with at least {} votes in each period.",
            args.min_votes
        ),
    }
}
