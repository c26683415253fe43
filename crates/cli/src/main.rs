//! CLI tool for forking a filtered variant of a PPTX deck.
//!
//! Keeps or removes each slide of the base deck per either a CSV mapping
//! table or a speaker-notes search, then writes the filtered copy.

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use deckfork_core::{delete_marked, select_removals, Criterion, Error, SlideDocument, SlideMapping};
use deckfork_pptx::PptxPackage;
use std::path::PathBuf;

/// Fork a filtered variant of a PPTX deck.
#[derive(Parser, Debug)]
#[command(name = "deck-fork")]
#[command(author, version, about, long_about = None)]
#[command(group(
    ArgGroup::new("criterion")
        .required(true)
        .args(["mapping", "notes_contain"])
))]
struct Args {
    /// Base presentation to fork (.pptx)
    #[arg(short, long)]
    base: PathBuf,

    /// Output presentation path (.pptx)
    #[arg(short, long)]
    output: PathBuf,

    /// CSV mapping file, one keep flag per slide in deck order
    #[arg(short, long)]
    mapping: Option<PathBuf>,

    /// Keep only slides whose speaker notes contain this text
    /// (case-insensitive)
    #[arg(short = 'n', long)]
    notes_contain: Option<String>,

    /// Overwrite the output file if it already exists
    #[arg(short = 'w', long)]
    overwrite: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Keep/remove decisions are logged at info, so that is the default.
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    run(&args)
}

/// Check every precondition, then run the two passes and save.
///
/// All failures happen before the output file is touched; there is no
/// partial save to clean up after.
fn run(args: &Args) -> Result<()> {
    if !args.base.exists() {
        return Err(Error::InputNotFound(args.base.clone()).into());
    }

    let criterion = build_criterion(args)?;

    if args.output.exists() && !args.overwrite {
        return Err(Error::OutputCollision(args.output.clone()).into());
    }

    let mut deck = PptxPackage::open_path(&args.base)
        .with_context(|| format!("Failed to open {}", args.base.display()))?;

    log::debug!("Deck has {} slides", deck.slide_count());

    let records = select_removals(&deck, &criterion)?;
    let removed = delete_marked(&mut deck, &records);

    deck.save_path(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    log::info!(
        "Kept {} slides, removed {}. Written to: {}",
        deck.slide_count(),
        removed,
        args.output.display()
    );

    Ok(())
}

/// Build the criterion from whichever source flag was given.
fn build_criterion(args: &Args) -> Result<Criterion> {
    if let Some(path) = &args.mapping {
        let mapping = SlideMapping::from_path(path)
            .with_context(|| format!("Failed to load mapping {}", path.display()))?;
        Ok(Criterion::mapping(mapping))
    } else if let Some(needle) = &args.notes_contain {
        Ok(Criterion::notes_contain(needle)?)
    } else {
        // clap's arg group guarantees one of the two flags.
        Err(Error::MissingCriterion.into())
    }
}
