//! Laser Puzzle Solver
//!
//! Solves `.bff` laser puzzles: reflective, opaque, and refractive blocks are
//! placed on the board's open cells until every laser beam passes through all
//! target points. Solutions are printed and written next to the puzzle file.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use lazor::placements::configuration_count;
use lazor::{bff, persistence};

/// Solves grid-based laser puzzles from .bff files.
#[derive(Parser)]
#[command(name = "lazor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve puzzle files and write answer grids next to them.
    Solve {
        /// Puzzle files to solve, in order.
        files: Vec<PathBuf>,
        /// Evaluate candidate configurations on a rayon thread pool.
        #[arg(long)]
        parallel: bool,
    },
    /// Show the size of a puzzle's configuration space.
    Count {
        /// Puzzle file to inspect.
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Solve { files, parallel } => {
            for file in &files {
                run_solve(file, parallel)?;
            }
        }
        Command::Count { file } => run_count(&file)?,
    }
    Ok(())
}

/// Solves one puzzle file, printing the outcome and writing the answer.
fn run_solve(path: &Path, parallel: bool) -> Result<()> {
    let puzzle =
        bff::load(path).with_context(|| format!("failed to load {}", path.display()))?;

    let start = Instant::now();
    let outcome = if parallel {
        puzzle.solve_parallel()
    } else {
        puzzle.solve()
    }
    .with_context(|| format!("search failed for {}", path.display()))?;
    let elapsed = start.elapsed();

    match outcome {
        Some(solution) => {
            let answer = solution.coarse();
            let written = persistence::save_answer(path, &answer)
                .with_context(|| format!("failed to write answer for {}", path.display()))?;
            print!("{}", answer.render());
            println!(
                "Solved {} in {:.2?} (configuration {})",
                path.display(),
                elapsed,
                solution.index
            );
            println!("Wrote {}", written.display());
        }
        None => println!("No solution found for {} ({:.2?})", path.display(), elapsed),
    }
    Ok(())
}

/// Prints the closed-form configuration count without searching.
fn run_count(path: &Path) -> Result<()> {
    let puzzle =
        bff::load(path).with_context(|| format!("failed to load {}", path.display()))?;
    let count = configuration_count(puzzle.board.open_cells().len(), puzzle.inventory);
    println!("{count} candidate configurations");
    Ok(())
}
