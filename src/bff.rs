//! `.bff` puzzle-file input adapter.
//!
//! A puzzle file carries four kinds of content:
//! - a grid section between `GRID START` and `GRID STOP`, rows of
//!   whitespace-separated symbols in `{o, x, A, B, C}`
//! - block counts: `A n`, `B n`, `C n` (reflective, opaque, refractive)
//! - lasers: `L x y vx vy` in fine-grid coordinates
//! - targets: `P x y` in fine-grid coordinates
//!
//! Blank lines, `#` comments, and unknown directives are ignored. The
//! adapter validates rectangularity and the symbol set so the engine can
//! assume both.

use std::fs;
use std::path::Path;

use crate::board::{Board, Cell, Inventory};
use crate::error::ParseError;
use crate::laser::{LaserSpec, Point};
use crate::solver::Puzzle;

/// Reads and parses a puzzle file.
pub fn load(path: &Path) -> Result<Puzzle, ParseError> {
    let text = fs::read_to_string(path)?;
    parse(&text)
}

/// Parses puzzle-file text into a ready-to-solve puzzle.
pub fn parse(input: &str) -> Result<Puzzle, ParseError> {
    let mut grid_rows: Vec<Vec<Cell>> = Vec::new();
    let mut grid_found = false;
    let mut in_grid = false;
    let mut inventory = Inventory::default();
    let mut counts_found = false;
    let mut lasers = Vec::new();
    let mut targets = Vec::new();

    for line in input.lines() {
        let line = line.trim();

        if in_grid {
            if line == "GRID STOP" {
                in_grid = false;
            } else if !line.is_empty() {
                grid_rows.push(parse_grid_row(line, grid_rows.len())?);
            }
            continue;
        }
        if line == "GRID START" {
            grid_found = true;
            in_grid = true;
            continue;
        }
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("A") => {
                inventory.reflect = parse_count(tokens, line)?;
                counts_found = true;
            }
            Some("B") => {
                inventory.opaque = parse_count(tokens, line)?;
                counts_found = true;
            }
            Some("C") => {
                inventory.refract = parse_count(tokens, line)?;
                counts_found = true;
            }
            Some("L") => lasers.push(parse_laser(tokens, line)?),
            Some("P") => targets.push(parse_target(tokens, line)?),
            _ => {} // unknown directives are ignored
        }
    }

    if !grid_found || grid_rows.is_empty() {
        return Err(ParseError::MissingGrid);
    }
    let cols = grid_rows[0].len();
    for (row, cells) in grid_rows.iter().enumerate() {
        if cells.len() != cols {
            return Err(ParseError::NonRectangular {
                row,
                found: cells.len(),
                expected: cols,
            });
        }
    }
    if !counts_found {
        return Err(ParseError::MissingBlocks);
    }
    if targets.is_empty() {
        return Err(ParseError::MissingTargets);
    }
    if lasers.is_empty() {
        return Err(ParseError::MissingLasers);
    }

    let rows = grid_rows.len();
    let cells: Vec<Cell> = grid_rows.into_iter().flatten().collect();
    log::debug!(
        "parsed {rows}x{cols} board, {} lasers, {} targets",
        lasers.len(),
        targets.len()
    );

    Ok(Puzzle {
        board: Board::new(rows, cols, cells),
        inventory,
        lasers,
        targets,
    })
}

fn parse_grid_row(line: &str, row: usize) -> Result<Vec<Cell>, ParseError> {
    line.split_whitespace()
        .enumerate()
        .map(|(col, token)| {
            Cell::from_symbol(token).ok_or_else(|| ParseError::InvalidSymbol {
                symbol: token.to_string(),
                row,
                col,
            })
        })
        .collect()
}

fn parse_count<'a>(
    mut tokens: impl Iterator<Item = &'a str>,
    line: &str,
) -> Result<usize, ParseError> {
    let count = tokens.next().and_then(|token| token.parse().ok());
    match (count, tokens.next()) {
        (Some(count), None) => Ok(count),
        _ => Err(ParseError::InvalidCount {
            line: line.to_string(),
        }),
    }
}

fn parse_laser<'a>(
    tokens: impl Iterator<Item = &'a str>,
    line: &str,
) -> Result<LaserSpec, ParseError> {
    match parse_ints(tokens).as_deref() {
        Some(&[x, y, vx, vy]) => Ok(LaserSpec { x, y, vx, vy }),
        _ => Err(ParseError::MalformedLaser {
            line: line.to_string(),
        }),
    }
}

fn parse_target<'a>(
    tokens: impl Iterator<Item = &'a str>,
    line: &str,
) -> Result<Point, ParseError> {
    match parse_ints(tokens).as_deref() {
        Some(&[x, y]) => Ok((x, y)),
        _ => Err(ParseError::MalformedTarget {
            line: line.to_string(),
        }),
    }
}

fn parse_ints<'a>(tokens: impl Iterator<Item = &'a str>) -> Option<Vec<i32>> {
    tokens.map(|token| token.parse().ok()).collect()
}
