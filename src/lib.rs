//! Laser Puzzle Solver Library
//!
//! Solves grid-based laser puzzles: a fixed inventory of reflective, opaque,
//! and refractive blocks must be placed on a board's open cells so that every
//! laser beam, including beams split off by refraction, passes through all
//! required target points.
//!
//! The search enumerates every legal placement lazily, expands each candidate
//! board to a fine-grained simulation grid, and traces all beams to
//! termination; the first candidate whose beam paths cover the targets wins.

pub mod bff;
pub mod board;
pub mod error;
pub mod fine;
pub mod laser;
pub mod persistence;
pub mod placements;
pub mod solver;

pub use board::{BlockKind, Board, Cell, Inventory};
pub use error::{ParseError, SolveError};
pub use laser::{BeamState, Laser, LaserSpec, Point};
pub use solver::{Puzzle, Solution};
