//! Exhaustive search driver.
//!
//! Enumerates candidate configurations lazily, simulates every beam on each
//! one, and stops at the first configuration whose beam paths cover all
//! target points. Configurations are independent, so an optional rayon
//! driver evaluates them in enumeration-ordered batches; the reported
//! solution is always the one with the lowest enumeration index.

use rayon::prelude::*;
use rustc_hash::FxHashSet;

use crate::board::{Board, Inventory};
use crate::error::SolveError;
use crate::fine::{contract, expand, fine_extent, FineGrid};
use crate::laser::{Laser, LaserSpec, Point};
use crate::placements::{configuration_count, placements};

/// Configurations handed to rayon at a time. Batches are drained in
/// enumeration order, so cancellation after a hit is best-effort at batch
/// granularity.
const PARALLEL_BATCH: usize = 1024;

/// A complete puzzle: board, movable inventory, beams, and targets.
///
/// Laser origins and targets are in fine-grid coordinates.
#[derive(Clone, Debug)]
pub struct Puzzle {
    pub board: Board,
    pub inventory: Inventory,
    pub lasers: Vec<LaserSpec>,
    pub targets: Vec<Point>,
}

/// The first configuration found whose beams cover every target.
#[derive(Clone, Debug)]
pub struct Solution {
    /// The solved board, expanded to its simulation grid.
    pub fine: FineGrid,
    /// Enumeration index of the winning configuration.
    pub index: usize,
}

impl Solution {
    /// The solved board in coarse form, for rendering.
    pub fn coarse(&self) -> Board {
        contract(&self.fine)
    }
}

impl Puzzle {
    /// Searches the configuration space in enumeration order.
    ///
    /// `Ok(None)` means the space was exhausted without covering every
    /// target; it is an expected outcome, not a failure.
    pub fn solve(&self) -> Result<Option<Solution>, SolveError> {
        self.validate()?;
        log::info!(
            "searching {} candidate configurations",
            configuration_count(self.board.open_cells().len(), self.inventory)
        );

        for (index, configuration) in placements(&self.board, self.inventory)?.enumerate() {
            if self.satisfies(&configuration) {
                log::info!("configuration {index} covers all targets");
                return Ok(Some(Solution {
                    fine: expand(&configuration),
                    index,
                }));
            }
        }
        Ok(None)
    }

    /// Parallel variant of [`solve`](Puzzle::solve) with identical results.
    ///
    /// Workers share only read-only puzzle data. `find_first` keeps the
    /// lowest index within a batch and batches are processed in order, so
    /// the lowest-index solution wins even if a later configuration's
    /// simulation finishes first.
    pub fn solve_parallel(&self) -> Result<Option<Solution>, SolveError> {
        self.validate()?;
        let mut configurations = placements(&self.board, self.inventory)?;
        let mut base = 0usize;

        loop {
            let batch: Vec<Board> = configurations.by_ref().take(PARALLEL_BATCH).collect();
            if batch.is_empty() {
                return Ok(None);
            }
            let batch_len = batch.len();

            let found = batch
                .into_par_iter()
                .enumerate()
                .find_first(|(_, configuration)| self.satisfies(configuration));

            if let Some((offset, configuration)) = found {
                let index = base + offset;
                log::info!("configuration {index} covers all targets");
                return Ok(Some(Solution {
                    fine: expand(&configuration),
                    index,
                }));
            }
            base += batch_len;
        }
    }

    /// Rejects laser and target coordinates outside the fine grid.
    fn validate(&self) -> Result<(), SolveError> {
        let rows = fine_extent(self.board.rows());
        let cols = fine_extent(self.board.cols());
        let outside =
            |x: i32, y: i32| x < 0 || x as usize >= cols || y < 0 || y as usize >= rows;

        for spec in &self.lasers {
            if outside(spec.x, spec.y) {
                return Err(SolveError::InvalidCoordinate {
                    what: "laser",
                    x: spec.x,
                    y: spec.y,
                    rows,
                    cols,
                });
            }
        }
        for &(x, y) in &self.targets {
            if outside(x, y) {
                return Err(SolveError::InvalidCoordinate {
                    what: "target",
                    x,
                    y,
                    rows,
                    cols,
                });
            }
        }
        Ok(())
    }

    /// Whether one configuration's beams cover every target.
    fn satisfies(&self, configuration: &Board) -> bool {
        let fine = expand(configuration);
        let beams = simulate(&fine, &self.lasers);
        let covered = coverage(&beams);
        self.targets.iter().all(|target| covered.contains(target))
    }
}

/// Runs every beam, and every beam they spawn, to a terminal state.
///
/// The active set starts from fresh copies of the input lasers and lives
/// only for this call; refraction spawns join it and are dropped with it,
/// never carrying over into another configuration's simulation.
pub fn simulate(fine: &FineGrid, specs: &[LaserSpec]) -> Vec<Laser> {
    let mut pending: Vec<Laser> = specs.iter().copied().map(Laser::new).collect();
    let mut finished = Vec::with_capacity(pending.len());
    while let Some(mut laser) = pending.pop() {
        laser.trace(fine, &mut pending);
        finished.push(laser);
    }
    finished
}

/// The set of fine-grid points visited by any traced beam.
pub fn coverage(beams: &[Laser]) -> FxHashSet<Point> {
    beams
        .iter()
        .flat_map(|beam| beam.path().iter().copied())
        .collect()
}
