//! Beam tracing on the fine grid.
//!
//! Each laser is an independent state machine that advances one fine cell
//! per step. Interactions trigger only on surface cells; which block face
//! was struck is decided by the parity of the beam's x coordinate (even x
//! means the beam sits on a vertical-edge column, odd x on a horizontal
//! one). Refraction spawns the reflected component as a new beam while the
//! transmitted beam continues straight through.

use rustc_hash::FxHashMap;

use crate::board::BlockKind;
use crate::fine::{FineCell, FineGrid};

/// A fine-grid position.
pub type Point = (i32, i32);

/// Beam origin and direction, in fine-grid coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaserSpec {
    pub x: i32,
    pub y: i32,
    pub vx: i32,
    pub vy: i32,
}

/// Simulation state of one beam.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BeamState {
    Active,
    /// Left the grid bounds.
    Exited,
    /// Hit an opaque surface; movement ceased but the path is kept.
    Absorbed,
    /// Revisited a position more than `LOOP_LIMIT` times.
    Looping,
}

/// A beam revisiting any single position more often than this is declared
/// looping. Fixed repetition threshold, not configurable.
pub const LOOP_LIMIT: u32 = 3;

/// A live beam being traced through one configuration's fine grid.
#[derive(Clone, Debug)]
pub struct Laser {
    x: i32,
    y: i32,
    vx: i32,
    vy: i32,
    state: BeamState,
    path: Vec<Point>,
    visits: FxHashMap<Point, u32>,
}

impl Laser {
    pub fn new(spec: LaserSpec) -> Laser {
        Laser {
            x: spec.x,
            y: spec.y,
            vx: spec.vx,
            vy: spec.vy,
            state: BeamState::Active,
            path: Vec::new(),
            visits: FxHashMap::default(),
        }
    }

    pub fn state(&self) -> BeamState {
        self.state
    }

    /// Every position visited, in order, duplicates included.
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    pub fn velocity(&self) -> (i32, i32) {
        (self.vx, self.vy)
    }

    /// Whether the beam sits on a vertical block face.
    ///
    /// Fine-grid columns alternate between vertical edges (even x) and block
    /// centers (odd x), so the x parity alone fixes the struck face axis.
    fn strikes_vertical_face(&self) -> bool {
        self.x % 2 == 0
    }

    /// The block cell behind the surface the beam currently occupies.
    fn struck_block(&self) -> Point {
        if self.strikes_vertical_face() {
            (self.x + self.vx, self.y)
        } else {
            (self.x, self.y + self.vy)
        }
    }

    fn record(&mut self) -> u32 {
        let position = (self.x, self.y);
        self.path.push(position);
        let count = self.visits.entry(position).or_insert(0);
        *count += 1;
        *count
    }

    /// Advances the beam by one cell, returning a refraction spawn if any.
    ///
    /// At most one beam is spawned per step; the spawn carries the reflected
    /// component while this beam keeps its velocity and transmits through.
    pub fn step(&mut self, grid: &FineGrid) -> Option<Laser> {
        debug_assert_eq!(self.state, BeamState::Active, "only active beams step");

        let visits = self.record();
        let mut spawned = None;

        if grid.get(self.x, self.y) == Some(FineCell::Surface) {
            let (bx, by) = self.struck_block();
            match grid.get(bx, by) {
                Some(FineCell::Block(BlockKind::Opaque)) => {
                    self.vx = 0;
                    self.vy = 0;
                }
                Some(FineCell::Block(BlockKind::Reflect)) => {
                    if self.strikes_vertical_face() {
                        self.vx = -self.vx;
                    } else {
                        self.vy = -self.vy;
                    }
                }
                Some(FineCell::Block(BlockKind::Refract)) => {
                    let spec = if self.strikes_vertical_face() {
                        LaserSpec {
                            x: self.x,
                            y: self.y,
                            vx: -self.vx,
                            vy: self.vy,
                        }
                    } else {
                        LaserSpec {
                            x: self.x,
                            y: self.y,
                            vx: self.vx,
                            vy: -self.vy,
                        }
                    };
                    spawned = Some(Laser::new(spec));
                }
                _ => {}
            }
        }

        self.x += self.vx;
        self.y += self.vy;

        self.state = if self.vx == 0 && self.vy == 0 {
            BeamState::Absorbed
        } else if !grid.contains(self.x, self.y) {
            BeamState::Exited
        } else if visits > LOOP_LIMIT {
            BeamState::Looping
        } else {
            BeamState::Active
        };

        spawned
    }

    /// Runs the beam to a terminal state, collecting refraction spawns.
    pub fn trace(&mut self, grid: &FineGrid, spawned: &mut Vec<Laser>) {
        while self.state == BeamState::Active {
            if let Some(beam) = self.step(grid) {
                spawned.push(beam);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Cell};
    use crate::fine::expand;

    fn grid(rows: &[&str]) -> FineGrid {
        let cells: Vec<Cell> = rows
            .iter()
            .flat_map(|row| row.split_whitespace())
            .map(|token| Cell::from_symbol(token).expect("test grids use known symbols"))
            .collect();
        let cols = cells.len() / rows.len();
        expand(&Board::new(rows.len(), cols, cells))
    }

    fn traced(grid: &FineGrid, spec: LaserSpec) -> (Laser, Vec<Laser>) {
        let mut laser = Laser::new(spec);
        let mut spawned = Vec::new();
        laser.trace(grid, &mut spawned);
        (laser, spawned)
    }

    #[test]
    fn test_vertical_face_reflection_negates_vx() {
        let fine = grid(&["A"]);
        let mut laser = Laser::new(LaserSpec { x: 0, y: 1, vx: 1, vy: 0 });
        laser.step(&fine);
        assert_eq!(laser.velocity(), (-1, 0));
        assert_eq!(laser.state(), BeamState::Exited, "beam leaves through x = -1");
        assert_eq!(laser.path(), &[(0, 1)]);
    }

    #[test]
    fn test_horizontal_face_reflection_negates_vy() {
        let fine = grid(&["A"]);
        let mut laser = Laser::new(LaserSpec { x: 1, y: 0, vx: 0, vy: 1 });
        laser.step(&fine);
        assert_eq!(laser.velocity(), (0, -1));
        assert_eq!(laser.state(), BeamState::Exited);
    }

    #[test]
    fn test_diagonal_beam_keeps_the_unreflected_component() {
        let fine = grid(&["o A"]);
        // travelling down-right, hits the block's left face at even x
        let (laser, _) = traced(&fine, LaserSpec { x: 1, y: 0, vx: 1, vy: 1 });
        assert!(laser.path().contains(&(2, 1)), "reaches the left face");
        assert!(
            laser.path().contains(&(1, 2)),
            "continues down-left after the vertical-face bounce"
        );
    }

    #[test]
    fn test_opaque_surface_absorbs_in_place() {
        let fine = grid(&["B"]);
        let (laser, spawned) = traced(&fine, LaserSpec { x: 0, y: 1, vx: 1, vy: 0 });
        assert_eq!(laser.state(), BeamState::Absorbed);
        assert_eq!(laser.path(), &[(0, 1)], "the absorbing surface stays on the path");
        assert!(spawned.is_empty());
    }

    #[test]
    fn test_refraction_spawns_exactly_one_diverging_beam() {
        let fine = grid(&["C"]);
        let (laser, spawned) = traced(&fine, LaserSpec { x: 1, y: 0, vx: 0, vy: 1 });

        // the transmitted beam passes straight through the block
        assert_eq!(laser.state(), BeamState::Exited);
        assert_eq!(laser.path(), &[(1, 0), (1, 1), (1, 2)]);

        assert_eq!(spawned.len(), 1, "one refraction event spawns one beam");
        assert_eq!(
            spawned[0].velocity(),
            (0, -1),
            "the spawn carries the reflected component"
        );
    }

    #[test]
    fn test_spawned_beam_traces_independently() {
        let fine = grid(&["C"]);
        let (_, mut spawned) = traced(&fine, LaserSpec { x: 1, y: 0, vx: 0, vy: 1 });
        let mut beam = spawned.remove(0);
        let mut nested = Vec::new();
        beam.trace(&fine, &mut nested);
        assert_eq!(beam.state(), BeamState::Exited);
        assert_eq!(beam.path(), &[(1, 0)], "the spawn exits upward immediately");
        assert!(nested.is_empty(), "moving away from the block cannot re-refract");
    }

    #[test]
    fn test_beam_between_facing_mirrors_is_looping() {
        let fine = grid(&["A o A"]);
        let (laser, _) = traced(&fine, LaserSpec { x: 3, y: 1, vx: 1, vy: 0 });
        assert_eq!(laser.state(), BeamState::Looping);
        let bounces = laser.path().iter().filter(|&&p| p == (3, 1)).count();
        assert!(
            bounces as u32 > LOOP_LIMIT,
            "loop detection fires once a position repeats more than {LOOP_LIMIT} times"
        );
    }

    #[test]
    fn test_unobstructed_beam_exits() {
        let fine = grid(&["o o o"]);
        let (laser, spawned) = traced(&fine, LaserSpec { x: 0, y: 1, vx: 1, vy: 0 });
        assert_eq!(laser.state(), BeamState::Exited);
        assert_eq!(
            laser.path(),
            &[(0, 1), (1, 1), (2, 1), (3, 1), (4, 1), (5, 1), (6, 1)]
        );
        assert!(spawned.is_empty());
    }

    #[test]
    fn test_surface_with_nothing_behind_does_not_interact() {
        let fine = grid(&["A"]);
        // on the block's left face but moving away from it
        let mut laser = Laser::new(LaserSpec { x: 0, y: 1, vx: -1, vy: 0 });
        laser.step(&fine);
        assert_eq!(laser.velocity(), (-1, 0), "out-of-bounds neighbor means no interaction");
        assert_eq!(laser.state(), BeamState::Exited);
    }

    #[test]
    fn test_zero_velocity_spec_is_absorbed_at_once() {
        let fine = grid(&["o"]);
        let (laser, _) = traced(&fine, LaserSpec { x: 1, y: 1, vx: 0, vy: 0 });
        assert_eq!(laser.state(), BeamState::Absorbed);
        assert_eq!(laser.path(), &[(1, 1)]);
    }
}
