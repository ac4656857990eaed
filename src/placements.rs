//! Lazy enumeration of every legal block placement.
//!
//! A configuration assigns the full inventory to open cells: reflective
//! blocks are chosen first, opaque blocks from the remaining cells, then
//! refractive blocks from what is left. Each stage is a lazy combination
//! stream, so the search can stop early without materializing the space.
//! Cell identity decides distinctness, so no configuration is produced
//! twice.

use itertools::Itertools;

use crate::board::{BlockKind, Board, Inventory};
use crate::error::SolveError;

/// All legal configurations of `inventory` on the board's open cells.
///
/// Fails with `InventoryExceedsCapacity` before yielding anything if any
/// stage requests more blocks than it has cells left.
pub fn placements(
    board: &Board,
    inventory: Inventory,
) -> Result<impl Iterator<Item = Board>, SolveError> {
    let open = board.open_cells();
    check_capacity(BlockKind::Reflect, inventory.reflect, open.len())?;
    let after_reflect = open.len() - inventory.reflect;
    check_capacity(BlockKind::Opaque, inventory.opaque, after_reflect)?;
    check_capacity(BlockKind::Refract, inventory.refract, after_reflect - inventory.opaque)?;

    let base = board.clone();
    let Inventory {
        reflect,
        opaque,
        refract,
    } = inventory;

    let configurations = open
        .clone()
        .into_iter()
        .combinations(reflect)
        .flat_map(move |reflect_cells| {
            let remaining: Vec<usize> = open
                .iter()
                .copied()
                .filter(|index| !reflect_cells.contains(index))
                .collect();
            let base = base.clone();
            remaining
                .clone()
                .into_iter()
                .combinations(opaque)
                .flat_map(move |opaque_cells| {
                    let remaining: Vec<usize> = remaining
                        .iter()
                        .copied()
                        .filter(|index| !opaque_cells.contains(index))
                        .collect();
                    let reflect_cells = reflect_cells.clone();
                    let base = base.clone();
                    remaining
                        .into_iter()
                        .combinations(refract)
                        .map(move |refract_cells| {
                            let mut chosen = Vec::with_capacity(
                                reflect_cells.len() + opaque_cells.len() + refract_cells.len(),
                            );
                            chosen.extend(
                                reflect_cells.iter().map(|&index| (index, BlockKind::Reflect)),
                            );
                            chosen.extend(
                                opaque_cells.iter().map(|&index| (index, BlockKind::Opaque)),
                            );
                            chosen.extend(
                                refract_cells.iter().map(|&index| (index, BlockKind::Refract)),
                            );
                            base.with_blocks(&chosen)
                        })
                })
        });

    Ok(configurations)
}

fn check_capacity(kind: BlockKind, requested: usize, available: usize) -> Result<(), SolveError> {
    if requested > available {
        return Err(SolveError::InventoryExceedsCapacity {
            kind,
            requested,
            available,
        });
    }
    Ok(())
}

/// Closed-form size of the configuration space, saturating on overflow.
///
/// `C(n, nr) * C(n - nr, no) * C(n - nr - no, nf)` for `n` open cells.
/// This is the dominant cost driver of the whole search.
pub fn configuration_count(open: usize, inventory: Inventory) -> u128 {
    if inventory.total() > open {
        return 0;
    }
    let after_reflect = open - inventory.reflect;
    let after_opaque = after_reflect - inventory.opaque;
    binomial(open, inventory.reflect)
        .saturating_mul(binomial(after_reflect, inventory.opaque))
        .saturating_mul(binomial(after_opaque, inventory.refract))
}

/// Binomial coefficient via the multiplicative formula.
///
/// Each intermediate product is divisible by the step count, so the division
/// is exact.
fn binomial(n: usize, k: usize) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for step in 0..k {
        result = result.saturating_mul((n - step) as u128) / (step as u128 + 1);
    }
    result
}
