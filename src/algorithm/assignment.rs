//! Greedy closest-color tile assignment with a random fallback once the pool runs dry

use crate::analysis::color::rgb_distance;
use crate::spatial::GridCell;
use bitvec::prelude::*;
use rand::Rng;
use tracing::warn;

/// How a tile ended up in a cell
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AssignmentKind {
    /// Closest unused tile; the tile is now marked used
    Matched,
    /// Pool exhausted, so a random tile was reused without marking
    Fallback,
}

/// Tile chosen for one grid cell
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Assignment {
    /// Cell being filled
    pub cell: GridCell,
    /// Index into the tile pool
    pub tile_index: usize,
    /// Unique match or fallback reuse
    pub kind: AssignmentKind,
}

/// Complete cell-to-tile mapping in row-major order
#[derive(Clone, Debug, Default)]
pub struct AssignmentPlan {
    /// One entry per cell
    pub assignments: Vec<Assignment>,
}

impl AssignmentPlan {
    /// Number of cells filled by a unique closest match
    pub fn matched_count(&self) -> usize {
        self.count_kind(AssignmentKind::Matched)
    }

    /// Number of cells filled by random reuse
    pub fn fallback_count(&self) -> usize {
        self.count_kind(AssignmentKind::Fallback)
    }

    fn count_kind(&self, kind: AssignmentKind) -> usize {
        self.assignments.iter().filter(|a| a.kind == kind).count()
    }
}

/// Greedy closest-color assigner with a used-tile exclusion set
///
/// The used set lives in the assigner, so every claim-and-mark step goes through
/// `&mut self` and is serialized.
pub struct TileAssigner<'a> {
    colors: &'a [[f64; 3]],
    used: BitVec,
}

impl<'a> TileAssigner<'a> {
    /// Create an assigner over the pool's mean RGB colors
    pub fn new(colors: &'a [[f64; 3]]) -> Self {
        Self {
            colors,
            used: bitvec![0; colors.len()],
        }
    }

    /// Number of tiles not yet claimed
    pub fn remaining(&self) -> usize {
        self.used.count_zeros()
    }

    /// Whether a pool index has been claimed
    pub fn is_used(&self, index: usize) -> bool {
        self.used.get(index).as_deref() == Some(&true)
    }

    /// Claim the unused tile closest to `target` and mark it used
    ///
    /// Ties go to the earliest index. Returns `None` once every tile is used.
    pub fn claim_nearest(&mut self, target: [f64; 3]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;

        for (index, &color) in self.colors.iter().enumerate() {
            if self.is_used(index) {
                continue;
            }
            let distance = rgb_distance(color, target);
            if best.is_none_or(|(_, min_distance)| distance < min_distance) {
                best = Some((index, distance));
            }
        }

        let (index, _) = best?;
        self.used.set(index, true);
        Some(index)
    }

    /// Assign every cell in order, falling back to random reuse when the pool runs dry
    ///
    /// Returns `None` only for an empty pool.
    pub fn assign<R: Rng + ?Sized>(
        &mut self,
        cells: &[GridCell],
        rng: &mut R,
    ) -> Option<AssignmentPlan> {
        if self.colors.is_empty() {
            return None;
        }

        let mut assignments = Vec::with_capacity(cells.len());
        for &cell in cells {
            let assignment = if let Some(tile_index) = self.claim_nearest(cell.target) {
                Assignment {
                    cell,
                    tile_index,
                    kind: AssignmentKind::Matched,
                }
            } else {
                warn!(
                    row = cell.row,
                    col = cell.col,
                    "No suitable tile left for cell; using a random tile"
                );
                Assignment {
                    cell,
                    tile_index: rng.random_range(0..self.colors.len()),
                    kind: AssignmentKind::Fallback,
                }
            };
            assignments.push(assignment);
        }

        Some(AssignmentPlan { assignments })
    }
}
