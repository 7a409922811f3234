// Uniform spatial hash for waypoint neighbour lookup.
//
// Unlike a bounded grid, waypoints can sit anywhere on the ground plane, so
// cells are stored sparsely in a HashMap keyed by integer cell coordinates.

use glam::Vec2;
use std::collections::HashMap;

/// Offsets of the 3x3 block around a cell, own cell first.
/// The order is fixed so candidate lists come out deterministic.
const NEIGHBOR_CELLS: [(i64, i64); 9] = [
    (0, 0), (1, 0), (-1, 0), (0, 1), (0, -1), (1, 1), (1, -1), (-1, 1), (-1, -1),
];

// ============================================================================
// SPATIAL INDEX
// ============================================================================

/// Buckets point indices into square cells of side `cell_size`.
///
/// Stores indices into the caller's node slice, in insertion order per cell.
pub struct SpatialIndex {
    buckets: HashMap<(i64, i64), Vec<usize>>,
    cell_size: f32,
}

impl SpatialIndex {
    /// `cell_size` must be finite and positive; the graph builder passes
    /// the neighbour radius here after validating it.
    pub fn new(cell_size: f32) -> Self {
        Self {
            buckets: HashMap::new(),
            cell_size,
        }
    }

    /// Cell containing `pos`. Boundary points go to the cell `floor` picks.
    ///
    /// Quotients beyond the `i64` range saturate, so very distant points
    /// share an edge cell. Callers distance-filter, so this only costs
    /// extra candidates.
    pub fn cell_of(&self, pos: Vec2) -> (i64, i64) {
        (
            (pos.x / self.cell_size).floor() as i64,
            (pos.y / self.cell_size).floor() as i64,
        )
    }

    /// Insert point `idx` at world position `pos`.
    pub fn insert(&mut self, pos: Vec2, idx: usize) {
        let cell = self.cell_of(pos);
        self.buckets.entry(cell).or_default().push(idx);
    }

    /// All indices stored in the 3x3 block of cells around `pos`.
    ///
    /// Returns a superset of the points within `cell_size`; callers must
    /// distance-filter. The point at `pos` itself is included if it was
    /// inserted. Offsets past the edge of the cell range are skipped.
    pub fn neighbors(&self, pos: Vec2) -> impl Iterator<Item = usize> + '_ {
        let (cx, cy) = self.cell_of(pos);
        NEIGHBOR_CELLS
            .iter()
            .filter_map(move |&(dx, dy)| {
                Some((cx.checked_add(dx)?, cy.checked_add(dy)?))
            })
            .filter_map(|cell| self.buckets.get(&cell))
            .flat_map(|bucket| bucket.iter().copied())
    }

    /// Number of non-empty cells.
    pub fn occupied_cells(&self) -> usize {
        self.buckets.len()
    }
}
