//! Distance-sorted neighbour queries over a uniform grid.
//!
//! Agents are bucketed into square cells whose side is the search radius, so every agent
//! within the radius of a point lies in the 3 x 3 block of cells around it. A query returns
//! the candidates from that block sorted nearest-first. Candidates further than the radius
//! may appear at the tail of the list: callers walk the list in order and stop at the first
//! candidate whose distance reaches the radius, which is only correct because the list is
//! sorted.

use crate::hashing::HashMap;
use crate::population::Position;

type Cell = (i64, i64);

/// A candidate returned by [`SpatialGrid::nearest_first`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f64,
}

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f64,
    cells: HashMap<Cell, Vec<usize>>,
}

impl SpatialGrid {
    /// Buckets every position by index.
    ///
    /// `cell_size` must be positive and finite.
    #[must_use]
    pub fn build(positions: &[Position], cell_size: f64) -> Self {
        debug_assert!(cell_size > 0.0 && cell_size.is_finite());
        let mut grid = SpatialGrid {
            cell_size,
            cells: HashMap::default(),
        };
        for (index, position) in positions.iter().enumerate() {
            let cell = grid.cell_of(position);
            grid.cells.entry(cell).or_default().push(index);
        }
        grid
    }

    fn cell_of(&self, position: &Position) -> Cell {
        (
            (position.x / self.cell_size).floor() as i64,
            (position.y / self.cell_size).floor() as i64,
        )
    }

    /// Every indexed agent that may lie within `cell_size` of `center`, sorted by ascending
    /// distance with ties broken by index. `positions` must be the slice the grid was built from.
    #[must_use]
    pub fn nearest_first(&self, positions: &[Position], center: &Position) -> Vec<Neighbor> {
        let (cx, cy) = self.cell_of(center);
        let mut found = Vec::new();
        // Cell coordinates saturate for tiny cells or remote points, so clamp the block too.
        for x in cx.saturating_sub(1)..=cx.saturating_add(1) {
            for y in cy.saturating_sub(1)..=cy.saturating_add(1) {
                let Some(members) = self.cells.get(&(x, y)) else {
                    continue;
                };
                found.extend(members.iter().map(|&index| Neighbor {
                    index,
                    distance: center.distance_to(&positions[index]),
                }));
            }
        }
        found.sort_unstable_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.index.cmp(&b.index))
        });
        found
    }
}
