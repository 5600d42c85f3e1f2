//! A fixed-capacity hospital.
//!
//! The hospital knows how many beds it has and where each bed is drawn. It does not track who
//! occupies a bed: occupancy is the number of isolated agents in the population, and the `i`-th
//! isolated agent is shown in bed `i`.

use crate::population::Position;

/// X coordinate of the first bed column.
pub const BED_ORIGIN_X: f64 = 400.0;
/// Y coordinate of the first bed row.
pub const BED_ORIGIN_Y: f64 = -200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hospital {
    width: usize,
    capacity: usize,
}

impl Hospital {
    /// A hospital of `width * height` beds laid out row by row, starting at
    /// (`BED_ORIGIN_X`, `BED_ORIGIN_Y`) with unit spacing. Bed coordinates are computed on demand.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Hospital {
            width,
            capacity: width.saturating_mul(height),
        }
    }

    /// Total number of beds. Isolated agents never outnumber it.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The coordinate of bed `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.capacity()`.
    #[must_use]
    pub fn bed_position(&self, index: usize) -> Position {
        assert!(
            index < self.capacity,
            "bed index {index} out of range for a hospital with {} beds",
            self.capacity
        );
        Position {
            x: BED_ORIGIN_X + (index % self.width) as f64,
            y: BED_ORIGIN_Y + (index / self.width) as f64,
        }
    }

    /// The coordinates of the first `count` beds, in bed order.
    ///
    /// # Panics
    ///
    /// Panics if `count > self.capacity()`.
    #[must_use]
    pub fn first_beds(&self, count: usize) -> Vec<Position> {
        (0..count).map(|index| self.bed_position(index)).collect()
    }
}
