use serde::{Deserialize, Serialize};

use crate::{CellCoord, PixelPosition};

/// Fraction of a bounding box covered by a token's diameter.
const TOKEN_FILL_RATIO: f64 = 0.75;

/// Geometry that maps grid cells onto a square pixel canvas.
///
/// Only the three configuration values are stored. Every derived quantity is
/// recomputed on demand, so replacing the sizing is the only way to change
/// the board's geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSizing {
    num_items: u32,
    board_size_in_pixels: u32,
    has_standard_margin: bool,
}

impl BoardSizing {
    /// Creates a sizing for a square board of `num_items` cells per side.
    ///
    /// With `has_standard_margin`, half a bounding box is reserved around the
    /// outside of the grid.
    #[must_use]
    pub const fn new(num_items: u32, board_size_in_pixels: u32, has_standard_margin: bool) -> Self {
        Self {
            num_items,
            board_size_in_pixels,
            has_standard_margin,
        }
    }

    /// Creates a sizing that fits the board inside a `width` x `height` canvas.
    #[must_use]
    pub fn for_canvas(num_items: u32, width: u32, height: u32, has_standard_margin: bool) -> Self {
        Self::new(num_items, width.min(height), has_standard_margin)
    }

    /// Number of cells along each side of the board.
    #[must_use]
    pub const fn num_items(&self) -> u32 {
        self.num_items
    }

    /// Side length of the square board in pixels.
    #[must_use]
    pub const fn board_size_in_pixels(&self) -> u32 {
        self.board_size_in_pixels
    }

    /// Whether half a bounding box of outer margin is reserved.
    #[must_use]
    pub const fn has_standard_margin(&self) -> bool {
        self.has_standard_margin
    }

    /// Side length of the square pixel area allotted to a single cell.
    #[must_use]
    pub const fn bounding_box_size(&self) -> u32 {
        let slots = if self.has_standard_margin {
            self.num_items.saturating_add(1)
        } else {
            self.num_items
        };
        if slots == 0 {
            return 0;
        }
        self.board_size_in_pixels / slots
    }

    /// Diameter of a drawn token in pixels.
    #[must_use]
    pub fn token_diameter(&self) -> u32 {
        (f64::from(self.bounding_box_size()) * TOKEN_FILL_RATIO).round() as u32
    }

    /// Radius of a drawn token in pixels.
    #[must_use]
    pub fn token_radius(&self) -> f32 {
        self.token_diameter() as f32 / 2.0
    }

    /// Offset applied to both axes before the first cell.
    #[must_use]
    pub fn edge_offset(&self) -> f32 {
        if self.has_standard_margin {
            self.bounding_box_size() as f32 / 2.0
        } else {
            0.0
        }
    }

    /// Resolves a pixel position to the cell under it.
    ///
    /// Returns `None` for positions outside the grid, including negative and
    /// non-finite coordinates. Callers treat `None` as an ignorable event.
    #[must_use]
    pub fn pixel_to_grid(&self, x: f32, y: f32) -> Option<CellCoord> {
        let row = self.axis_index(y)?;
        let column = self.axis_index(x)?;
        Some(CellCoord::new(row, column))
    }

    /// Pixel anchor of the provided cell.
    ///
    /// For in-range cells this inverts [`pixel_to_grid`](Self::pixel_to_grid).
    #[must_use]
    pub fn grid_to_pixel(&self, cell: CellCoord) -> PixelPosition {
        let bounding_box = self.bounding_box_size() as f32;
        let offset = self.edge_offset();
        PixelPosition::new(
            offset + cell.column() as f32 * bounding_box,
            offset + cell.row() as f32 * bounding_box,
        )
    }

    fn axis_index(&self, value: f32) -> Option<u32> {
        let bounding_box = self.bounding_box_size();
        if bounding_box == 0 || !value.is_finite() {
            return None;
        }

        let index = (f64::from(value) / f64::from(bounding_box)).floor();
        if index < 0.0 || index >= f64::from(self.num_items) {
            return None;
        }
        Some(index as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::BoardSizing;
    use crate::CellCoord;
    use proptest::prelude::*;

    #[test]
    fn reference_board_geometry() {
        let sizing = BoardSizing::new(15, 600, true);
        assert_eq!(sizing.bounding_box_size(), 37);
        assert_eq!(sizing.token_diameter(), 28);
        assert!((sizing.token_radius() - 14.0).abs() < f32::EPSILON);
        assert!((sizing.edge_offset() - 18.5).abs() < f32::EPSILON);
    }

    #[test]
    fn margin_free_board_starts_at_origin() {
        let sizing = BoardSizing::new(10, 400, false);
        assert_eq!(sizing.bounding_box_size(), 40);
        assert_eq!(sizing.token_diameter(), 30);
        assert_eq!(sizing.edge_offset(), 0.0);
        let anchor = sizing.grid_to_pixel(CellCoord::new(2, 3));
        assert_eq!((anchor.x, anchor.y), (120.0, 80.0));
    }

    #[test]
    fn canvas_sizing_uses_shorter_side() {
        let sizing = BoardSizing::for_canvas(15, 1024, 640, true);
        assert_eq!(sizing.board_size_in_pixels(), 640);
        assert_eq!(sizing.num_items(), 15);
        assert!(sizing.has_standard_margin());
    }

    #[test]
    fn pixel_to_grid_floors_into_cells() {
        let sizing = BoardSizing::new(5, 100, false);
        assert_eq!(sizing.pixel_to_grid(0.0, 0.0), Some(CellCoord::new(0, 0)));
        assert_eq!(sizing.pixel_to_grid(39.9, 20.0), Some(CellCoord::new(1, 1)));
        assert_eq!(sizing.pixel_to_grid(99.9, 0.5), Some(CellCoord::new(0, 4)));
    }

    #[test]
    fn pixel_to_grid_rejects_out_of_bounds_positions() {
        let sizing = BoardSizing::new(5, 100, false);
        assert_eq!(sizing.pixel_to_grid(100.0, 0.0), None);
        assert_eq!(sizing.pixel_to_grid(0.0, 100.0), None);
        assert_eq!(sizing.pixel_to_grid(-0.1, 5.0), None);
        assert_eq!(sizing.pixel_to_grid(5.0, f32::NAN), None);
        assert_eq!(sizing.pixel_to_grid(f32::INFINITY, 5.0), None);
    }

    #[test]
    fn degenerate_sizing_never_resolves_cells() {
        let tiny = BoardSizing::new(15, 10, true);
        assert_eq!(tiny.bounding_box_size(), 0);
        assert_eq!(tiny.pixel_to_grid(0.0, 0.0), None);

        let empty = BoardSizing::new(0, 600, false);
        assert_eq!(empty.bounding_box_size(), 0);
        assert_eq!(empty.pixel_to_grid(1.0, 1.0), None);
    }

    proptest! {
        #[test]
        fn grid_to_pixel_round_trips(
            num_items in 1u32..40,
            board in 0u32..4000,
            margin in any::<bool>(),
            row_seed in any::<u32>(),
            column_seed in any::<u32>(),
        ) {
            let sizing = BoardSizing::new(num_items, board, margin);
            prop_assume!(sizing.bounding_box_size() > 0);

            let cell = CellCoord::new(row_seed % num_items, column_seed % num_items);
            let anchor = sizing.grid_to_pixel(cell);
            prop_assert_eq!(sizing.pixel_to_grid(anchor.x, anchor.y), Some(cell));
        }
    }
}
