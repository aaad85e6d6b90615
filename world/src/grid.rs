//! Dense square cell storage and the mutations that drive a collapse.

use ball_drop_core::{Cell, CellCoord, CellSnapshot, GridView, Token, TokenColor};
use ball_drop_system_column_feed::{ColumnFeeds, ColumnGenerator};

/// Square board of cells stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,
    size: u32,
    color_variants: u32,
}

/// Summary of a completed collapse.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollapseOutcome {
    /// Number of selected tokens that were removed.
    pub removed: u32,
    /// `(column, count)` pairs for every column that received new tokens.
    pub refilled: Vec<(u32, u32)>,
}

impl Grid {
    /// Creates a grid whose every cell is empty.
    #[must_use]
    pub fn empty(size: u32, color_variants: u32) -> Self {
        let len = (size as usize).saturating_mul(size as usize);
        Self {
            cells: vec![Cell::Empty; len],
            size,
            color_variants,
        }
    }

    /// Creates a fully populated grid, feeding each column top to bottom
    /// from its generator.
    #[must_use]
    pub fn populated(size: u32, color_variants: u32, feeds: &mut ColumnFeeds) -> Self {
        let mut grid = Self::empty(size, color_variants);
        for column in 0..size {
            if let Some(generator) = feeds.column_mut(column) {
                let _ = grid.refill_column(column, generator);
            }
        }
        grid
    }

    /// Builds a grid from explicit rows, top row first.
    ///
    /// Returns `None` unless the rows form a square whose token colors all lie
    /// below `color_variants`.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<Cell>>, color_variants: u32) -> Option<Self> {
        let size = u32::try_from(rows.len()).ok()?;
        if rows.iter().any(|row| row.len() != rows.len()) {
            return None;
        }

        let cells: Vec<Cell> = rows.into_iter().flatten().collect();
        let colors_valid = cells
            .iter()
            .filter_map(Cell::color)
            .all(|color| color.get() < color_variants);
        if !colors_valid {
            return None;
        }

        Some(Self {
            cells,
            size,
            color_variants,
        })
    }

    /// Number of rows and columns.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Number of distinct token colors.
    #[must_use]
    pub const fn color_variants(&self) -> u32 {
        self.color_variants
    }

    /// Contents of the provided cell.
    ///
    /// # Panics
    ///
    /// Panics when `cell` lies outside the grid. Callers resolve coordinates
    /// through the board sizing first; use [`Grid::cell`] for unchecked input.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Cell {
        debug_assert!(cell.row() < self.size && cell.column() < self.size);
        self.cells[self.index(cell.row(), cell.column())]
    }

    /// Contents of the provided cell, or `None` when it lies outside the grid.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<Cell> {
        self.view().cell(cell)
    }

    /// Captures a read-only view for systems.
    #[must_use]
    pub fn view(&self) -> GridView<'_> {
        GridView::new(&self.cells, self.size)
    }

    /// Walks every cell in row-major order.
    ///
    /// Each call starts a fresh traversal.
    pub fn traverse(&self) -> impl Iterator<Item = CellSnapshot> + '_ {
        self.view().iter()
    }

    /// Marks the token in `cell` as selected.
    ///
    /// Returns `true` only when the token was not selected before. Empty and
    /// off-grid cells are left untouched.
    pub fn select(&mut self, cell: CellCoord) -> bool {
        if cell.row() >= self.size || cell.column() >= self.size {
            return false;
        }
        let index = self.index(cell.row(), cell.column());
        match &mut self.cells[index] {
            Cell::Token(token) if !token.selected => {
                token.selected = true;
                true
            }
            _ => false,
        }
    }

    /// Clears the selection flag on every token and returns how many were set.
    ///
    /// Empty cells carry no selection state and are skipped.
    pub fn deselect_all(&mut self) -> u32 {
        let mut cleared = 0;
        for cell in &mut self.cells {
            if let Cell::Token(token) = cell {
                if token.selected {
                    token.selected = false;
                    cleared += 1;
                }
            }
        }
        cleared
    }

    /// Selects every token of `color` and returns how many tokens carry it.
    pub fn select_all_of_color(&mut self, color: TokenColor) -> u32 {
        let mut matched = 0;
        for cell in &mut self.cells {
            if let Cell::Token(token) = cell {
                if token.color == color {
                    token.selected = true;
                    matched += 1;
                }
            }
        }
        matched
    }

    /// Turns every selected token into an empty cell and returns the count.
    pub fn remove_selected(&mut self) -> u32 {
        let mut removed = 0;
        for cell in &mut self.cells {
            if cell.is_selected() {
                *cell = Cell::Empty;
                removed += 1;
            }
        }
        removed
    }

    /// Pulls the tokens of `column` down over any empty cells.
    ///
    /// Tokens keep their relative order and every empty cell ends up in one
    /// contiguous run at the top of the column.
    pub fn compact_column(&mut self, column: u32) {
        if column >= self.size {
            return;
        }

        let mut write_row = self.size;
        for row in (0..self.size).rev() {
            let from = self.index(row, column);
            if self.cells[from].is_empty() {
                continue;
            }
            write_row -= 1;
            if write_row != row {
                let to = self.index(write_row, column);
                self.cells[to] = self.cells[from];
                self.cells[from] = Cell::Empty;
            }
        }
    }

    /// Feeds a fresh unselected token into every empty cell of `column`,
    /// top to bottom, and returns how many were fed.
    ///
    /// Run [`Grid::compact_column`] first so that the new tokens land above
    /// the survivors.
    pub fn refill_column(&mut self, column: u32, generator: &mut ColumnGenerator) -> u32 {
        if column >= self.size {
            return 0;
        }

        let mut fed = 0;
        for row in 0..self.size {
            let index = self.index(row, column);
            if self.cells[index].is_empty() {
                let color = generator.next_color(self.color_variants);
                self.cells[index] = Cell::Token(Token::new(color));
                fed += 1;
            }
        }
        fed
    }

    /// Removes the selection, applies gravity to every column, then refills
    /// every column from its generator.
    ///
    /// All columns are compacted before any column is refilled.
    pub fn collapse(&mut self, feeds: &mut ColumnFeeds) -> CollapseOutcome {
        let removed = self.remove_selected();
        for column in 0..self.size {
            self.compact_column(column);
        }

        let mut refilled = Vec::new();
        for column in 0..self.size {
            let Some(generator) = feeds.column_mut(column) else {
                continue;
            };
            let count = self.refill_column(column, generator);
            if count > 0 {
                refilled.push((column, count));
            }
        }

        CollapseOutcome { removed, refilled }
    }

    /// Reports whether the 2x2 block anchored at `anchor` is fully selected.
    ///
    /// Blocks that extend past the bottom or right edge are never selected.
    #[must_use]
    pub fn is_fully_selected_square(&self, anchor: CellCoord) -> bool {
        let view = self.view();
        let (row, column) = (anchor.row(), anchor.column());
        [
            CellCoord::new(row, column),
            CellCoord::new(row.saturating_add(1), column),
            CellCoord::new(row, column.saturating_add(1)),
            CellCoord::new(row.saturating_add(1), column.saturating_add(1)),
        ]
        .into_iter()
        .all(|cell| view.is_selected(cell))
    }

    /// Number of selected tokens on the board.
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_selected()).count()
    }

    /// Number of empty cells on the board.
    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_empty()).count()
    }

    fn index(&self, row: u32, column: u32) -> usize {
        row as usize * self.size as usize + column as usize
    }
}
