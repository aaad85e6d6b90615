#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Ball Drop engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters forward [`PointerInput`]
//! values, systems inspect an immutable [`GridView`] and respond with
//! [`Command`] batches, and the world executes those commands before
//! broadcasting [`Event`] values describing what changed.

mod sizing;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use sizing::BoardSizing;

/// Number of rows and columns used by the reference board.
pub const DEFAULT_GRID_SIZE: u32 = 15;

/// Number of token colors used by the reference board.
pub const DEFAULT_COLOR_VARIANTS: u32 = 5;

/// Largest number of color variants a board may be configured with.
pub const MAX_COLOR_VARIANTS: u32 = 256;

/// Largest number of rows and columns a board may be configured with.
pub const MAX_GRID_SIZE: u32 = 256;

/// Palette index identifying the color of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenColor(u32);

impl TokenColor {
    /// Creates a new color index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric palette index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Colored, selectable occupant of a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// Palette index of the token.
    pub color: TokenColor,
    /// Whether the token is part of the current selection.
    pub selected: bool,
}

impl Token {
    /// Creates an unselected token of the provided color.
    #[must_use]
    pub const fn new(color: TokenColor) -> Self {
        Self {
            color,
            selected: false,
        }
    }
}

/// Contents of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Cell holding a token.
    Token(Token),
    /// Cleared cell waiting for gravity and refill.
    Empty,
}

impl Cell {
    /// Creates a cell holding an unselected token of the provided color.
    #[must_use]
    pub const fn token(color: TokenColor) -> Self {
        Self::Token(Token::new(color))
    }

    /// Returns the token stored in the cell, if any.
    #[must_use]
    pub const fn as_token(&self) -> Option<Token> {
        match self {
            Self::Token(token) => Some(*token),
            Self::Empty => None,
        }
    }

    /// Reports whether the cell has been cleared.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Reports whether the cell holds a selected token.
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        matches!(self, Self::Token(Token { selected: true, .. }))
    }

    /// Color of the token in the cell, if any.
    #[must_use]
    pub const fn color(&self) -> Option<TokenColor> {
        match self {
            Self::Token(token) => Some(token.color),
            Self::Empty => None,
        }
    }
}

/// Location of a single grid cell expressed as row and column coordinates.
///
/// Row zero is the top of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.row().abs_diff(other.row()) + self.column().abs_diff(other.column())
    }

    /// Reports whether `other` shares an edge with this cell.
    ///
    /// Diagonal cells and the cell itself are not neighbors.
    #[must_use]
    pub fn is_orthogonal_neighbor(self, other: CellCoord) -> bool {
        self.manhattan_distance(other) == 1
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Position on the canvas measured in pixels from its upper-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPosition {
    /// Horizontal offset in pixels.
    pub x: f32,
    /// Vertical offset in pixels.
    pub y: f32,
}

impl PixelPosition {
    /// Creates a new pixel position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Identifier the platform assigns to a pointer or touch contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointerId(u64);

impl PointerId {
    /// Creates a new pointer identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PointerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four pointer event classifications understood by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerKind {
    /// A pointer made contact with the board.
    Down,
    /// A pointer in contact moved.
    Move,
    /// A pointer lifted off the board.
    Up,
    /// The platform aborted the pointer interaction.
    Cancel,
}

impl FromStr for PointerKind {
    type Err = UnknownPointerKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "down" | "pointerdown" | "touchstart" => Ok(Self::Down),
            "move" | "pointermove" | "touchmove" => Ok(Self::Move),
            "up" | "pointerup" | "touchend" => Ok(Self::Up),
            "cancel" | "pointercancel" | "touchcancel" => Ok(Self::Cancel),
            _ => Err(UnknownPointerKind {
                kind: value.to_owned(),
            }),
        }
    }
}

/// Raised when an adapter supplies a pointer classification outside the four known kinds.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown pointer event kind `{kind}`")]
pub struct UnknownPointerKind {
    /// Classification string that failed to parse.
    pub kind: String,
}

/// Pointer events translated by adapters into board-relative pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PointerInput {
    /// A pointer made contact at the provided position.
    Down {
        /// Pointer that made contact.
        pointer: PointerId,
        /// Contact position relative to the board canvas.
        position: PixelPosition,
    },
    /// A pointer in contact moved to the provided position.
    Move {
        /// Pointer that moved.
        pointer: PointerId,
        /// Updated position relative to the board canvas.
        position: PixelPosition,
    },
    /// A pointer lifted off at the provided position.
    Up {
        /// Pointer that lifted.
        pointer: PointerId,
        /// Final position relative to the board canvas.
        position: PixelPosition,
    },
    /// The platform aborted the interaction for the pointer.
    Cancel {
        /// Pointer whose interaction was aborted.
        pointer: PointerId,
    },
}

impl PointerInput {
    /// Builds an input from its classification.
    ///
    /// The position is ignored for [`PointerKind::Cancel`].
    #[must_use]
    pub const fn from_kind(kind: PointerKind, pointer: PointerId, position: PixelPosition) -> Self {
        match kind {
            PointerKind::Down => Self::Down { pointer, position },
            PointerKind::Move => Self::Move { pointer, position },
            PointerKind::Up => Self::Up { pointer, position },
            PointerKind::Cancel => Self::Cancel { pointer },
        }
    }

    /// Classification of the input.
    #[must_use]
    pub const fn kind(&self) -> PointerKind {
        match self {
            Self::Down { .. } => PointerKind::Down,
            Self::Move { .. } => PointerKind::Move,
            Self::Up { .. } => PointerKind::Up,
            Self::Cancel { .. } => PointerKind::Cancel,
        }
    }

    /// Pointer that produced the input.
    #[must_use]
    pub const fn pointer(&self) -> PointerId {
        match self {
            Self::Down { pointer, .. }
            | Self::Move { pointer, .. }
            | Self::Up { pointer, .. }
            | Self::Cancel { pointer } => *pointer,
        }
    }

    /// Position carried by the input, if the classification has one.
    #[must_use]
    pub const fn position(&self) -> Option<PixelPosition> {
        match self {
            Self::Down { position, .. } | Self::Move { position, .. } | Self::Up { position, .. } => {
                Some(*position)
            }
            Self::Cancel { .. } => None,
        }
    }
}

/// Commands that express all permissible board mutations.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Marks the token in the provided cell as selected.
    SelectToken {
        /// Cell holding the token to select.
        cell: CellCoord,
    },
    /// Clears the selection flag on every token.
    DeselectAll,
    /// Marks every token of the provided color as selected.
    SelectAllOfColor {
        /// Color whose tokens should be selected.
        color: TokenColor,
    },
    /// Removes selected tokens, applies gravity, and refills every column.
    Collapse,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Confirms that a token joined the selection.
    TokenSelected {
        /// Cell holding the selected token.
        cell: CellCoord,
        /// Color of the selected token.
        color: TokenColor,
    },
    /// Reports that the selection was cleared.
    SelectionCleared {
        /// Number of tokens that were selected before clearing.
        count: u32,
    },
    /// Reports that every token of a color was selected.
    ColorSelected {
        /// Color that was selected.
        color: TokenColor,
        /// Number of tokens of that color on the board.
        count: u32,
    },
    /// Reports how many selected tokens a collapse removed.
    TokensRemoved {
        /// Number of cells that became empty.
        count: u32,
    },
    /// Reports that a column received fresh tokens from its generator.
    ColumnRefilled {
        /// Column that was refilled.
        column: u32,
        /// Number of tokens fed into the top of the column.
        count: u32,
    },
}

/// Read-only row/column snapshot of a single cell handed to renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellSnapshot {
    /// Contents of the cell.
    pub cell: Cell,
    /// Zero-based row index.
    pub row: u32,
    /// Zero-based column index.
    pub column: u32,
}

impl CellSnapshot {
    /// Coordinate of the captured cell.
    #[must_use]
    pub const fn coord(&self) -> CellCoord {
        CellCoord::new(self.row, self.column)
    }
}

/// Read-only view into the dense row-major cell grid.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    cells: &'a [Cell],
    size: u32,
}

impl<'a> GridView<'a> {
    /// Captures a new grid view backed by the provided row-major cell slice.
    #[must_use]
    pub fn new(cells: &'a [Cell], size: u32) -> Self {
        Self { cells, size }
    }

    /// Number of rows and columns in the grid.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Returns the contents of the provided cell, or `None` when it lies off the grid.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<Cell> {
        self.index(cell).and_then(|index| self.cells.get(index).copied())
    }

    /// Reports whether the provided cell holds a selected token.
    #[must_use]
    pub fn is_selected(&self, cell: CellCoord) -> bool {
        self.cell(cell).map_or(false, |contents| contents.is_selected())
    }

    /// Iterates over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = CellSnapshot> + 'a {
        let size = self.size.max(1);
        self.cells
            .iter()
            .zip(0u32..)
            .map(move |(cell, index)| CellSnapshot {
                cell: *cell,
                row: index / size,
                column: index % size,
            })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.row() < self.size && cell.column() < self.size {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.size).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
