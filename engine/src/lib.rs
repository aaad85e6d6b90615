#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Composition root that wires the Ball Drop world and systems together.
//!
//! Embedders construct an [`Engine`], forward pointer events through the
//! `on_pointer_*` entry points, and read [`Engine::for_each_cell`] together
//! with [`Engine::sizing`] every frame to draw the board.
//!
//! ```
//! use ball_drop_core::{BoardSizing, PointerId};
//! use ball_drop_engine::Engine;
//!
//! let sizing = BoardSizing::new(15, 600, true);
//! let mut engine = Engine::new(15, 5, sizing, "2024-4-9")?;
//!
//! let finger = PointerId::new(0);
//! let _ = engine.on_pointer_down(20.0, 20.0, finger)?;
//! let _ = engine.on_pointer_up(20.0, 20.0, finger)?;
//!
//! assert!(engine.for_each_cell().all(|snapshot| !snapshot.cell.is_empty()));
//! # Ok::<(), ball_drop_engine::EngineError>(())
//! ```

mod config;

use ball_drop_core::{
    BoardSizing, CellCoord, CellSnapshot, Command, Event, PixelPosition, PointerId, PointerInput,
    TokenColor, MAX_COLOR_VARIANTS, MAX_GRID_SIZE,
};
use ball_drop_system_path_selection::{ActiveTouch, PathSelection, SelectionError};
use ball_drop_world::{self as world, query, Grid, World};
use thiserror::Error;
use tracing::{debug, error, info};

pub use config::{ConfigError, EngineConfig};

/// Errors reported by the engine.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The grid size is outside the supported range.
    #[error("grid size must be between 1 and {max} (received {received})")]
    InvalidGridSize {
        /// Grid size that failed validation.
        received: u32,
        /// Largest supported grid size.
        max: u32,
    },
    /// The color count is outside the supported range.
    #[error("color variants must be between 1 and {max} (received {received})")]
    InvalidColorVariants {
        /// Color count that failed validation.
        received: u32,
        /// Largest supported color count.
        max: u32,
    },
    /// The board sizing describes a different number of cells than the grid.
    #[error("board sizing lays out {sizing} cells per side but the grid has {grid}")]
    SizingMismatch {
        /// Cells per side of the grid.
        grid: u32,
        /// Cells per side described by the sizing.
        sizing: u32,
    },
    /// The selection state machine detected a broken invariant.
    #[error("selection invariant violated: {0}")]
    Selection(#[from] SelectionError),
}

/// Ball Drop game engine for a single board.
#[derive(Debug)]
pub struct Engine {
    world: World,
    sizing: BoardSizing,
    selection: PathSelection,
    color_variants: u32,
}

impl Engine {
    /// Creates a fully populated board.
    ///
    /// Constructing an engine twice with the same arguments yields the same
    /// initial board.
    ///
    /// # Errors
    ///
    /// Rejects a grid size or color count outside `1..=256`, and a sizing
    /// laid out for a different grid size.
    pub fn new(
        grid_size: u32,
        color_variants: u32,
        sizing: BoardSizing,
        seed: &str,
    ) -> Result<Self, EngineError> {
        if grid_size == 0 || grid_size > MAX_GRID_SIZE {
            return Err(EngineError::InvalidGridSize {
                received: grid_size,
                max: MAX_GRID_SIZE,
            });
        }
        if color_variants == 0 || color_variants > MAX_COLOR_VARIANTS {
            return Err(EngineError::InvalidColorVariants {
                received: color_variants,
                max: MAX_COLOR_VARIANTS,
            });
        }
        ensure_sizing_matches(grid_size, &sizing)?;

        info!(seed, grid_size, color_variants, "creating board");
        Ok(Self {
            world: World::new(seed, grid_size, color_variants),
            sizing,
            selection: PathSelection::new(),
            color_variants,
        })
    }

    /// Forwards a single pointer input and returns the resulting events.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Selection`] when the drag state no longer
    /// matches the board. The engine cannot recover from this.
    pub fn handle_pointer(&mut self, input: PointerInput) -> Result<Vec<Event>, EngineError> {
        let mut commands = Vec::new();
        if let Err(violation) = self.selection.handle(
            input,
            &self.sizing,
            query::grid_view(&self.world),
            &mut commands,
        ) {
            error!(%violation, "selection invariant violated");
            return Err(violation.into());
        }

        let mut events = Vec::new();
        self.execute(commands, &mut events);
        Ok(events)
    }

    /// Forwards a batch of changed pointers in order.
    ///
    /// # Errors
    ///
    /// Stops at the first input that fails; see [`Engine::handle_pointer`].
    pub fn handle_batch<I>(&mut self, inputs: I) -> Result<Vec<Event>, EngineError>
    where
        I: IntoIterator<Item = PointerInput>,
    {
        let mut events = Vec::new();
        for input in inputs {
            events.extend(self.handle_pointer(input)?);
        }
        Ok(events)
    }

    /// A pointer made contact at the provided canvas pixel.
    ///
    /// # Errors
    ///
    /// See [`Engine::handle_pointer`].
    pub fn on_pointer_down(
        &mut self,
        x: f32,
        y: f32,
        pointer: PointerId,
    ) -> Result<Vec<Event>, EngineError> {
        self.handle_pointer(PointerInput::Down {
            pointer,
            position: PixelPosition::new(x, y),
        })
    }

    /// A pointer in contact moved to the provided canvas pixel.
    ///
    /// # Errors
    ///
    /// See [`Engine::handle_pointer`].
    pub fn on_pointer_move(
        &mut self,
        x: f32,
        y: f32,
        pointer: PointerId,
    ) -> Result<Vec<Event>, EngineError> {
        self.handle_pointer(PointerInput::Move {
            pointer,
            position: PixelPosition::new(x, y),
        })
    }

    /// A pointer lifted off at the provided canvas pixel.
    ///
    /// # Errors
    ///
    /// See [`Engine::handle_pointer`].
    pub fn on_pointer_up(
        &mut self,
        x: f32,
        y: f32,
        pointer: PointerId,
    ) -> Result<Vec<Event>, EngineError> {
        self.handle_pointer(PointerInput::Up {
            pointer,
            position: PixelPosition::new(x, y),
        })
    }

    /// The platform aborted the pointer's interaction.
    ///
    /// # Errors
    ///
    /// See [`Engine::handle_pointer`].
    pub fn on_pointer_cancel(&mut self, pointer: PointerId) -> Result<Vec<Event>, EngineError> {
        self.handle_pointer(PointerInput::Cancel { pointer })
    }

    /// Selects every token of `color`.
    ///
    /// Ignored while a drag is in progress.
    pub fn select_all_of_color(&mut self, color: TokenColor) -> Vec<Event> {
        let mut events = Vec::new();
        if self.selection.is_dragging() {
            debug!(color = color.get(), "ignoring color selection during a drag");
            return events;
        }
        self.execute(vec![Command::SelectAllOfColor { color }], &mut events);
        events
    }

    /// Snapshot of every cell in row-major order.
    pub fn for_each_cell(&self) -> impl Iterator<Item = CellSnapshot> + '_ {
        query::cells(&self.world)
    }

    /// Geometry used to map cells to canvas pixels.
    #[must_use]
    pub const fn sizing(&self) -> &BoardSizing {
        &self.sizing
    }

    /// Swaps in new geometry, for example after the canvas was resized.
    ///
    /// # Errors
    ///
    /// Rejects a sizing laid out for a different grid size.
    pub fn replace_sizing(&mut self, sizing: BoardSizing) -> Result<(), EngineError> {
        ensure_sizing_matches(self.grid_size(), &sizing)?;
        self.sizing = sizing;
        Ok(())
    }

    /// Read-only access to the board.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        query::grid(&self.world)
    }

    /// Seed the board was generated from.
    #[must_use]
    pub fn seed(&self) -> &str {
        query::seed(&self.world)
    }

    /// Number of rows and columns.
    #[must_use]
    pub fn grid_size(&self) -> u32 {
        self.grid().size()
    }

    /// Number of distinct token colors.
    #[must_use]
    pub const fn color_variants(&self) -> u32 {
        self.color_variants
    }

    /// Drag currently in progress, if any.
    #[must_use]
    pub const fn active_touch(&self) -> Option<ActiveTouch> {
        self.selection.active_touch()
    }

    /// Reports whether a drag is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.selection.is_dragging()
    }

    /// Anchors of every fully selected 2x2 block.
    #[must_use]
    pub fn selected_squares(&self) -> Vec<CellCoord> {
        query::selected_squares(&self.world)
    }

    fn execute(&mut self, commands: Vec<Command>, events: &mut Vec<Event>) {
        for command in commands {
            world::apply(&mut self.world, command, events);
        }
    }
}

fn ensure_sizing_matches(grid_size: u32, sizing: &BoardSizing) -> Result<(), EngineError> {
    if sizing.num_items() != grid_size {
        return Err(EngineError::SizingMismatch {
            grid: grid_size,
            sizing: sizing.num_items(),
        });
    }
    Ok(())
}
