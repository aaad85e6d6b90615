#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state management for Ball Drop.

mod grid;

use ball_drop_core::{Command, Event};
use ball_drop_system_column_feed::ColumnFeeds;
use tracing::{debug, info};

pub use grid::{CollapseOutcome, Grid};

/// Represents the authoritative Ball Drop board state.
///
/// The world exclusively owns the grid together with the per-column
/// generators that feed it.
#[derive(Debug)]
pub struct World {
    seed: String,
    grid: Grid,
    feeds: ColumnFeeds,
}

impl World {
    /// Creates a fully populated world for the provided seed.
    ///
    /// Reconstructing a world with the same arguments reproduces the same
    /// board.
    #[must_use]
    pub fn new(seed: &str, grid_size: u32, color_variants: u32) -> Self {
        let mut feeds = ColumnFeeds::for_seed(seed, grid_size);
        let grid = Grid::populated(grid_size, color_variants, &mut feeds);
        Self {
            seed: seed.to_owned(),
            grid,
            feeds,
        }
    }

    /// Creates a world around a prepared grid, fed by fresh generators for `seed`.
    #[must_use]
    pub fn from_grid(seed: &str, grid: Grid) -> Self {
        Self {
            seed: seed.to_owned(),
            feeds: ColumnFeeds::for_seed(seed, grid.size()),
            grid,
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SelectToken { cell } => {
            if !world.grid.select(cell) {
                debug!(%cell, "token was already selected or missing");
                return;
            }
            if let Some(color) = world.grid.cell(cell).and_then(|contents| contents.color()) {
                out_events.push(Event::TokenSelected { cell, color });
            }
        }
        Command::DeselectAll => {
            let count = world.grid.deselect_all();
            if count > 0 {
                out_events.push(Event::SelectionCleared { count });
            }
        }
        Command::SelectAllOfColor { color } => {
            let count = world.grid.select_all_of_color(color);
            out_events.push(Event::ColorSelected { color, count });
        }
        Command::Collapse => {
            let outcome = world.grid.collapse(&mut world.feeds);
            info!(
                removed = outcome.removed,
                refilled_columns = outcome.refilled.len(),
                "collapsed board"
            );
            out_events.push(Event::TokensRemoved {
                count: outcome.removed,
            });
            out_events.extend(
                outcome
                    .refilled
                    .into_iter()
                    .map(|(column, count)| Event::ColumnRefilled { column, count }),
            );
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use ball_drop_core::{CellCoord, CellSnapshot, GridView};

    use super::{Grid, World};

    /// Seed the world's generators were derived from.
    #[must_use]
    pub fn seed(world: &World) -> &str {
        &world.seed
    }

    /// Provides read-only access to the grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Exposes a read-only view of the dense cell grid.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        world.grid.view()
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(world: &World) -> impl Iterator<Item = CellSnapshot> + '_ {
        world.grid.traverse()
    }

    /// Enumerates the anchors of every fully selected 2x2 block, row-major.
    #[must_use]
    pub fn selected_squares(world: &World) -> Vec<CellCoord> {
        let last = world.grid.size().saturating_sub(1);
        (0..last)
            .flat_map(|row| (0..last).map(move |column| CellCoord::new(row, column)))
            .filter(|anchor| world.grid.is_fully_selected_square(*anchor))
            .collect()
    }
}
