#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure drag-path selection system.
//!
//! The system follows a single pointer at a time. A drag starts on any
//! token and grows one orthogonal step at a time through unselected tokens
//! of the same color. Only the tail of the path is tracked; path membership
//! lives in the grid's selection flags. Releasing the pointer requests a
//! collapse, and cancelling it clears the selection.

use ball_drop_core::{
    BoardSizing, Cell, CellCoord, Command, GridView, PixelPosition, PointerId, PointerInput,
};
use thiserror::Error;
use tracing::{debug, trace};

/// Record of the drag currently in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActiveTouch {
    pointer: PointerId,
    start: CellCoord,
    tail: CellCoord,
}

impl ActiveTouch {
    /// Pointer that owns the drag.
    #[must_use]
    pub const fn pointer(&self) -> PointerId {
        self.pointer
    }

    /// Cell where the drag started.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Most recently added cell of the path.
    #[must_use]
    pub const fn tail(&self) -> CellCoord {
        self.tail
    }
}

/// Phases of the selection state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SelectionState {
    /// No drag is in progress.
    #[default]
    Idle,
    /// A pointer is dragging a path across the board.
    Dragging(ActiveTouch),
}

/// Internal-consistency failures detected while interpreting pointer input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The tail of the active drag no longer references a token.
    #[error("drag tail {tail} does not reference a token")]
    TailNotToken {
        /// Tail cell recorded for the active drag.
        tail: CellCoord,
    },
}

/// Pointer-driven selection system that emits grid commands.
#[derive(Clone, Debug, Default)]
pub struct PathSelection {
    state: SelectionState,
}

impl PathSelection {
    /// Creates an idle selection system.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: SelectionState::Idle,
        }
    }

    /// Current phase of the state machine.
    #[must_use]
    pub const fn state(&self) -> SelectionState {
        self.state
    }

    /// Drag currently in progress, if any.
    #[must_use]
    pub const fn active_touch(&self) -> Option<ActiveTouch> {
        match self.state {
            SelectionState::Idle => None,
            SelectionState::Dragging(touch) => Some(touch),
        }
    }

    /// Reports whether a drag is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, SelectionState::Dragging(_))
    }

    /// Consumes a pointer input and emits the resulting grid commands.
    ///
    /// `grid` must reflect every command emitted by earlier calls. Inputs
    /// that do not apply to the current state are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::TailNotToken`] when the active drag's tail
    /// no longer holds a token. The drag state is left untouched.
    pub fn handle(
        &mut self,
        input: PointerInput,
        sizing: &BoardSizing,
        grid: GridView<'_>,
        out: &mut Vec<Command>,
    ) -> Result<(), SelectionError> {
        match input {
            PointerInput::Down { pointer, position } => {
                self.pointer_down(pointer, position, sizing, grid, out);
                Ok(())
            }
            PointerInput::Move { pointer, position } => {
                self.pointer_move(pointer, position, sizing, grid, out)
            }
            PointerInput::Up { pointer, .. } => {
                self.pointer_up(pointer, out);
                Ok(())
            }
            PointerInput::Cancel { pointer } => {
                self.pointer_cancel(pointer, out);
                Ok(())
            }
        }
    }

    fn pointer_down(
        &mut self,
        pointer: PointerId,
        position: PixelPosition,
        sizing: &BoardSizing,
        grid: GridView<'_>,
        out: &mut Vec<Command>,
    ) {
        if let SelectionState::Dragging(touch) = self.state {
            debug!(
                %pointer,
                active = %touch.pointer,
                "ignoring pointer down while another drag is active"
            );
            return;
        }

        let Some(cell) = sizing.pixel_to_grid(position.x, position.y) else {
            debug!(%pointer, x = position.x, y = position.y, "pointer down outside the board");
            return;
        };

        match grid.cell(cell) {
            Some(Cell::Token(_)) => {}
            _ => {
                debug!(%pointer, %cell, "pointer down on an empty cell");
                return;
            }
        }

        out.push(Command::DeselectAll);
        out.push(Command::SelectToken { cell });
        self.state = SelectionState::Dragging(ActiveTouch {
            pointer,
            start: cell,
            tail: cell,
        });
        trace!(%pointer, %cell, "drag started");
    }

    fn pointer_move(
        &mut self,
        pointer: PointerId,
        position: PixelPosition,
        sizing: &BoardSizing,
        grid: GridView<'_>,
        out: &mut Vec<Command>,
    ) -> Result<(), SelectionError> {
        let SelectionState::Dragging(touch) = &mut self.state else {
            debug!(%pointer, "pointer move without an active drag");
            return Ok(());
        };
        if touch.pointer != pointer {
            debug!(%pointer, active = %touch.pointer, "ignoring move from a non-active pointer");
            return Ok(());
        }

        let Some(cell) = sizing.pixel_to_grid(position.x, position.y) else {
            debug!(%pointer, x = position.x, y = position.y, "pointer move outside the board");
            return Ok(());
        };

        let tail = match grid.cell(touch.tail) {
            Some(Cell::Token(token)) => token,
            _ => return Err(SelectionError::TailNotToken { tail: touch.tail }),
        };

        let rejection = match grid.cell(cell) {
            Some(Cell::Token(candidate)) if candidate.selected => Some("already selected"),
            Some(Cell::Token(candidate)) if candidate.color != tail.color => {
                Some("color differs from tail")
            }
            Some(Cell::Token(_)) if !touch.tail.is_orthogonal_neighbor(cell) => {
                Some("not adjacent to tail")
            }
            Some(Cell::Token(_)) => None,
            _ => Some("empty cell"),
        };
        if let Some(reason) = rejection {
            debug!(%pointer, tail = %touch.tail, %cell, reason, "rejected path extension");
            return Ok(());
        }

        out.push(Command::SelectToken { cell });
        touch.tail = cell;
        trace!(%pointer, %cell, "path extended");
        Ok(())
    }

    fn pointer_up(&mut self, pointer: PointerId, out: &mut Vec<Command>) {
        match self.state {
            SelectionState::Dragging(touch) if touch.pointer == pointer => {
                out.push(Command::Collapse);
                self.state = SelectionState::Idle;
            }
            SelectionState::Dragging(touch) => {
                debug!(%pointer, active = %touch.pointer, "ignoring release of a non-active pointer");
            }
            SelectionState::Idle => {
                debug!(%pointer, "pointer up without an active drag");
            }
        }
    }

    fn pointer_cancel(&mut self, pointer: PointerId, out: &mut Vec<Command>) {
        match self.state {
            SelectionState::Dragging(touch) if touch.pointer == pointer => {
                out.push(Command::DeselectAll);
                self.state = SelectionState::Idle;
                debug!(%pointer, "drag cancelled");
            }
            SelectionState::Dragging(touch) => {
                debug!(%pointer, active = %touch.pointer, "ignoring cancel of a non-active pointer");
            }
            SelectionState::Idle => {
                debug!(%pointer, "pointer cancel without an active drag");
            }
        }
    }
}
