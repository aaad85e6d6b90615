use ball_drop_core::{
    BoardSizing, Cell, CellCoord, Event, PixelPosition, PointerId, PointerInput, TokenColor,
};
use ball_drop_system_path_selection::{PathSelection, SelectionState};
use ball_drop_world::{self as world, query, Grid, World};

const FINGER: PointerId = PointerId::new(1);
const OTHER_FINGER: PointerId = PointerId::new(2);

struct Harness {
    world: World,
    selection: PathSelection,
    sizing: BoardSizing,
}

impl Harness {
    /// Builds a board from color rows, top row first.
    fn with_colors(rows: &[&[u32]]) -> Self {
        let size = rows.len() as u32;
        let variants = rows.iter().flat_map(|row| row.iter()).max().map_or(1, |max| max + 1);
        let cells = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|color| Cell::token(TokenColor::new(*color)))
                    .collect()
            })
            .collect();
        let grid = Grid::from_rows(cells, variants).expect("square grid");
        Self {
            world: World::from_grid("path-selection", grid),
            selection: PathSelection::new(),
            sizing: BoardSizing::new(size, size * 10, false),
        }
    }

    fn send(&mut self, input: PointerInput) -> Vec<Event> {
        let mut commands = Vec::new();
        self.selection
            .handle(
                input,
                &self.sizing,
                query::grid_view(&self.world),
                &mut commands,
            )
            .expect("selection invariants hold");

        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        events
    }

    fn down(&mut self, pointer: PointerId, row: u32, column: u32) -> Vec<Event> {
        self.send(PointerInput::Down {
            pointer,
            position: center(row, column),
        })
    }

    fn drag(&mut self, pointer: PointerId, row: u32, column: u32) -> Vec<Event> {
        self.send(PointerInput::Move {
            pointer,
            position: center(row, column),
        })
    }

    fn up(&mut self, pointer: PointerId) -> Vec<Event> {
        self.send(PointerInput::Up {
            pointer,
            position: PixelPosition::default(),
        })
    }

    fn selected(&self) -> Vec<CellCoord> {
        query::cells(&self.world)
            .filter(|snapshot| snapshot.cell.is_selected())
            .map(|snapshot| snapshot.coord())
            .collect()
    }

    fn tail(&self) -> CellCoord {
        self.selection.active_touch().expect("drag in progress").tail()
    }
}

fn center(row: u32, column: u32) -> PixelPosition {
    PixelPosition::new(column as f32 * 10.0 + 5.0, row as f32 * 10.0 + 5.0)
}

#[test]
fn drag_extends_through_adjacent_same_colored_tokens() {
    let mut harness = Harness::with_colors(&[&[0, 0, 1], &[1, 0, 1], &[1, 1, 1]]);

    let _ = harness.down(FINGER, 0, 0);
    let events = harness.drag(FINGER, 0, 1);
    let _ = harness.drag(FINGER, 1, 1);

    assert_eq!(
        events,
        vec![Event::TokenSelected {
            cell: CellCoord::new(0, 1),
            color: TokenColor::new(0),
        }]
    );
    assert_eq!(
        harness.selected(),
        vec![
            CellCoord::new(0, 0),
            CellCoord::new(0, 1),
            CellCoord::new(1, 1),
        ]
    );
    assert_eq!(harness.tail(), CellCoord::new(1, 1));
}

#[test]
fn move_two_rows_away_is_rejected() {
    let mut harness = Harness::with_colors(&[&[0, 0, 0], &[0, 0, 0], &[0, 0, 0]]);
    let _ = harness.down(FINGER, 0, 0);
    let before = query::grid(&harness.world).clone();

    let events = harness.drag(FINGER, 2, 0);

    assert!(events.is_empty());
    assert_eq!(query::grid(&harness.world), &before);
    assert_eq!(harness.tail(), CellCoord::new(0, 0));
}

#[test]
fn diagonal_move_is_rejected() {
    let mut harness = Harness::with_colors(&[&[0, 0], &[0, 0]]);
    let _ = harness.down(FINGER, 0, 0);

    assert!(harness.drag(FINGER, 1, 1).is_empty());
    assert_eq!(harness.tail(), CellCoord::new(0, 0));
}

#[test]
fn color_mismatch_is_rejected() {
    let mut harness = Harness::with_colors(&[&[0, 1], &[1, 1]]);
    let _ = harness.down(FINGER, 0, 0);

    assert!(harness.drag(FINGER, 0, 1).is_empty());
    assert_eq!(harness.selected(), vec![CellCoord::new(0, 0)]);
}

#[test]
fn backtracking_onto_selected_token_is_rejected() {
    let mut harness = Harness::with_colors(&[&[0, 0], &[0, 0]]);
    let _ = harness.down(FINGER, 0, 0);
    let _ = harness.drag(FINGER, 0, 1);

    assert!(harness.drag(FINGER, 0, 0).is_empty());
    assert_eq!(harness.tail(), CellCoord::new(0, 1));
}

#[test]
fn moving_within_the_tail_cell_is_a_no_op() {
    let mut harness = Harness::with_colors(&[&[0, 0], &[0, 0]]);
    let _ = harness.down(FINGER, 1, 1);

    assert!(harness.drag(FINGER, 1, 1).is_empty());
    assert_eq!(harness.selected(), vec![CellCoord::new(1, 1)]);
}

#[test]
fn out_of_bounds_move_keeps_dragging() {
    let mut harness = Harness::with_colors(&[&[0, 0], &[0, 0]]);
    let _ = harness.down(FINGER, 0, 0);

    let events = harness.send(PointerInput::Move {
        pointer: FINGER,
        position: PixelPosition::new(-3.0, 500.0),
    });

    assert!(events.is_empty());
    assert!(harness.selection.is_dragging());
}

#[test]
fn second_pointer_cannot_start_extend_or_end_the_drag() {
    let mut harness = Harness::with_colors(&[&[0, 0, 0], &[0, 0, 0], &[0, 0, 0]]);
    let _ = harness.down(FINGER, 0, 0);

    assert!(harness.down(OTHER_FINGER, 2, 2).is_empty());
    assert!(harness.drag(OTHER_FINGER, 0, 1).is_empty());
    assert!(harness.up(OTHER_FINGER).is_empty());
    assert!(harness
        .send(PointerInput::Cancel {
            pointer: OTHER_FINGER,
        })
        .is_empty());

    assert_eq!(harness.selected(), vec![CellCoord::new(0, 0)]);
    let touch = harness.selection.active_touch().expect("drag still active");
    assert_eq!(touch.pointer(), FINGER);
}

#[test]
fn release_collapses_the_selection() {
    let mut harness = Harness::with_colors(&[&[0, 1], &[0, 1]]);
    let _ = harness.down(FINGER, 0, 0);
    let _ = harness.drag(FINGER, 1, 0);

    let events = harness.up(FINGER);

    assert_eq!(
        events,
        vec![
            Event::TokensRemoved { count: 2 },
            Event::ColumnRefilled { column: 0, count: 2 },
        ]
    );
    assert_eq!(harness.selection.state(), SelectionState::Idle);
    assert!(harness.selected().is_empty());
    assert_eq!(query::grid(&harness.world).empty_count(), 0);
}

#[test]
fn cancel_leaves_no_ghost_selection() {
    let mut harness = Harness::with_colors(&[&[0, 0], &[0, 0]]);
    let _ = harness.down(FINGER, 0, 0);
    let _ = harness.drag(FINGER, 0, 1);

    let events = harness.send(PointerInput::Cancel { pointer: FINGER });

    assert_eq!(events, vec![Event::SelectionCleared { count: 2 }]);
    assert!(harness.selected().is_empty());
    assert!(!harness.selection.is_dragging());
    assert_eq!(query::grid(&harness.world).empty_count(), 0);
}

#[test]
fn idle_move_up_and_cancel_are_no_ops() {
    let mut harness = Harness::with_colors(&[&[0, 0], &[0, 0]]);
    let before = query::grid(&harness.world).clone();

    assert!(harness.drag(FINGER, 0, 0).is_empty());
    assert!(harness.up(FINGER).is_empty());
    assert!(harness.send(PointerInput::Cancel { pointer: FINGER }).is_empty());

    assert_eq!(query::grid(&harness.world), &before);
    assert_eq!(harness.selection.state(), SelectionState::Idle);
}
