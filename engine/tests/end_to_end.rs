use ball_drop_core::{BoardSizing, CellCoord, Command, Event, PointerId, TokenColor};
use ball_drop_engine::{Engine, EngineError};
use ball_drop_system_column_feed::ColumnGenerator;
use ball_drop_world::{self as world, query, World};

const FINGER: PointerId = PointerId::new(7);

fn press(engine: &mut Engine, cell: CellCoord) -> Vec<Event> {
    let position = engine.sizing().grid_to_pixel(cell);
    engine
        .on_pointer_down(position.x, position.y, FINGER)
        .expect("pointer down succeeds")
}

fn drag(engine: &mut Engine, cell: CellCoord) -> Vec<Event> {
    let position = engine.sizing().grid_to_pixel(cell);
    engine
        .on_pointer_move(position.x, position.y, FINGER)
        .expect("pointer move succeeds")
}

fn release(engine: &mut Engine, cell: CellCoord) -> Vec<Event> {
    let position = engine.sizing().grid_to_pixel(cell);
    engine
        .on_pointer_up(position.x, position.y, FINGER)
        .expect("pointer up succeeds")
}

#[test]
fn single_color_board_collapses_dragged_path() {
    let mut engine =
        Engine::new(5, 1, BoardSizing::new(5, 500, true), "single-color").expect("valid engine");

    let _ = press(&mut engine, CellCoord::new(0, 0));
    let _ = drag(&mut engine, CellCoord::new(0, 1));
    let _ = drag(&mut engine, CellCoord::new(1, 1));
    assert_eq!(engine.grid().selected_count(), 3);

    let events = release(&mut engine, CellCoord::new(1, 1));

    assert_eq!(
        events,
        vec![
            Event::TokensRemoved { count: 3 },
            Event::ColumnRefilled { column: 0, count: 1 },
            Event::ColumnRefilled { column: 1, count: 2 },
        ]
    );
    assert!(!engine.is_dragging());
    assert!(engine
        .for_each_cell()
        .all(|snapshot| !snapshot.cell.is_empty() && !snapshot.cell.is_selected()));
}

#[test]
fn refilled_tokens_are_drawn_from_the_column_generators() {
    let seed = "two-colors";
    let mut engine = Engine::new(5, 2, BoardSizing::new(5, 500, false), seed).expect("valid engine");
    let mut mirror = World::new(seed, 5, 2);
    assert_eq!(engine.grid(), query::grid(&mirror));

    let (first, second) = adjacent_same_color_pair(&engine).expect("two-color board has a pair");
    let _ = press(&mut engine, first);
    let _ = drag(&mut engine, second);
    let _ = release(&mut engine, second);

    let mut events = Vec::new();
    for command in [
        Command::SelectToken { cell: first },
        Command::SelectToken { cell: second },
        Command::Collapse,
    ] {
        world::apply(&mut mirror, command, &mut events);
    }

    assert_eq!(engine.grid(), query::grid(&mirror));
}

#[test]
fn columns_fill_top_to_bottom_from_their_generators() {
    let seed = "column-feed";
    let mut engine = Engine::new(3, 4, BoardSizing::new(3, 300, false), seed).expect("valid engine");
    let color_at = |engine: &Engine, row, column| {
        engine
            .grid()
            .cell(CellCoord::new(row, column))
            .and_then(|cell| cell.color())
            .expect("board is full")
    };

    let mut generators: Vec<_> = (0..3)
        .map(|column| ColumnGenerator::new(seed, column))
        .collect();
    for (column, generator) in (0..3).zip(generators.iter_mut()) {
        for row in 0..3 {
            assert_eq!(color_at(&engine, row, column), generator.next_color(4));
        }
    }

    let top = color_at(&engine, 0, 0);
    let middle = color_at(&engine, 1, 0);
    let _ = press(&mut engine, CellCoord::new(2, 0));
    let events = release(&mut engine, CellCoord::new(2, 0));

    assert_eq!(
        events,
        vec![
            Event::TokensRemoved { count: 1 },
            Event::ColumnRefilled { column: 0, count: 1 },
        ]
    );
    assert_eq!(color_at(&engine, 0, 0), generators[0].next_color(4));
    assert_eq!(color_at(&engine, 1, 0), top);
    assert_eq!(color_at(&engine, 2, 0), middle);
}

#[test]
fn release_outside_the_board_still_collapses() {
    let mut engine =
        Engine::new(4, 1, BoardSizing::new(4, 400, false), "outside").expect("valid engine");
    let _ = press(&mut engine, CellCoord::new(3, 3));

    let events = engine
        .on_pointer_up(-40.0, 900.0, FINGER)
        .expect("pointer up succeeds");

    assert_eq!(
        events,
        vec![
            Event::TokensRemoved { count: 1 },
            Event::ColumnRefilled { column: 3, count: 1 },
        ]
    );
}

#[test]
fn press_outside_the_board_changes_nothing() {
    let mut engine =
        Engine::new(5, 3, BoardSizing::new(5, 500, true), "outside").expect("valid engine");
    let before = engine.grid().clone();

    let mut events = engine
        .on_pointer_down(-1.0, -1.0, FINGER)
        .expect("pointer down succeeds");
    events.extend(engine.on_pointer_up(-1.0, -1.0, FINGER).expect("pointer up succeeds"));

    assert!(events.is_empty());
    assert_eq!(engine.grid(), &before);
    assert!(engine.active_touch().is_none());
}

#[test]
fn cancel_discards_the_drag() {
    let mut engine =
        Engine::new(4, 1, BoardSizing::new(4, 400, false), "cancel").expect("valid engine");
    let _ = press(&mut engine, CellCoord::new(0, 0));
    let _ = drag(&mut engine, CellCoord::new(1, 0));

    let events = engine.on_pointer_cancel(FINGER).expect("cancel succeeds");

    assert_eq!(events, vec![Event::SelectionCleared { count: 2 }]);
    assert_eq!(engine.grid().selected_count(), 0);
    assert_eq!(engine.grid().empty_count(), 0);
}

#[test]
fn new_press_replaces_the_previous_selection() {
    let mut engine =
        Engine::new(4, 1, BoardSizing::new(4, 400, false), "reselect").expect("valid engine");
    let _ = engine.select_all_of_color(TokenColor::new(0));

    let events = press(&mut engine, CellCoord::new(2, 2));

    assert_eq!(
        events,
        vec![
            Event::SelectionCleared { count: 16 },
            Event::TokenSelected {
                cell: CellCoord::new(2, 2),
                color: TokenColor::new(0),
            },
        ]
    );
}

#[test]
fn identical_construction_yields_identical_boards() {
    let sizing = BoardSizing::new(15, 600, true);
    let first = Engine::new(15, 5, sizing, "2024-4-9").expect("valid engine");
    let second = Engine::new(15, 5, sizing, "2024-4-9").expect("valid engine");

    assert_eq!(first.grid(), second.grid());
    assert_eq!(first.seed(), "2024-4-9");
    assert_eq!(first.color_variants(), 5);
    assert!(first
        .for_each_cell()
        .all(|snapshot| snapshot.cell.color().is_some_and(|color| color.get() < 5)));
}

#[test]
fn sizing_must_match_grid() {
    let error = Engine::new(15, 5, BoardSizing::new(10, 600, true), "mismatch")
        .expect_err("sizing lays out ten cells");

    assert_eq!(error, EngineError::SizingMismatch { grid: 15, sizing: 10 });
}

fn adjacent_same_color_pair(engine: &Engine) -> Option<(CellCoord, CellCoord)> {
    let size = engine.grid_size();
    (0..size)
        .flat_map(|row| (0..size).map(move |column| CellCoord::new(row, column)))
        .flat_map(|cell| {
            [
                CellCoord::new(cell.row(), cell.column() + 1),
                CellCoord::new(cell.row() + 1, cell.column()),
            ]
            .into_iter()
            .map(move |neighbor| (cell, neighbor))
        })
        .find(|(cell, neighbor)| {
            let color = engine.grid().cell(*cell).and_then(|contents| contents.color());
            let other = engine.grid().cell(*neighbor).and_then(|contents| contents.color());
            color.is_some() && color == other
        })
}
