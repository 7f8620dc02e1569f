use proptest::prelude::*;
use signal_grid_core::{
    Cell, CellCoord, Command, Direction, ElementKind, LaneCoordinates, LanePosition, SignalColor,
    SignalNumber, MIN_BOARD_COLUMNS, OUTPUT_LANE_ROW,
};
use signal_grid_system_path_projection::{PathProjector, Termination};
use signal_grid_world::{self as world, query, World};

fn set_arrow(world: &mut World, column: u32, row: u32, arrow: Direction) {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SetArrow {
            cell: CellCoord::new(column, row),
            arrow: Some(arrow),
        },
        &mut events,
    );
}

fn place(world: &mut World, column: u32, row: u32, element: ElementKind) {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::PlaceElement {
            cell: CellCoord::new(column, row),
            element: Some(element),
        },
        &mut events,
    );
}

fn board_cells(world: &World) -> Vec<(CellCoord, Cell)> {
    query::board(world)
        .iter()
        .map(|(coord, cell)| (coord, *cell))
        .collect()
}

#[test]
fn arrows_redirect_the_projected_path() {
    let mut world = World::new(9, 9);
    set_arrow(&mut world, 3, 3, Direction::Right);

    let projection = PathProjector::new().project(query::board(&world), 3);

    assert_eq!(projection.termination, Termination::Exited);
    assert_eq!(projection.positions.first(), Some(&LanePosition::new(3, 9)));
    assert_eq!(projection.positions.last(), Some(&LanePosition::new(9, 3)));
    assert!(projection.positions.contains(&LanePosition::new(4, 3)));
    assert!(!projection.positions.contains(&LanePosition::new(3, 2)));
}

#[test]
fn closed_arrow_loop_is_detected_as_cycle() {
    let mut world = World::new(9, 9);
    set_arrow(&mut world, 4, 4, Direction::Right);
    set_arrow(&mut world, 5, 4, Direction::Up);
    set_arrow(&mut world, 5, 3, Direction::Left);
    set_arrow(&mut world, 4, 3, Direction::Down);

    let projection = PathProjector::new().project(query::board(&world), 4);

    assert_eq!(projection.termination, Termination::Cycle);
    assert_eq!(
        projection.positions[5..],
        [
            LanePosition::new(4, 4),
            LanePosition::new(5, 4),
            LanePosition::new(5, 3),
            LanePosition::new(4, 3),
            LanePosition::new(4, 4),
        ]
    );
}

#[test]
fn returning_to_the_input_lane_turns_back_up() {
    let mut world = World::new(9, 9);
    set_arrow(&mut world, 1, 5, Direction::Down);

    let projection = PathProjector::new().project(query::board(&world), 1);

    assert_eq!(projection.termination, Termination::Cycle);
    assert_eq!(projection.positions.last(), Some(&LanePosition::new(1, 9)));
}

#[test]
fn pause_convert_and_sync_elements_are_ignored() {
    let mut world = World::new(5, 5);
    place(&mut world, 2, 3, ElementKind::Pause(4));
    place(&mut world, 2, 2, ElementKind::Convert);
    place(&mut world, 2, 1, ElementKind::Sync);

    let projector = PathProjector::new();
    let with_elements = projector.simulate(query::board(&world), 2, &LaneCoordinates);
    let empty = World::new(5, 5);
    let without = projector.simulate(query::board(&empty), 2, &LaneCoordinates);

    assert_eq!(with_elements, without);
}

#[test]
fn projection_leaves_board_and_signals_untouched() {
    let mut world = World::new(6, 6);
    set_arrow(&mut world, 2, 2, Direction::Left);
    place(&mut world, 3, 3, ElementKind::Sync);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::InjectSignal {
            position: LanePosition::new(2, 4),
            direction: Direction::Up,
            color: SignalColor::Red,
            number: SignalNumber::new(3).expect("valid number"),
        },
        &mut events,
    );

    let cells_before = board_cells(&world);
    let signals_before = query::signal_view(&world);

    let previews = PathProjector::new().simulate_all(query::board(&world), &LaneCoordinates);

    assert_eq!(previews.len(), 6);
    assert_eq!(board_cells(&world), cells_before);
    assert_eq!(query::signal_view(&world), signals_before);
}

fn arb_arrow_board() -> impl Strategy<Value = (u32, u32, Vec<Option<Direction>>, u32)> {
    (MIN_BOARD_COLUMNS..8, 1u32..8).prop_flat_map(|(columns, rows)| {
        let arrow = proptest::option::weighted(
            0.5,
            prop_oneof![
                Just(Direction::Up),
                Just(Direction::Right),
                Just(Direction::Down),
                Just(Direction::Left),
            ],
        );
        let count = usize::try_from(columns * rows).expect("small board");
        (
            Just(columns),
            Just(rows),
            proptest::collection::vec(arrow, count),
            0..columns,
        )
    })
}

fn build(columns: u32, rows: u32, arrows: &[Option<Direction>]) -> World {
    let mut world = World::new(columns, rows);
    let mut events = Vec::new();
    for (index, arrow) in arrows.iter().enumerate() {
        let index = u32::try_from(index).expect("small board");
        world::apply(
            &mut world,
            Command::SetArrow {
                cell: CellCoord::new(index % columns, index / columns),
                arrow: *arrow,
            },
            &mut events,
        );
    }
    world
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn projection_terminates_within_step_limit((columns, rows, arrows, start) in arb_arrow_board()) {
        let world = build(columns, rows, &arrows);
        let board = query::board(&world);
        let projection = PathProjector::new().project(board, start);

        prop_assert!(projection.steps() <= PathProjector::step_limit(&board));
        prop_assert_ne!(projection.termination, Termination::StepLimit);

        let (last, walked) = projection.positions.split_last().expect("start is recorded");
        for position in walked {
            prop_assert!(board.is_on_board(*position));
            prop_assert!(position.y() > OUTPUT_LANE_ROW);
        }
        if projection.termination == Termination::Exited {
            prop_assert!(last.y() == OUTPUT_LANE_ROW || !board.is_on_board(*last));
            prop_assert!(last.y() >= OUTPUT_LANE_ROW);
        }
    }

    #[test]
    fn live_signal_follows_projected_path((columns, rows, arrows, start) in arb_arrow_board()) {
        let mut world = build(columns, rows, &arrows);
        let projection = PathProjector::new().project(query::board(&world), start);

        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::InjectSignal {
                position: projection.positions[0],
                direction: Direction::Up,
                color: SignalColor::Green,
                number: SignalNumber::new(1).expect("valid number"),
            },
            &mut events,
        );

        for expected in &projection.positions[1..] {
            world::apply(&mut world, Command::Tick, &mut events);
            let view = query::signal_view(&world);
            let signal = view.iter().next().expect("signal is registered");
            prop_assert_eq!(signal.position, *expected);
        }
    }
}
