use proptest::prelude::*;
use signal_grid_core::{
    CellCoord, Command, Direction, ElementKind, LanePosition, SignalColor, SignalNumber,
    MIN_BOARD_COLUMNS,
};
use signal_grid_world::{self as world, query, World};

#[derive(Clone, Debug)]
struct Layout {
    columns: u32,
    rows: u32,
    cells: Vec<(u32, u32, Option<Direction>, Option<ElementKind>)>,
    signals: Vec<(u32, u32, Direction, SignalColor)>,
}

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Right),
        Just(Direction::Down),
        Just(Direction::Left),
    ]
}

fn arb_element() -> impl Strategy<Value = ElementKind> {
    prop_oneof![
        Just(ElementKind::Convert),
        Just(ElementKind::Sync),
        (0u32..4).prop_map(ElementKind::Pause),
    ]
}

fn arb_color() -> impl Strategy<Value = SignalColor> {
    prop_oneof![
        Just(SignalColor::Red),
        Just(SignalColor::Green),
        Just(SignalColor::Blue),
    ]
}

fn arb_layout() -> impl Strategy<Value = Layout> {
    (MIN_BOARD_COLUMNS..8, 1u32..8).prop_flat_map(|(columns, rows)| {
        let cell = (
            0..columns,
            0..rows,
            proptest::option::of(arb_direction()),
            proptest::option::of(arb_element()),
        );
        let signal = (0..columns, 0..=rows, arb_direction(), arb_color());
        (
            proptest::collection::vec(cell, 0..24),
            proptest::collection::vec(signal, 1..6),
        )
            .prop_map(move |(cells, signals)| Layout {
                columns,
                rows,
                cells,
                signals,
            })
    })
}

fn build(layout: &Layout) -> World {
    let mut world = World::new(layout.columns, layout.rows);
    let mut events = Vec::new();
    for &(column, row, arrow, element) in &layout.cells {
        let cell = CellCoord::new(column, row);
        world::apply(&mut world, Command::SetArrow { cell, arrow }, &mut events);
        world::apply(&mut world, Command::PlaceElement { cell, element }, &mut events);
    }
    for &(column, row, direction, color) in &layout.signals {
        world::apply(
            &mut world,
            Command::InjectSignal {
                position: LanePosition::new(column as i32, row as i32),
                direction,
                color,
                number: SignalNumber::new(1).expect("valid number"),
            },
            &mut events,
        );
    }
    world
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn held_signals_never_move(layout in arb_layout(), ticks in 1usize..40) {
        let mut world = build(&layout);
        let mut events = Vec::new();

        for _ in 0..ticks {
            let before = query::signal_view(&world).into_vec();
            world::apply(&mut world, Command::Tick, &mut events);
            let after = query::signal_view(&world).into_vec();

            for (old, new) in before.iter().zip(after.iter()) {
                if old.active && new.pause_timer > 0 {
                    prop_assert_eq!(old.position, new.position);
                }
                if old.active && old.pause_timer > 1 {
                    prop_assert_eq!(old.position, new.position);
                    prop_assert_eq!(new.pause_timer, old.pause_timer - 1);
                }
            }
        }
    }

    #[test]
    fn only_on_board_signals_stay_active(layout in arb_layout(), ticks in 1usize..40) {
        let mut world = build(&layout);
        let mut events = Vec::new();
        let input_lane = layout.rows as i32;

        for _ in 0..ticks {
            world::apply(&mut world, Command::Tick, &mut events);
            let board = query::board(&world);

            for signal in query::signal_view(&world).iter() {
                if signal.active {
                    prop_assert!(board.is_on_board(signal.position));
                }
                if !board.is_on_board(signal.position) {
                    prop_assert!(!signal.active);
                    prop_assert!(!signal.paused);
                }
                if signal.active && signal.position.y() == input_lane {
                    prop_assert_eq!(signal.direction, Direction::Up);
                }
            }
            prop_assert!(query::parked_signals(&world).len() <= 1);
        }
    }

    #[test]
    fn released_queue_lands_on_the_grid(columns in 0u32..8, rows in 0u32..8) {
        let mut world = World::new(columns, rows);
        let mut events = Vec::new();
        for _ in 0..3 {
            world::apply(
                &mut world,
                Command::SpawnSignal {
                    color: SignalColor::Red,
                    number: SignalNumber::new(2).expect("valid number"),
                },
                &mut events,
            );
        }
        world::apply(&mut world, Command::ReleaseInputQueue, &mut events);

        let board = query::board(&world);
        let released = query::signal_view(&world).into_vec();
        prop_assert_eq!(released.len(), 3);
        for signal in released {
            prop_assert!(signal.active);
            prop_assert!(board.grid_cell(signal.position).is_some());
        }
    }
}
