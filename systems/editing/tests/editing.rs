use signal_grid_core::{CellCoord, Command, Direction, ElementKind, Event};
use signal_grid_system_editing::{EditInput, Editor};
use signal_grid_world::{self as world, query, World};

#[test]
fn click_emits_cycle_arrow_for_hovered_cell() {
    let editor = Editor::new();
    let mut commands = Vec::new();

    editor.handle(EditInput::click(CellCoord::new(2, 3)), &mut commands);

    assert_eq!(
        commands,
        vec![Command::CycleArrow {
            cell: CellCoord::new(2, 3),
        }],
        "clicking a cell should cycle its arrow",
    );
}

#[test]
fn drop_places_element() {
    let editor = Editor::new();
    let mut commands = Vec::new();

    editor.handle(
        EditInput::drop(CellCoord::new(1, 1), ElementKind::Pause(2)),
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::PlaceElement {
            cell: CellCoord::new(1, 1),
            element: Some(ElementKind::Pause(2)),
        }],
    );
}

#[test]
fn input_without_cursor_is_ignored() {
    let editor = Editor::new();
    let mut commands = Vec::new();

    editor.handle(
        EditInput {
            click: true,
            dropped_element: Some(ElementKind::Sync),
            ..EditInput::default()
        },
        &mut commands,
    );

    assert!(commands.is_empty(), "no hovered cell means no edit");
}

#[test]
fn drop_wins_over_clear_on_the_same_frame() {
    let editor = Editor::new();
    let mut commands = Vec::new();

    editor.handle(
        EditInput {
            clear_element: true,
            ..EditInput::drop(CellCoord::new(0, 0), ElementKind::Convert)
        },
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::PlaceElement {
            cell: CellCoord::new(0, 0),
            element: Some(ElementKind::Convert),
        }],
    );
}

#[test]
fn repeated_clicks_cycle_through_every_arrow_and_back() {
    let editor = Editor::new();
    let mut world = World::new(3, 3);
    let cell = CellCoord::new(1, 1);
    let mut seen = Vec::new();

    for _ in 0..5 {
        let mut commands = Vec::new();
        editor.handle(EditInput::click(cell), &mut commands);
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        seen.push(query::board(&world).cell(cell).and_then(|cell| cell.arrow));
    }

    assert_eq!(
        seen,
        vec![
            Some(Direction::Up),
            Some(Direction::Right),
            Some(Direction::Down),
            Some(Direction::Left),
            None,
        ]
    );
}

#[test]
fn world_rejects_edits_outside_the_grid() {
    let editor = Editor::new();
    let mut world = World::new(3, 3);
    let mut commands = Vec::new();
    editor.handle(EditInput::click(CellCoord::new(5, 0)), &mut commands);

    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    assert!(matches!(
        events.as_slice(),
        [Event::EditRejected { cell, .. }] if *cell == CellCoord::new(5, 0)
    ));
}
