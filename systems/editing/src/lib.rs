#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure editing system that turns pointer input into board edit commands.

use signal_grid_core::{CellCoord, Command, ElementKind};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditInput {
    /// Cell currently under the cursor, if the cursor is over the grid.
    pub cursor_cell: Option<CellCoord>,
    /// Indicates whether the player clicked the hovered cell on this frame.
    pub click: bool,
    /// Element dropped onto the hovered cell on this frame.
    pub dropped_element: Option<ElementKind>,
    /// Indicates whether the player asked to clear the hovered cell's element.
    pub clear_element: bool,
}

impl EditInput {
    /// Creates an input descriptor for a click on the provided cell.
    #[must_use]
    pub const fn click(cell: CellCoord) -> Self {
        Self {
            cursor_cell: Some(cell),
            click: true,
            dropped_element: None,
            clear_element: false,
        }
    }

    /// Creates an input descriptor for an element dropped on the provided cell.
    #[must_use]
    pub const fn drop(cell: CellCoord, element: ElementKind) -> Self {
        Self {
            cursor_cell: Some(cell),
            click: false,
            dropped_element: Some(element),
            clear_element: false,
        }
    }
}

/// Editing system translating input into arrow and element commands.
#[derive(Clone, Copy, Debug, Default)]
pub struct Editor;

impl Editor {
    /// Creates a new editing system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits edit commands for the hovered cell.
    ///
    /// Clicks cycle the arrow; drops place an element and take precedence over
    /// a clear request issued on the same frame. Input without a hovered cell
    /// is ignored, bounds are validated by the world.
    pub fn handle(&self, input: EditInput, out: &mut Vec<Command>) {
        let Some(cell) = input.cursor_cell else {
            return;
        };

        if input.click {
            out.push(Command::CycleArrow { cell });
        }

        if let Some(element) = input.dropped_element {
            out.push(Command::PlaceElement {
                cell,
                element: Some(element),
            });
        } else if input.clear_element {
            out.push(Command::PlaceElement {
                cell,
                element: None,
            });
        }
    }
}
