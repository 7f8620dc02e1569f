//! Dense cell storage backing the board.

use signal_grid_core::{BoardView, Cell, CellCoord, CoreError};

/// Row-major grid of cells owned by the world.
#[derive(Clone, Debug)]
pub(crate) struct Board {
    columns: u32,
    rows: u32,
    cells: Vec<Cell>,
}

impl Board {
    pub(crate) fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![Cell::EMPTY; capacity],
        }
    }

    pub(crate) fn view(&self) -> BoardView<'_> {
        BoardView::new(&self.cells, self.columns, self.rows)
    }

    /// Mutable access for board edits; the step rules never call this.
    pub(crate) fn cell_mut(&mut self, cell: CellCoord) -> Result<&mut Cell, CoreError> {
        let (columns, rows) = (self.columns, self.rows);
        self.index(cell)
            .and_then(|index| self.cells.get_mut(index))
            .ok_or(CoreError::OutOfBounds {
                x: i64::from(cell.column()),
                y: i64::from(cell.row()),
                columns,
                rows,
            })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
