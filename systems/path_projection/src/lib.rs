#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Read-only look-ahead that predicts where a free-moving signal would travel.
//!
//! The projector applies a simplified move rule: arrows override the heading,
//! every other element is ignored, and the input lane turns the heading back
//! up. A path ends as soon as it reaches the output lane. It only ever borrows a [`BoardView`], so it cannot touch live signals
//! or the cells it reads.

use std::collections::HashSet;

use signal_grid_core::{BoardView, Direction, LaneMapping, LanePosition, OUTPUT_LANE_ROW};

/// Reason a projection stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Termination {
    /// The path reached the output lane or left the board sideways; the exit
    /// position is the last recorded point.
    Exited,
    /// The path revisited a position with the same heading.
    Cycle,
    /// The hard step cap was reached before any other condition fired.
    StepLimit,
}

/// Projected path expressed in lane coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Projection {
    /// Visited positions, starting on the input lane.
    pub positions: Vec<LanePosition>,
    /// Condition that ended the projection.
    pub termination: Termination,
}

impl Projection {
    /// Number of single-cell steps the projection performed.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.positions.len().saturating_sub(1)
    }
}

/// Stateless path projector.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathProjector;

impl PathProjector {
    /// Creates a new projector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Maximum number of steps a projection may take on the provided board.
    ///
    /// A path only records states on grid cells, with any heading, and on the
    /// input lane, where the heading is always up. The cap is one more than
    /// that state count, so cycle detection or an exit always fires first.
    #[must_use]
    pub fn step_limit(board: &BoardView<'_>) -> usize {
        let columns = usize::try_from(board.columns()).unwrap_or(usize::MAX);
        let rows = usize::try_from(board.rows()).unwrap_or(usize::MAX);
        let grid_states = columns
            .saturating_mul(rows)
            .saturating_mul(Direction::ALL.len());
        grid_states.saturating_add(columns).saturating_add(1)
    }

    /// Follows a hypothetical signal released from `start_column`.
    #[must_use]
    pub fn project(&self, board: BoardView<'_>, start_column: u32) -> Projection {
        let input_lane = board.input_lane_row();
        let mut position = LanePosition::new(
            i32::try_from(start_column).unwrap_or(i32::MAX),
            input_lane,
        );
        let mut direction = Direction::Up;
        let mut positions = vec![position];
        let mut visited = HashSet::new();
        let limit = Self::step_limit(&board);

        for _ in 0..limit {
            if !visited.insert((position, direction)) {
                return Projection {
                    positions,
                    termination: Termination::Cycle,
                };
            }

            position = position.step(direction);
            positions.push(position);

            if position.y() <= OUTPUT_LANE_ROW || !board.is_on_board(position) {
                return Projection {
                    positions,
                    termination: Termination::Exited,
                };
            }

            if position.y() == input_lane {
                direction = Direction::Up;
            } else if let Some(arrow) = board
                .grid_cell(position)
                .and_then(|cell| board.cell(cell))
                .and_then(|cell| cell.arrow)
            {
                direction = arrow;
            }
        }

        Projection {
            positions,
            termination: Termination::StepLimit,
        }
    }

    /// Projects the path from `start_column` and maps every point.
    ///
    /// Consecutive points that map to the same value are collapsed.
    #[must_use]
    pub fn simulate<M>(&self, board: BoardView<'_>, start_column: u32, mapping: &M) -> Vec<M::Point>
    where
        M: LaneMapping,
    {
        let projection = self.project(board, start_column);
        let mut points: Vec<M::Point> = Vec::with_capacity(projection.positions.len());
        for position in projection.positions {
            let point = mapping.map(position);
            if points.last() != Some(&point) {
                points.push(point);
            }
        }
        points
    }

    /// Projects one preview per column of the board.
    #[must_use]
    pub fn simulate_all<M>(&self, board: BoardView<'_>, mapping: &M) -> Vec<Vec<M::Point>>
    where
        M: LaneMapping,
    {
        (0..board.columns())
            .map(|column| self.simulate(board, column, mapping))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_grid_core::{Cell, LaneCoordinates};

    #[test]
    fn straight_run_exits_through_the_top() {
        let cells = vec![Cell::EMPTY; 9];
        let board = BoardView::new(&cells, 3, 3);
        let projection = PathProjector::new().project(board, 1);

        assert_eq!(projection.termination, Termination::Exited);
        assert_eq!(
            projection.positions,
            vec![
                LanePosition::new(1, 3),
                LanePosition::new(1, 2),
                LanePosition::new(1, 1),
                LanePosition::new(1, 0),
                LanePosition::new(1, -1),
            ]
        );
    }

    #[test]
    fn single_row_board_stops_on_the_output_lane() {
        let cells = vec![Cell::EMPTY; 1];
        let board = BoardView::new(&cells, 1, 1);
        let projection = PathProjector::new().project(board, 0);

        assert_eq!(projection.termination, Termination::Exited);
        assert_eq!(projection.steps(), 2);
        assert_eq!(projection.positions.last(), Some(&LanePosition::new(0, -1)));
    }

    #[test]
    fn two_cell_loop_is_reported_as_cycle() {
        let mut cells = vec![Cell::EMPTY; 2];
        cells[0].arrow = Some(Direction::Right);
        cells[1].arrow = Some(Direction::Down);
        let board = BoardView::new(&cells, 2, 1);
        let projection = PathProjector::new().project(board, 0);

        // Four steps close the loop; the repeated state is only seen on the
        // fifth check, so the cap must exceed `columns * rows * 2`.
        assert_eq!(projection.termination, Termination::Cycle);
        assert_eq!(projection.steps(), 4);
        assert_eq!(
            projection.positions,
            vec![
                LanePosition::new(0, 1),
                LanePosition::new(0, 0),
                LanePosition::new(1, 0),
                LanePosition::new(1, 1),
                LanePosition::new(1, 0),
            ]
        );
        assert_eq!(PathProjector::step_limit(&board), 11);
    }

    #[test]
    fn collapses_points_that_map_to_the_same_value() {
        struct RowOnly;

        impl LaneMapping for RowOnly {
            type Point = i32;

            fn map(&self, position: LanePosition) -> i32 {
                position.y().max(0)
            }
        }

        let cells = vec![Cell::EMPTY; 4];
        let board = BoardView::new(&cells, 2, 2);
        let points = PathProjector::new().simulate(board, 0, &RowOnly);
        assert_eq!(points, vec![2, 1, 0]);

        let identity = PathProjector::new().simulate(board, 0, &LaneCoordinates);
        assert_eq!(identity.len(), 4);
    }
}
