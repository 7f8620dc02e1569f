//! Conversion between lane coordinates and canvas space.

use glam::Vec2;
use signal_grid_core::{CellCoord, LaneMapping, LanePosition};

use crate::RenderingError;

/// Maps lane positions to the centre of their canvas cell.
///
/// The canvas stacks, from top to bottom: the output lane, the grid rows,
/// the input lane and a band for the queued signal stack, all surrounded by
/// a uniform margin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordMapper {
    columns: u32,
    rows: u32,
    cell_size: f32,
    margin: f32,
}

impl CoordMapper {
    /// Default side length of a cell in canvas units.
    pub const DEFAULT_CELL_SIZE: f32 = 32.0;

    /// Default margin around the board in canvas units.
    pub const DEFAULT_MARGIN: f32 = 40.0;

    /// Number of lane bands rendered in addition to the grid rows.
    pub const EXTRA_BANDS: u32 = 3;

    /// Creates a mapper for a board of the provided size.
    ///
    /// Returns an error when the cell size is not positive or the margin is
    /// negative.
    pub fn new(
        columns: u32,
        rows: u32,
        cell_size: f32,
        margin: f32,
    ) -> Result<Self, RenderingError> {
        if cell_size <= 0.0 || !cell_size.is_finite() {
            return Err(RenderingError::InvalidCellSize { cell_size });
        }
        if margin < 0.0 || !margin.is_finite() {
            return Err(RenderingError::InvalidMargin { margin });
        }

        Ok(Self {
            columns,
            rows,
            cell_size,
            margin,
        })
    }

    /// Number of grid columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of grid rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single cell.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Margin surrounding the board.
    #[must_use]
    pub const fn margin(&self) -> f32 {
        self.margin
    }

    /// Width and height of the full canvas.
    #[must_use]
    pub fn canvas_size(&self) -> Vec2 {
        Vec2::new(
            self.columns as f32 * self.cell_size + 2.0 * self.margin,
            (self.rows + Self::EXTRA_BANDS) as f32 * self.cell_size + 2.0 * self.margin,
        )
    }

    /// Top-left corner of the output lane band.
    #[must_use]
    pub fn output_lane_origin(&self) -> Vec2 {
        Vec2::splat(self.margin)
    }

    /// Top-left corner of the first grid row.
    #[must_use]
    pub fn grid_origin(&self) -> Vec2 {
        Vec2::new(self.margin, self.margin + self.cell_size)
    }

    /// Top-left corner of the input lane band.
    #[must_use]
    pub fn input_lane_origin(&self) -> Vec2 {
        self.grid_origin() + Vec2::new(0.0, self.rows as f32 * self.cell_size)
    }

    /// Size of a lane band spanning every column.
    #[must_use]
    pub fn band_size(&self) -> Vec2 {
        Vec2::new(self.columns as f32 * self.cell_size, self.cell_size)
    }

    /// Resolves the lane position whose canvas cell contains `point`.
    ///
    /// Points in the queue stack band resolve to row `rows + 2`.
    #[must_use]
    pub fn lane_at(&self, point: Vec2) -> Option<LanePosition> {
        let local = (point - self.output_lane_origin()) / self.cell_size;
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }

        let column = local.x.floor() as u32;
        let band = local.y.floor() as u32;
        if column >= self.columns || band >= self.rows + Self::EXTRA_BANDS {
            return None;
        }

        let x = i32::try_from(column).ok()?;
        let y = i32::try_from(band).ok()?;
        let rows = i32::try_from(self.rows).ok()?;
        let lane_row = match y {
            0 => -1,
            y if y <= rows => y - 1,
            y if y == rows + 1 => rows,
            _ => rows + 2,
        };
        Some(LanePosition::new(x, lane_row))
    }

    /// Resolves the grid cell containing `point`, ignoring the lanes.
    #[must_use]
    pub fn cell_at(&self, point: Vec2) -> Option<CellCoord> {
        let position = self.lane_at(point)?;
        let column = u32::try_from(position.x()).ok()?;
        let row = u32::try_from(position.y()).ok()?;
        (row < self.rows).then(|| CellCoord::new(column, row))
    }
}

impl LaneMapping for CoordMapper {
    type Point = Vec2;

    fn map(&self, position: LanePosition) -> Vec2 {
        let half = self.cell_size / 2.0;
        let x = self.margin + position.x() as f32 * self.cell_size + half;
        let rows = i64::from(self.rows);
        let y = i64::from(position.y());

        let band_top = if y == rows || y == rows + 1 {
            self.input_lane_origin().y
        } else if y < 0 {
            self.output_lane_origin().y
        } else if y > rows {
            self.input_lane_origin().y + self.cell_size
        } else {
            self.grid_origin().y + y as f32 * self.cell_size
        };

        Vec2::new(x, band_top + half)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> CoordMapper {
        CoordMapper::new(9, 9, 32.0, 40.0).expect("valid mapper")
    }

    #[test]
    fn canvas_covers_grid_and_three_lane_bands() {
        assert_eq!(mapper().canvas_size(), Vec2::new(368.0, 464.0));
    }

    #[test]
    fn lanes_map_to_their_bands() {
        let mapper = mapper();
        assert_eq!(mapper.map(LanePosition::new(0, -1)), Vec2::new(56.0, 56.0));
        assert_eq!(mapper.map(LanePosition::new(0, -2)), Vec2::new(56.0, 56.0));
        assert_eq!(mapper.map(LanePosition::new(2, 0)), Vec2::new(120.0, 88.0));
        assert_eq!(mapper.map(LanePosition::new(0, 9)), Vec2::new(56.0, 376.0));
        assert_eq!(mapper.map(LanePosition::new(0, 10)), Vec2::new(56.0, 376.0));
        assert_eq!(mapper.map(LanePosition::new(0, 11)), Vec2::new(56.0, 408.0));
    }

    #[test]
    fn canvas_points_resolve_back_to_lanes() {
        let mapper = mapper();
        assert_eq!(
            mapper.lane_at(Vec2::new(56.0, 56.0)),
            Some(LanePosition::new(0, -1))
        );
        assert_eq!(
            mapper.lane_at(Vec2::new(130.0, 100.0)),
            Some(LanePosition::new(2, 0))
        );
        assert_eq!(
            mapper.lane_at(Vec2::new(56.0, 380.0)),
            Some(LanePosition::new(0, 9))
        );
        assert_eq!(mapper.lane_at(Vec2::new(10.0, 100.0)), None);
        assert_eq!(mapper.lane_at(Vec2::new(56.0, 460.0)), None);
    }

    #[test]
    fn cell_lookup_ignores_lanes() {
        let mapper = mapper();
        assert_eq!(
            mapper.cell_at(Vec2::new(130.0, 100.0)),
            Some(CellCoord::new(2, 0))
        );
        assert_eq!(mapper.cell_at(Vec2::new(56.0, 56.0)), None);
        assert_eq!(mapper.cell_at(Vec2::new(56.0, 380.0)), None);
    }

    #[test]
    fn rejects_degenerate_dimensions() {
        assert!(matches!(
            CoordMapper::new(3, 3, 0.0, 4.0),
            Err(RenderingError::InvalidCellSize { .. })
        ));
        assert!(matches!(
            CoordMapper::new(3, 3, 16.0, -1.0),
            Err(RenderingError::InvalidMargin { .. })
        ));
    }
}
