//! Presentation records captured from a simulation snapshot.

use glam::Vec2;
use signal_grid_core::{
    BoardView, CellCoord, Direction, ElementKind, LaneMapping, LanePosition, SignalId,
    SignalSnapshot, SignalView,
};

use crate::{palette, Color, CoordMapper};

/// Lane band drawn across the full board width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandPresentation {
    /// Top-left corner of the band.
    pub origin: Vec2,
    /// Width and height of the band.
    pub size: Vec2,
    /// Translucent fill color.
    pub color: Color,
}

/// Grid lines framing the playable cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPresentation {
    /// Top-left corner of the first cell.
    pub origin: Vec2,
    /// Number of columns.
    pub columns: u32,
    /// Number of rows.
    pub rows: u32,
    /// Side length of a cell.
    pub cell_size: f32,
    /// Color used for the grid lines.
    pub line_color: Color,
}

/// Non-empty grid cell with its arrow and element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellPresentation {
    /// Grid coordinate of the cell.
    pub cell: CellCoord,
    /// Canvas centre of the cell.
    pub center: Vec2,
    /// Arrow drawn in the cell, if any.
    pub arrow: Option<Direction>,
    /// Element drawn in the cell, if any.
    pub element: Option<ElementKind>,
    /// Fill used for the element badge.
    pub element_fill: Option<Color>,
}

/// Signal drawn as a numbered disc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignalPresentation {
    /// Identifier of the signal.
    pub id: SignalId,
    /// Lane position the disc represents.
    pub lane: LanePosition,
    /// Canvas centre of the disc.
    pub center: Vec2,
    /// Radius of the disc.
    pub radius: f32,
    /// Disc fill color.
    pub color: Color,
    /// Number printed on the disc.
    pub number: u8,
    /// Whether the signal is waiting in the input queue.
    pub queued: bool,
}

/// Preview polyline for a single start column.
#[derive(Clone, Debug, PartialEq)]
pub struct PathPresentation {
    /// Column the hypothetical signal starts from.
    pub column: u32,
    /// Canvas points of the polyline.
    pub points: Vec<Vec2>,
    /// Stroke color.
    pub color: Color,
}

/// Scene description combining the board, signals and preview paths.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Mapper used to place every record on the canvas.
    pub mapper: CoordMapper,
    /// Lane bands, output lane first.
    pub bands: Vec<BandPresentation>,
    /// Grid lines.
    pub grid: GridPresentation,
    /// Cells that carry an arrow or an element, row by row.
    pub cells: Vec<CellPresentation>,
    /// Visible signals, live registry first and queued signals last.
    pub signals: Vec<SignalPresentation>,
    /// Preview paths with at least two points.
    pub paths: Vec<PathPresentation>,
}

impl Scene {
    /// Captures presentation records from a simulation snapshot.
    ///
    /// Only active or sync-parked live signals are kept; every queued signal
    /// is kept. Previews are expected in column order and polylines with
    /// fewer than two points are dropped.
    #[must_use]
    pub fn capture(
        board: BoardView<'_>,
        signals: &SignalView,
        queue: &SignalView,
        previews: Vec<Vec<Vec2>>,
        mapper: &CoordMapper,
    ) -> Self {
        let bands = vec![
            BandPresentation {
                origin: mapper.output_lane_origin(),
                size: mapper.band_size(),
                color: palette::OUTPUT_BAND,
            },
            BandPresentation {
                origin: mapper.input_lane_origin(),
                size: mapper.band_size(),
                color: palette::INPUT_BAND,
            },
        ];

        let grid = GridPresentation {
            origin: mapper.grid_origin(),
            columns: board.columns(),
            rows: board.rows(),
            cell_size: mapper.cell_size(),
            line_color: palette::GRID_LINE,
        };

        let cells = board
            .iter()
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(coord, cell)| CellPresentation {
                cell: coord,
                center: mapper.map(LanePosition::from(coord)),
                arrow: cell.arrow,
                element: cell.element,
                element_fill: cell.element.map(element_fill),
            })
            .collect();

        let radius = mapper.cell_size() * 0.25;
        let live = signals
            .iter()
            .filter(|signal| signal.is_visible())
            .map(|signal| present_signal(signal, mapper, radius, false));
        let queued = queue
            .iter()
            .map(|signal| present_signal(signal, mapper, radius, true));
        let signals = live.chain(queued).collect();

        let paths = previews
            .into_iter()
            .zip(0u32..)
            .filter(|(points, _)| points.len() >= 2)
            .map(|(points, column)| PathPresentation {
                column,
                points,
                color: palette::PATH,
            })
            .collect();

        Self {
            mapper: *mapper,
            bands,
            grid,
            cells,
            signals,
            paths,
        }
    }

    /// Width and height of the canvas the scene is laid out on.
    #[must_use]
    pub fn canvas_size(&self) -> Vec2 {
        self.mapper.canvas_size()
    }
}

fn element_fill(element: ElementKind) -> Color {
    match element {
        ElementKind::Pause(_) => palette::PAUSE_FILL,
        ElementKind::Convert | ElementKind::Sync => palette::BLOCK_FILL,
    }
}

fn present_signal(
    signal: &SignalSnapshot,
    mapper: &CoordMapper,
    radius: f32,
    queued: bool,
) -> SignalPresentation {
    SignalPresentation {
        id: signal.id,
        lane: signal.position,
        center: mapper.map(signal.position),
        radius,
        color: Color::from(signal.rgb),
        number: signal.number.get(),
        queued,
    }
}
