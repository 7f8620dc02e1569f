#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Signal Grid engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that systems and adapters react to deterministically. Systems only ever see
//! immutable views such as [`BoardView`] and [`SignalView`].

use std::{fmt, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

/// Maximum number of signals the input queue holds before releasing them.
pub const INPUT_QUEUE_CAPACITY: usize = 3;

/// Narrowest board that fits a released input queue, one column per slot.
pub const MIN_BOARD_COLUMNS: u32 = INPUT_QUEUE_CAPACITY as u32;

/// Smallest number a signal may carry.
pub const MIN_SIGNAL_NUMBER: u8 = 1;

/// Largest number a signal may carry.
pub const MAX_SIGNAL_NUMBER: u8 = 9;

/// Row index of the output lane drawn above the grid.
pub const OUTPUT_LANE_ROW: i32 = -1;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances every live signal by one discrete step.
    Tick,
    /// Appends a freshly spawned signal to the input queue when it has room.
    SpawnSignal {
        /// Colour assigned to the spawned signal.
        color: SignalColor,
        /// Number carried by the spawned signal.
        number: SignalNumber,
    },
    /// Moves a full input queue onto the bottom grid row.
    ReleaseInputQueue,
    /// Places an active signal directly into the live registry.
    ///
    /// Used by deterministic harnesses that bypass the input queue.
    InjectSignal {
        /// Lane position the signal starts from.
        position: LanePosition,
        /// Initial direction of travel.
        direction: Direction,
        /// Colour assigned to the signal.
        color: SignalColor,
        /// Number carried by the signal.
        number: SignalNumber,
    },
    /// Advances the arrow of a cell through `Up → Right → Down → Left → none`.
    CycleArrow {
        /// Cell whose arrow should change.
        cell: CellCoord,
    },
    /// Replaces the arrow of a cell.
    SetArrow {
        /// Cell whose arrow should change.
        cell: CellCoord,
        /// Arrow to install, or `None` to clear it.
        arrow: Option<Direction>,
    },
    /// Replaces the element of a cell.
    PlaceElement {
        /// Cell whose element should change.
        cell: CellCoord,
        /// Element to install, or `None` to clear it.
        element: Option<ElementKind>,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation advanced by one tick.
    TimeAdvanced {
        /// Number of ticks processed so far, including this one.
        tick: u64,
    },
    /// Confirms that a signal moved between two lane positions.
    SignalAdvanced {
        /// Identifier of the signal that moved.
        signal: SignalId,
        /// Position occupied before the move.
        from: LanePosition,
        /// Position occupied after the move.
        to: LanePosition,
    },
    /// Reports that a pause element is holding a signal in place.
    SignalHeld {
        /// Identifier of the held signal.
        signal: SignalId,
        /// Cell containing the pause element.
        cell: CellCoord,
        /// Ticks left on the pause timer after this tick.
        remaining: u32,
    },
    /// Reports that a convert element changed the colour of a signal.
    SignalConverted {
        /// Identifier of the converted signal.
        signal: SignalId,
        /// Colour before the conversion.
        from: SignalColor,
        /// Colour after the conversion.
        to: SignalColor,
    },
    /// Reports that the sync gate parked a signal.
    SignalParked {
        /// Identifier of the parked signal.
        signal: SignalId,
        /// Sync cell the signal waits on.
        cell: CellCoord,
    },
    /// Reports that the sync gate released every parked signal.
    SignalsUnparked {
        /// Signal whose arrival opened the gate.
        trigger: SignalId,
        /// Signals that resumed movement.
        released: Vec<SignalId>,
    },
    /// Announces that a signal reached the output lane.
    SignalCompleted {
        /// Identifier of the completed signal.
        signal: SignalId,
        /// Colour of the signal when it completed.
        color: SignalColor,
        /// Number carried by the signal.
        number: SignalNumber,
        /// Numeric value of the colour at completion time.
        value: f32,
    },
    /// Announces that a signal left the board and became inactive.
    SignalExited {
        /// Identifier of the signal that left the board.
        signal: SignalId,
        /// Off-board position the signal ended up at.
        position: LanePosition,
    },
    /// Confirms that a spawned signal entered the input queue.
    SignalQueued {
        /// Identifier assigned to the spawned signal.
        signal: SignalId,
        /// Queue slot, which is also the column it will be released into.
        slot: usize,
    },
    /// Confirms that a full input queue moved onto the grid.
    InputQueueReleased {
        /// Released signals in slot order.
        signals: Vec<SignalId>,
    },
    /// Confirms that a signal was placed directly into the live registry.
    SignalInjected {
        /// Identifier assigned to the injected signal.
        signal: SignalId,
        /// Lane position the signal starts from.
        position: LanePosition,
    },
    /// Confirms that a board edit changed a cell.
    CellChanged {
        /// Cell that changed.
        cell: CellCoord,
        /// Contents of the cell after the edit.
        state: Cell,
    },
    /// Reports that a board edit was rejected.
    EditRejected {
        /// Cell targeted by the edit.
        cell: CellCoord,
        /// Reason the edit failed.
        error: CoreError,
    },
}

/// Errors raised at the validated input boundaries of the engine.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// The colour name is not part of the fixed colour table.
    #[error("unknown color: {0}")]
    UnknownColor(String),
    /// A cell lookup fell outside the grid extent.
    #[error("cell ({x}, {y}) is outside the {columns}x{rows} grid")]
    OutOfBounds {
        /// Requested column.
        x: i64,
        /// Requested row.
        y: i64,
        /// Number of grid columns.
        columns: u32,
        /// Number of grid rows.
        rows: u32,
    },
    /// A signal number outside `1..=9` was supplied.
    #[error("signal number {0} is outside 1..=9")]
    InvalidSignalNumber(u8),
    /// An element tool identifier could not be parsed.
    #[error("unknown element: {0}")]
    InvalidElement(String),
    /// A direction name could not be parsed.
    #[error("unknown direction: {0}")]
    InvalidDirection(String),
}

/// Cardinal directions used both for arrows and for signal velocity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Movement toward decreasing row indices, i.e. toward the output lane.
    Up,
    /// Movement toward increasing column indices.
    Right,
    /// Movement toward increasing row indices, i.e. toward the input lane.
    Down,
    /// Movement toward decreasing column indices.
    Left,
}

impl Direction {
    /// All directions in arrow-cycling order.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Unit displacement `(dx, dy)` applied per tick.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }

    /// Glyph used when presenting the arrow.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Up => '↑',
            Self::Right => '→',
            Self::Down => '↓',
            Self::Left => '←',
        }
    }

    /// Next arrow in the editing cycle `Up → Right → Down → Left → none → Up`.
    #[must_use]
    pub const fn cycle(arrow: Option<Direction>) -> Option<Direction> {
        match arrow {
            None => Some(Self::Up),
            Some(Self::Up) => Some(Self::Right),
            Some(Self::Right) => Some(Self::Down),
            Some(Self::Down) => Some(Self::Left),
            Some(Self::Left) => None,
        }
    }
}

impl FromStr for Direction {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "up" | "↑" => Ok(Self::Up),
            "right" | "→" => Ok(Self::Right),
            "down" | "↓" => Ok(Self::Down),
            "left" | "←" => Ok(Self::Left),
            _ => Err(CoreError::InvalidDirection(value.to_owned())),
        }
    }
}

/// Non-arrow cell modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Turns red signals blue.
    Convert,
    /// Board-wide rendezvous gate.
    Sync,
    /// Holds a signal for the carried number of extra ticks.
    Pause(u32),
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Convert => write!(f, "#"),
            Self::Sync => write!(f, "sync"),
            Self::Pause(ticks) => write!(f, "pause{ticks}"),
        }
    }
}

impl FromStr for ElementKind {
    type Err = CoreError;

    /// Parses palette tool identifiers: `#`/`convert`, `sync` and `pause<n>`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        match trimmed {
            "#" | "convert" => return Ok(Self::Convert),
            "sync" => return Ok(Self::Sync),
            _ => {}
        }

        trimmed
            .strip_prefix("pause")
            .and_then(|ticks| ticks.parse::<u32>().ok())
            .map(Self::Pause)
            .ok_or_else(|| CoreError::InvalidElement(value.to_owned()))
    }
}

/// Contents of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Arrow that overrides the direction of signals resolving this cell.
    pub arrow: Option<Direction>,
    /// Element applied to signals resolving this cell.
    pub element: Option<ElementKind>,
}

impl Cell {
    /// Cell without arrow or element.
    pub const EMPTY: Cell = Cell {
        arrow: None,
        element: None,
    };

    /// Reports whether the cell carries neither arrow nor element.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.arrow.is_none() && self.element.is_none()
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

impl From<CellCoord> for LanePosition {
    fn from(cell: CellCoord) -> Self {
        Self::new(
            i32::try_from(cell.column()).unwrap_or(i32::MAX),
            i32::try_from(cell.row()).unwrap_or(i32::MAX),
        )
    }
}

/// Signed position of a signal, including the lanes around the grid.
///
/// Rows `0..rows` address grid cells, row `-1` is the output lane and row
/// `rows` is the input lane. Any other row, or a column outside the grid, is
/// off the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanePosition {
    x: i32,
    y: i32,
}

impl LanePosition {
    /// Creates a new lane position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the position.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the position.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Position reached after a single step in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl fmt::Display for LanePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Unique identifier assigned to a signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignalId(u32);

impl SignalId {
    /// Creates a new signal identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Number in `1..=9` carried by a signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignalNumber(u8);

impl SignalNumber {
    /// Validates and wraps a signal number.
    pub fn new(value: u8) -> Result<Self, CoreError> {
        if (MIN_SIGNAL_NUMBER..=MAX_SIGNAL_NUMBER).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::InvalidSignalNumber(value))
        }
    }

    /// Wraps a number, clamping it into `1..=9`.
    #[must_use]
    pub const fn saturating(value: u8) -> Self {
        if value < MIN_SIGNAL_NUMBER {
            Self(MIN_SIGNAL_NUMBER)
        } else if value > MAX_SIGNAL_NUMBER {
            Self(MAX_SIGNAL_NUMBER)
        } else {
            Self(value)
        }
    }

    /// Retrieves the wrapped number.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Byte RGB triple used to present a signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a new colour from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the colour.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the colour.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the colour.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Closed set of signal colours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SignalColor {
    /// Red signals carry a negative value and can be converted to blue.
    Red,
    /// Green signals are unaffected by convert elements.
    Green,
    /// Blue signals carry the highest value.
    Blue,
}

impl SignalColor {
    /// Every colour the spawn rule chooses from, in table order.
    pub const ALL: [SignalColor; 3] = [Self::Red, Self::Green, Self::Blue];

    /// Name under which the colour is registered in the [`ColorTable`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
        }
    }

    /// Resolves a colour by its table name.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "red" => Ok(Self::Red),
            "green" => Ok(Self::Green),
            "blue" => Ok(Self::Blue),
            _ => Err(CoreError::UnknownColor(name.to_owned())),
        }
    }

    /// Display colour and numeric value from the table.
    #[must_use]
    pub const fn preset(self) -> ColorPreset {
        ColorTable::preset(self)
    }
}

impl fmt::Display for SignalColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Display colour and numeric value registered for a [`SignalColor`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorPreset {
    /// Colour used when presenting the signal.
    pub rgb: Rgb,
    /// Value contributed by a signal of this colour on completion.
    pub value: f32,
}

/// Fixed mapping from colour name to display colour and numeric value.
///
/// Presets are returned by value, so signals keep their own copy.
#[derive(Clone, Copy, Debug, Default)]
pub struct ColorTable;

impl ColorTable {
    /// Preset registered for the provided colour.
    #[must_use]
    pub const fn preset(color: SignalColor) -> ColorPreset {
        match color {
            SignalColor::Red => ColorPreset {
                rgb: Rgb::from_rgb(255, 70, 70),
                value: -1.0,
            },
            SignalColor::Green => ColorPreset {
                rgb: Rgb::from_rgb(80, 255, 150),
                value: 1.0,
            },
            SignalColor::Blue => ColorPreset {
                rgb: Rgb::from_rgb(90, 160, 255),
                value: 1.5,
            },
        }
    }

    /// Looks a preset up by colour name.
    pub fn lookup(name: &str) -> Result<ColorPreset, CoreError> {
        SignalColor::from_name(name).map(Self::preset)
    }
}

/// Immutable representation of a single signal's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct SignalSnapshot {
    /// Unique identifier assigned to the signal.
    pub id: SignalId,
    /// Lane position currently occupied by the signal.
    pub position: LanePosition,
    /// Current direction of travel.
    pub direction: Direction,
    /// Current colour.
    pub color: SignalColor,
    /// Display colour copied from the colour table.
    pub rgb: Rgb,
    /// Numeric value copied from the colour table.
    pub value: f32,
    /// Number carried by the signal.
    pub number: SignalNumber,
    /// Whether the signal takes part in the move rule.
    pub active: bool,
    /// Whether the sync gate is holding the signal.
    pub paused: bool,
    /// Ticks left before a pause element lets the signal go.
    pub pause_timer: u32,
}

impl SignalSnapshot {
    /// Whether adapters should draw the signal.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.active || self.paused
    }
}

/// Read-only snapshot describing every signal in the live registry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SignalView {
    snapshots: Vec<SignalSnapshot>,
}

impl SignalView {
    /// Creates a new signal view, preserving registry order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<SignalSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &SignalSnapshot> {
        self.snapshots.iter()
    }

    /// Iterator over the snapshots of active signals.
    pub fn active(&self) -> impl Iterator<Item = &SignalSnapshot> {
        self.snapshots.iter().filter(|snapshot| snapshot.active)
    }

    /// Snapshot of the signal with the provided identifier.
    #[must_use]
    pub fn get(&self, id: SignalId) -> Option<&SignalSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == id)
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<SignalSnapshot> {
        self.snapshots
    }
}

/// Read-only view into the board cells.
#[derive(Clone, Copy, Debug)]
pub struct BoardView<'a> {
    cells: &'a [Cell],
    columns: u32,
    rows: u32,
}

impl<'a> BoardView<'a> {
    /// Captures a new board view backed by the provided row-major cell slice.
    #[must_use]
    pub fn new(cells: &'a [Cell], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
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

    /// Row index of the input lane.
    #[must_use]
    pub fn input_lane_row(&self) -> i32 {
        i32::try_from(self.rows).unwrap_or(i32::MAX)
    }

    /// Returns the cell at `(x, y)`, failing outside the grid extent.
    pub fn cell_at(&self, x: i32, y: i32) -> Result<&'a Cell, CoreError> {
        self.grid_cell(LanePosition::new(x, y))
            .and_then(|cell| self.cell(cell))
            .ok_or(CoreError::OutOfBounds {
                x: i64::from(x),
                y: i64::from(y),
                columns: self.columns,
                rows: self.rows,
            })
    }

    /// Returns the cell stored at the provided coordinate, if any.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<&'a Cell> {
        self.index(cell).and_then(|index| self.cells.get(index))
    }

    /// Converts a lane position into a grid cell when it lies inside the grid.
    #[must_use]
    pub fn grid_cell(&self, position: LanePosition) -> Option<CellCoord> {
        let column = u32::try_from(position.x()).ok()?;
        let row = u32::try_from(position.y()).ok()?;
        (column < self.columns && row < self.rows).then(|| CellCoord::new(column, row))
    }

    /// Reports whether a lane position is still on the board.
    ///
    /// The board spans the grid plus the output lane above and the input
    /// lane below it.
    #[must_use]
    pub fn is_on_board(&self, position: LanePosition) -> bool {
        let columns = i64::from(self.columns);
        let rows = i64::from(self.rows);
        let x = i64::from(position.x());
        let y = i64::from(position.y());
        x >= 0 && x < columns && y >= i64::from(OUTPUT_LANE_ROW) && y <= rows
    }

    /// Iterator over every cell paired with its coordinate, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &'a Cell)> + 'a {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, cell)| {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            (CellCoord::new(index % columns, index / columns), cell)
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

/// Translates lane positions into the coordinate space of a consumer.
pub trait LaneMapping {
    /// Point type produced by the mapping.
    type Point: Copy + PartialEq;

    /// Maps a lane position to a point.
    fn map(&self, position: LanePosition) -> Self::Point;
}

/// Identity mapping that keeps lane coordinates untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct LaneCoordinates;

impl LaneMapping for LaneCoordinates {
    type Point = LanePosition;

    fn map(&self, position: LanePosition) -> Self::Point {
        position
    }
}
