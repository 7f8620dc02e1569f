#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Signal Grid.
//!
//! The world owns the board, the live signal registry, the input queue and
//! the board-wide sync gate. It is mutated exclusively through [`apply`];
//! everything else reads it through the [`query`] module.

mod board;
mod input_queue;
mod signal;
mod sync_gate;

use log::{debug, trace, warn};
use signal_grid_core::{
    BoardView, Cell, CellCoord, Command, Direction, ElementKind, Event, LanePosition,
    SignalColor, SignalId, SignalNumber, MIN_BOARD_COLUMNS, OUTPUT_LANE_ROW,
};

use board::Board;
use input_queue::InputQueue;
use signal::Signal;
use sync_gate::{GateOutcome, SyncGate};

/// Number of grid columns used by [`World::default`].
pub const DEFAULT_COLUMNS: u32 = 9;

/// Number of grid rows used by [`World::default`].
pub const DEFAULT_ROWS: u32 = 9;

/// Represents the authoritative Signal Grid world state.
#[derive(Debug)]
pub struct World {
    board: Board,
    signals: Vec<Signal>,
    input_queue: InputQueue,
    sync_gate: SyncGate,
    next_signal_id: u32,
    tick_index: u64,
}

impl World {
    /// Creates an empty world with a board of the provided dimensions.
    ///
    /// Boards narrower than [`MIN_BOARD_COLUMNS`] or without rows are widened
    /// so that every input queue slot releases onto a grid cell.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        let (requested_columns, requested_rows) = (columns, rows);
        let columns = columns.max(MIN_BOARD_COLUMNS);
        let rows = rows.max(1);
        if (columns, rows) != (requested_columns, requested_rows) {
            warn!(
                "board of {requested_columns}x{requested_rows} cannot hold a released queue, using {columns}x{rows}"
            );
        }

        Self {
            board: Board::new(columns, rows),
            signals: Vec::new(),
            input_queue: InputQueue::default(),
            sync_gate: SyncGate::default(),
            next_signal_id: 0,
            tick_index: 0,
        }
    }

    fn allocate_signal_id(&mut self) -> SignalId {
        let id = SignalId::new(self.next_signal_id);
        self.next_signal_id = self.next_signal_id.wrapping_add(1);
        id
    }

    fn input_lane_row(&self) -> i32 {
        self.board.view().input_lane_row()
    }

    fn advance_signals(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        // Signals released by the sync gate during this tick wait for the next one.
        let movers: Vec<usize> = self
            .signals
            .iter()
            .enumerate()
            .filter(|(_, signal)| signal.active)
            .map(|(index, _)| index)
            .collect();

        let board = self.board.view();
        for index in movers {
            let released = step_signal(
                board,
                &mut self.signals[index],
                &mut self.sync_gate,
                out_events,
            );
            if let Some((trigger, released)) = released {
                unpark_signals(&mut self.signals, trigger, released, out_events);
            }
        }
    }

    fn enqueue_signal(
        &mut self,
        color: SignalColor,
        number: SignalNumber,
        out_events: &mut Vec<Event>,
    ) {
        if self.input_queue.is_full() {
            trace!("input queue full, dropping {color} {}", number.get());
            return;
        }

        let slot = self.input_queue.len();
        let position = LanePosition::new(slot_column(slot), self.input_lane_row());
        let id = self.allocate_signal_id();
        let mut signal = Signal::new(id, position, Direction::Up, color, number);
        signal.active = false;

        match self.input_queue.push(signal) {
            Ok(slot) => out_events.push(Event::SignalQueued { signal: id, slot }),
            Err(rejected) => trace!("input queue rejected signal {}", rejected.id.get()),
        }
    }

    fn release_input_queue(&mut self, out_events: &mut Vec<Event>) {
        let Some(batch) = self.input_queue.take_full_batch() else {
            return;
        };

        let bottom_row = self.input_lane_row().saturating_sub(1);
        let mut released = Vec::with_capacity(batch.len());
        for (slot, mut signal) in batch.into_iter().enumerate() {
            signal.position = LanePosition::new(slot_column(slot), bottom_row);
            signal.direction = Direction::Up;
            signal.active = true;
            released.push(signal.id);
            self.signals.push(signal);
        }

        debug!("released input queue onto the grid: {released:?}");
        out_events.push(Event::InputQueueReleased { signals: released });
    }

    fn inject_signal(
        &mut self,
        position: LanePosition,
        direction: Direction,
        color: SignalColor,
        number: SignalNumber,
        out_events: &mut Vec<Event>,
    ) {
        let id = self.allocate_signal_id();
        self.signals
            .push(Signal::new(id, position, direction, color, number));
        out_events.push(Event::SignalInjected {
            signal: id,
            position,
        });
    }

    fn edit_cell<F>(&mut self, cell: CellCoord, edit: F, out_events: &mut Vec<Event>)
    where
        F: FnOnce(&mut Cell),
    {
        match self.board.cell_mut(cell) {
            Ok(slot) => {
                edit(slot);
                out_events.push(Event::CellChanged { cell, state: *slot });
            }
            Err(error) => out_events.push(Event::EditRejected { cell, error }),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMNS, DEFAULT_ROWS)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => world.advance_signals(out_events),
        Command::SpawnSignal { color, number } => world.enqueue_signal(color, number, out_events),
        Command::ReleaseInputQueue => world.release_input_queue(out_events),
        Command::InjectSignal {
            position,
            direction,
            color,
            number,
        } => world.inject_signal(position, direction, color, number, out_events),
        Command::CycleArrow { cell } => world.edit_cell(
            cell,
            |slot| slot.arrow = Direction::cycle(slot.arrow),
            out_events,
        ),
        Command::SetArrow { cell, arrow } => {
            world.edit_cell(cell, |slot| slot.arrow = arrow, out_events);
        }
        Command::PlaceElement { cell, element } => {
            world.edit_cell(cell, |slot| slot.element = element, out_events);
        }
    }
}

/// Applies the move rule to a single signal.
///
/// Returns the signals the sync gate let go, paired with the signal that
/// opened it, so the caller can reactivate them.
fn step_signal(
    board: BoardView<'_>,
    signal: &mut Signal,
    sync_gate: &mut SyncGate,
    out_events: &mut Vec<Event>,
) -> Option<(SignalId, Vec<SignalId>)> {
    let from = signal.position;
    let mut released = None;

    let resolved = board
        .grid_cell(from)
        .and_then(|coord| board.cell(coord).map(|cell| (coord, *cell)));
    match resolved {
        Some((coord, cell)) => match resolve_cell(signal, coord, cell, sync_gate, out_events) {
            CellOutcome::Parked => return None,
            CellOutcome::Resolved { unparked } => released = unparked,
        },
        None => signal.position = from.step(signal.direction),
    }

    signal.forget_left_cells();

    let to = signal.position;
    if to.y() == board.input_lane_row() {
        signal.direction = Direction::Up;
    }

    if to != from {
        trace!("signal {} advanced {from} -> {to}", signal.id.get());
        out_events.push(Event::SignalAdvanced {
            signal: signal.id,
            from,
            to,
        });
    }

    if !board.is_on_board(to) {
        signal.active = false;
        debug!("signal {} left the board at {to}", signal.id.get());
        out_events.push(Event::SignalExited {
            signal: signal.id,
            position: to,
        });
    } else if to != from && to.y() == OUTPUT_LANE_ROW {
        debug!(
            "signal {} completed as {} {}",
            signal.id.get(),
            signal.color(),
            signal.number.get()
        );
        out_events.push(Event::SignalCompleted {
            signal: signal.id,
            color: signal.color(),
            number: signal.number,
            value: signal.value(),
        });
    }

    released.map(|ids| (signal.id, ids))
}

enum CellOutcome {
    Parked,
    Resolved { unparked: Option<Vec<SignalId>> },
}

/// Resolves convert, sync, pause and arrow effects, then translates.
fn resolve_cell(
    signal: &mut Signal,
    coord: CellCoord,
    cell: Cell,
    sync_gate: &mut SyncGate,
    out_events: &mut Vec<Event>,
) -> CellOutcome {
    let here = signal.position;
    let mut unparked = None;

    if cell.element == Some(ElementKind::Convert) && signal.color() == SignalColor::Red {
        signal.set_color(SignalColor::Blue);
        out_events.push(Event::SignalConverted {
            signal: signal.id,
            from: SignalColor::Red,
            to: SignalColor::Blue,
        });
    }

    if cell.element == Some(ElementKind::Sync) && signal.sync_cell != Some(here) {
        match sync_gate.hit(signal.id) {
            GateOutcome::Parked => {
                signal.park();
                debug!("signal {} parked at sync cell {here}", signal.id.get());
                out_events.push(Event::SignalParked {
                    signal: signal.id,
                    cell: coord,
                });
                return CellOutcome::Parked;
            }
            GateOutcome::Released(ids) => unparked = Some(ids),
        }
    }

    if let Some(ElementKind::Pause(ticks)) = cell.element {
        if signal.pause_timer == 0 {
            signal.pause_timer = ticks;
            signal.pause_cell = Some(here);
        } else {
            signal.pause_timer -= 1;
        }

        if signal.pause_timer > 0 {
            out_events.push(Event::SignalHeld {
                signal: signal.id,
                cell: coord,
                remaining: signal.pause_timer,
            });
        }
    }

    if let Some(arrow) = cell.arrow {
        signal.direction = arrow;
    }

    if signal.pause_timer == 0 {
        signal.position = here.step(signal.direction);
    }

    CellOutcome::Resolved { unparked }
}

fn unpark_signals(
    signals: &mut [Signal],
    trigger: SignalId,
    released: Vec<SignalId>,
    out_events: &mut Vec<Event>,
) {
    for signal in signals
        .iter_mut()
        .filter(|signal| released.contains(&signal.id))
    {
        signal.unpark();
    }

    debug!("sync gate opened by {}: {released:?}", trigger.get());
    out_events.push(Event::SignalsUnparked { trigger, released });
}

fn slot_column(slot: usize) -> i32 {
    i32::try_from(slot).unwrap_or(i32::MAX)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use signal_grid_core::{BoardView, SignalId, SignalView};

    /// Read-only view of the board cells.
    #[must_use]
    pub fn board(world: &World) -> BoardView<'_> {
        world.board.view()
    }

    /// Captures the live signal registry in registry order.
    #[must_use]
    pub fn signal_view(world: &World) -> SignalView {
        SignalView::from_snapshots(world.signals.iter().map(|signal| signal.snapshot()).collect())
    }

    /// Captures the signals waiting in the input queue in slot order.
    #[must_use]
    pub fn input_queue(world: &World) -> SignalView {
        SignalView::from_snapshots(
            world
                .input_queue
                .iter()
                .map(|signal| signal.snapshot())
                .collect(),
        )
    }

    /// Signals currently parked by the sync gate.
    #[must_use]
    pub fn parked_signals(world: &World) -> &[SignalId] {
        world.sync_gate.parked()
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
