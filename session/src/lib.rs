#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Simulation session that wires the world to its systems.
//!
//! A [`Session`] owns the authoritative [`World`] together with the spawning,
//! editing and path projection systems. [`Session::update`] runs one tick in
//! the fixed order move, spawn, release; [`Session::advance`] converts elapsed
//! frame time into ticks through a [`TickClock`].

mod clock;

use std::time::Duration;

use log::{debug, trace};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use signal_grid_core::{BoardView, Command, Event, LaneMapping, SignalId, SignalView};
use signal_grid_system_editing::Editor;
use signal_grid_system_path_projection::PathProjector;
use signal_grid_system_spawning::{self as spawning, Spawning};
use signal_grid_world::{self as world, query, World, DEFAULT_COLUMNS, DEFAULT_ROWS};

pub use clock::{TickClock, DEFAULT_TICK_INTERVAL};
pub use signal_grid_system_editing::EditInput;
pub use signal_grid_system_path_projection::{Projection, Termination};

/// Parameters required to construct a [`Session`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Number of grid columns.
    pub columns: u32,
    /// Number of grid rows.
    pub rows: u32,
    /// Spawning system configuration.
    pub spawning: spawning::Config,
    /// Wall-clock time between ticks when driven through [`Session::advance`].
    pub tick_interval: Duration,
}

impl SessionConfig {
    /// Creates a configuration for a board of the provided size.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, spawning: spawning::Config) -> Self {
        Self {
            columns,
            rows,
            spawning,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }

    /// Replaces the tick interval.
    #[must_use]
    pub const fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMNS, DEFAULT_ROWS, spawning::Config::new(0))
    }
}

/// Running simulation composed of the world and its systems.
#[derive(Debug)]
pub struct Session<R = ChaCha8Rng> {
    world: World,
    spawning: Spawning<R>,
    editor: Editor,
    projector: PathProjector,
    clock: TickClock,
}

impl Session<ChaCha8Rng> {
    /// Creates a session whose spawner draws from a seeded ChaCha stream.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self::from_parts(config, Spawning::new(config.spawning))
    }
}

impl<R: Rng> Session<R> {
    /// Creates a session whose spawner draws from the provided random source.
    #[must_use]
    pub fn with_rng(config: SessionConfig, rng: R) -> Self {
        Self::from_parts(config, Spawning::with_rng(rng, config.spawning.is_enabled()))
    }

    fn from_parts(config: SessionConfig, spawning: Spawning<R>) -> Self {
        Self {
            world: World::new(config.columns, config.rows),
            spawning,
            editor: Editor::new(),
            projector: PathProjector::new(),
            clock: TickClock::new(config.tick_interval),
        }
    }

    /// Runs a single tick: move every active signal, spawn, then release.
    pub fn update(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick, &mut events);

        let mut commands = Vec::new();
        self.spawning.handle(&events, &mut commands);
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        world::apply(&mut self.world, Command::ReleaseInputQueue, &mut events);

        debug!(
            "tick {} produced {} events",
            query::tick_index(&self.world),
            events.len()
        );
        events
    }

    /// Feeds elapsed frame time to the tick clock and runs every due tick.
    pub fn advance(&mut self, dt: Duration) -> Vec<Event> {
        let ticks = self.clock.advance(dt);
        if ticks > 1 {
            trace!("catching up {ticks} ticks");
        }

        let mut events = Vec::new();
        for _ in 0..ticks {
            events.extend(self.update());
        }
        events
    }

    /// Applies a single command directly to the world.
    pub fn apply(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        events
    }

    /// Routes pointer input through the editing system.
    pub fn edit(&mut self, input: EditInput) -> Vec<Event> {
        let mut commands = Vec::new();
        self.editor.handle(input, &mut commands);

        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        events
    }

    /// Read-only view of the board.
    #[must_use]
    pub fn board(&self) -> BoardView<'_> {
        query::board(&self.world)
    }

    /// Snapshot of every signal in the live registry.
    #[must_use]
    pub fn signals(&self) -> SignalView {
        query::signal_view(&self.world)
    }

    /// Snapshot of the signals waiting in the input queue.
    #[must_use]
    pub fn input_queue(&self) -> SignalView {
        query::input_queue(&self.world)
    }

    /// Signals currently parked by the sync gate.
    #[must_use]
    pub fn parked_signals(&self) -> &[SignalId] {
        query::parked_signals(&self.world)
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(&self) -> u64 {
        query::tick_index(&self.world)
    }

    /// Tick clock driving [`Session::advance`].
    #[must_use]
    pub fn clock(&self) -> &TickClock {
        &self.clock
    }

    /// Projects the path a free signal released from `column` would take.
    #[must_use]
    pub fn projection(&self, column: u32) -> Projection {
        self.projector.project(self.board(), column)
    }

    /// Projected preview path for every column, mapped through `mapping`.
    #[must_use]
    pub fn preview_paths<M>(&self, mapping: &M) -> Vec<Vec<M::Point>>
    where
        M: LaneMapping,
    {
        self.projector.simulate_all(self.board(), mapping)
    }
}
