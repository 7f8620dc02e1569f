#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawning system responsible for feeding the input queue.
//!
//! Every processed tick draws a uniformly random colour and number and emits a
//! [`Command::SpawnSignal`]. The world decides whether the queue has room, so
//! the random stream advances identically whether or not the spawn lands.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use signal_grid_core::{
    Command, Event, SignalColor, SignalNumber, MAX_SIGNAL_NUMBER, MIN_SIGNAL_NUMBER,
};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    rng_seed: u64,
    enabled: bool,
}

impl Config {
    /// Creates an enabled configuration seeded with the provided value.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            enabled: true,
        }
    }

    /// Creates a configuration that never spawns, for scripted harnesses.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            rng_seed: 0,
            enabled: false,
        }
    }

    /// Reports whether the spawn rule runs.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Seed used for the default random source.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

/// System that turns elapsed ticks into spawn commands.
#[derive(Debug)]
pub struct Spawning<R = ChaCha8Rng> {
    rng: R,
    enabled: bool,
}

impl Spawning<ChaCha8Rng> {
    /// Creates a spawning system backed by a seeded ChaCha stream.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(config.rng_seed), config.enabled)
    }
}

impl<R: Rng> Spawning<R> {
    /// Creates a spawning system drawing from the provided random source.
    #[must_use]
    pub fn with_rng(rng: R, enabled: bool) -> Self {
        Self { rng, enabled }
    }

    /// Emits one spawn command for every tick reported in `events`.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        if !self.enabled {
            return;
        }

        for event in events {
            if let Event::TimeAdvanced { .. } = event {
                out.push(self.next_spawn());
            }
        }
    }

    fn next_spawn(&mut self) -> Command {
        let color = SignalColor::ALL[self.rng.gen_range(0..SignalColor::ALL.len())];
        let number = self.rng.gen_range(MIN_SIGNAL_NUMBER..=MAX_SIGNAL_NUMBER);
        Command::SpawnSignal {
            color,
            number: SignalNumber::saturating(number),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_config_never_spawns() {
        let mut spawning = Spawning::new(Config::disabled());
        let mut commands = Vec::new();
        spawning.handle(&[Event::TimeAdvanced { tick: 1 }], &mut commands);
        assert!(commands.is_empty());
    }

    #[test]
    fn config_exposes_seed() {
        let config = Config::new(0xfeed);
        assert!(config.is_enabled());
        assert_eq!(config.rng_seed(), 0xfeed);
    }
}
