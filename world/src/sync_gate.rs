//! Board-wide rendezvous shared by every sync cell.

use signal_grid_core::SignalId;

/// Result of a signal reaching a sync cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum GateOutcome {
    /// The gate was empty and now holds the arriving signal.
    Parked,
    /// The gate was holding signals and let all of them go.
    Released(Vec<SignalId>),
}

/// Two-phase gate: an arrival either parks or releases everything parked.
#[derive(Clone, Debug, Default)]
pub(crate) struct SyncGate {
    parked: Vec<SignalId>,
}

impl SyncGate {
    pub(crate) fn hit(&mut self, signal: SignalId) -> GateOutcome {
        if self.parked.is_empty() {
            self.parked.push(signal);
            GateOutcome::Parked
        } else {
            GateOutcome::Released(std::mem::take(&mut self.parked))
        }
    }

    pub(crate) fn parked(&self) -> &[SignalId] {
        &self.parked
    }
}
