//! Left-packed staging area for freshly spawned signals.

use signal_grid_core::INPUT_QUEUE_CAPACITY;

use crate::signal::Signal;

#[derive(Clone, Debug, Default)]
pub(crate) struct InputQueue {
    pending: Vec<Signal>,
}

impl InputQueue {
    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn is_full(&self) -> bool {
        self.pending.len() >= INPUT_QUEUE_CAPACITY
    }

    /// Appends a signal, returning its slot, or hands it back when full.
    pub(crate) fn push(&mut self, signal: Signal) -> Result<usize, Signal> {
        if self.is_full() {
            return Err(signal);
        }
        self.pending.push(signal);
        Ok(self.pending.len() - 1)
    }

    /// Empties the queue only when every slot is taken.
    pub(crate) fn take_full_batch(&mut self) -> Option<Vec<Signal>> {
        if self.pending.len() == INPUT_QUEUE_CAPACITY {
            Some(std::mem::take(&mut self.pending))
        } else {
            None
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Signal> {
        self.pending.iter()
    }
}
