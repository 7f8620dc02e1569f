//! Mutable per-signal state owned by the world.

use signal_grid_core::{
    ColorPreset, Direction, LanePosition, SignalColor, SignalId, SignalNumber, SignalSnapshot,
};

#[derive(Clone, Debug)]
pub(crate) struct Signal {
    pub(crate) id: SignalId,
    pub(crate) position: LanePosition,
    pub(crate) direction: Direction,
    pub(crate) number: SignalNumber,
    pub(crate) active: bool,
    pub(crate) pause_timer: u32,
    pub(crate) paused: bool,
    /// Pause cell that armed the current timer.
    pub(crate) pause_cell: Option<LanePosition>,
    /// Sync cell the signal was released on and has not left yet.
    pub(crate) sync_cell: Option<LanePosition>,
    color: SignalColor,
    preset: ColorPreset,
}

impl Signal {
    pub(crate) fn new(
        id: SignalId,
        position: LanePosition,
        direction: Direction,
        color: SignalColor,
        number: SignalNumber,
    ) -> Self {
        Self {
            id,
            position,
            direction,
            number,
            active: true,
            pause_timer: 0,
            paused: false,
            pause_cell: None,
            sync_cell: None,
            color,
            preset: color.preset(),
        }
    }

    pub(crate) fn color(&self) -> SignalColor {
        self.color
    }

    pub(crate) fn value(&self) -> f32 {
        self.preset.value
    }

    /// Replaces colour, display colour and value together.
    pub(crate) fn set_color(&mut self, color: SignalColor) {
        self.color = color;
        self.preset = color.preset();
    }

    pub(crate) fn park(&mut self) {
        self.active = false;
        self.paused = true;
    }

    pub(crate) fn unpark(&mut self) {
        self.active = true;
        self.paused = false;
        self.sync_cell = Some(self.position);
    }

    /// Drops cell associations the signal has moved away from.
    pub(crate) fn forget_left_cells(&mut self) {
        if self.pause_cell.is_some_and(|cell| cell != self.position) {
            self.pause_cell = None;
        }
        if self.sync_cell.is_some_and(|cell| cell != self.position) {
            self.sync_cell = None;
        }
    }

    pub(crate) fn snapshot(&self) -> SignalSnapshot {
        SignalSnapshot {
            id: self.id,
            position: self.position,
            direction: self.direction,
            color: self.color,
            rgb: self.preset.rgb,
            value: self.preset.value,
            number: self.number,
            active: self.active,
            paused: self.paused,
            pause_timer: self.pause_timer,
        }
    }
}
