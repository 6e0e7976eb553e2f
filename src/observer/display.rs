//! Local display shadow of the engine's count
//!
//! Renderers animate digit flips between engine ticks. The shadow remembers
//! what is on screen and what was there before, and is pulled toward every
//! value the engine publishes. It never feeds anything back to the engine.

use crate::state::CountdownState;
use crate::utils::format_remaining;

/// Which time units changed between two displayed values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlipSet {
    pub hours: bool,
    pub minutes: bool,
    pub seconds: bool,
}

impl FlipSet {
    pub fn all() -> Self {
        Self {
            hours: true,
            minutes: true,
            seconds: true,
        }
    }

    pub fn between(from: u64, to: u64) -> Self {
        Self {
            hours: from / 3600 != to / 3600,
            minutes: (from % 3600) / 60 != (to % 3600) / 60,
            seconds: from % 60 != to % 60,
        }
    }

    pub fn any(&self) -> bool {
        self.hours || self.minutes || self.seconds
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayShadow {
    run_id: u64,
    shown: u64,
    previous: u64,
}

impl DisplayShadow {
    pub fn new(state: &CountdownState) -> Self {
        Self {
            run_id: state.run_id,
            shown: state.remaining_seconds,
            // One above the start so the first frame flips in
            previous: state.remaining_seconds.saturating_add(1),
        }
    }

    pub fn shown(&self) -> u64 {
        self.shown
    }

    pub fn previous(&self) -> u64 {
        self.previous
    }

    pub fn formatted(&self) -> String {
        format_remaining(self.shown)
    }

    /// Move toward the published state and report what needs to flip
    pub fn reconcile(&mut self, state: &CountdownState) -> FlipSet {
        if state.run_id != self.run_id {
            *self = Self::new(state);
            return FlipSet::all();
        }
        if state.remaining_seconds == self.shown {
            return FlipSet::default();
        }

        self.previous = self.shown;
        self.shown = state.remaining_seconds;
        FlipSet::between(self.previous, self.shown)
    }
}
