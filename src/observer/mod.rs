//! UI-side observer of the countdown engine
//!
//! An [`Observer`] is what a display layer holds while it is visible: attach
//! when it appears, drop (or [`Observer::detach`]) when it goes away.

pub mod display;
pub mod time_selection;

use tokio::sync::watch;
use tracing::debug;

pub use display::{DisplayShadow, FlipSet};
pub use time_selection::{validate_duration, InputError, TimeSelection};

use crate::{engine::EngineHandle, state::CountdownState};

/// One render-worthy update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub state: CountdownState,
    pub flips: FlipSet,
    pub display: String,
}

#[derive(Debug)]
pub struct Observer {
    updates: watch::Receiver<CountdownState>,
    shadow: DisplayShadow,
}

impl Observer {
    pub fn attach(engine: &EngineHandle) -> Self {
        let mut updates = engine.subscribe();
        let shadow = DisplayShadow::new(&updates.borrow_and_update());
        debug!("Observer attached ({} total)", engine.observer_count());
        Self { updates, shadow }
    }

    pub fn current(&self) -> CountdownState {
        self.updates.borrow().clone()
    }

    pub fn shadow(&self) -> &DisplayShadow {
        &self.shadow
    }

    /// Wait for the next published state. `None` once the engine is gone.
    pub async fn next_frame(&mut self) -> Option<Frame> {
        self.updates.changed().await.ok()?;
        let state = self.updates.borrow_and_update().clone();
        let flips = self.shadow.reconcile(&state);
        Some(Frame {
            display: self.shadow.formatted(),
            state,
            flips,
        })
    }

    pub fn detach(self) {
        debug!("Observer detached");
    }
}
