//! Setpoint hand-off between the receive callback and the control loop.
//!
//! The MQTT receive callback runs on the client's own task, concurrently
//! with the loop.  It must never drive actuation logic itself; it deposits
//! the parsed setpoint here and the loop picks it up at a well-defined point
//! in its iteration.  The slot holds one value and every deposit replaces
//! the previous one whole — the loop can never observe a half-written
//! setpoint, and a burst of commands collapses to the newest.

use std::sync::Arc;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::pacing::command::PacingSetpoint;

/// Single-slot, latest-wins setpoint mailbox.  `Clone` shares the slot.
#[derive(Clone)]
pub struct SetpointMailbox {
    slot: Arc<Signal<CriticalSectionRawMutex, PacingSetpoint>>,
}

impl SetpointMailbox {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Signal::new()),
        }
    }

    /// Deposit a setpoint, replacing any value not yet collected.
    pub fn replace(&self, setpoint: PacingSetpoint) {
        self.slot.signal(setpoint);
    }

    /// Collect the pending setpoint, if any, emptying the slot.
    pub fn take(&self) -> Option<PacingSetpoint> {
        self.slot.try_take()
    }
}

impl Default for SetpointMailbox {
    fn default() -> Self {
        Self::new()
    }
}
