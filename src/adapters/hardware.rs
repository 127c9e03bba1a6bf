//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the PPG sensor and both outputs, exposing them through
//! [`SamplePort`] and [`ActuatorPort`].  Generic over the pace pin so the
//! ESP32 build hands in a `PinDriver` while host tests hand in a mock;
//! the remaining peripherals use cfg-gated simulation stubs underneath.

use embedded_hal::digital::OutputPin;

use crate::app::ports::{ActuatorPort, SamplePort};
use crate::drivers::pace_output::PaceOutput;
use crate::drivers::status_led::StatusLed;
use crate::sensors::ppg::PpgSensor;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P: OutputPin> {
    ppg: PpgSensor,
    pace: PaceOutput<P>,
    led: StatusLed,
}

impl<P: OutputPin> HardwareAdapter<P> {
    pub fn new(ppg: PpgSensor, pace: PaceOutput<P>, led: StatusLed) -> Self {
        Self { ppg, pace, led }
    }

    pub fn pace_is_high(&self) -> bool {
        self.pace.is_high()
    }

    pub fn led_is_lit(&self) -> bool {
        self.led.is_lit()
    }
}

// ── SamplePort implementation ─────────────────────────────────

impl<P: OutputPin> SamplePort for HardwareAdapter<P> {
    fn read_raw(&mut self) -> u16 {
        self.ppg.read_raw()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<P: OutputPin> ActuatorPort for HardwareAdapter<P> {
    fn set_pace(&mut self, high: bool) {
        self.pace.set(high);
    }

    fn set_link_led(&mut self, lit: bool) {
        self.led.set(lit);
    }
}
