//! Sampling cadence gate.
//!
//! Decides, once per loop iteration, whether the sampling period has elapsed
//! and a fresh ADC conversion should be pulled.  No timer interrupts — the
//! loop polls and the gate compares timestamps.

use crate::app::ports::SamplePort;

/// Pulls one reading from a [`SamplePort`] every `period` milliseconds.
///
/// On firing, the reference timestamp is set to `now` rather than advanced
/// by one period, so a late iteration shifts the schedule instead of
/// triggering a catch-up burst.  Sampling drift is acceptable; bursts are
/// not.
#[derive(Debug, Clone)]
pub struct SampleGate {
    period_ms: u64,
    last_sample_ms: u64,
}

impl SampleGate {
    /// Gate for the given sampling rate.  Rates above 1 kHz saturate to a
    /// 1 ms period (one sample per iteration at best).
    pub fn new(rate_hz: u32) -> Self {
        Self {
            period_ms: u64::from(1000 / rate_hz.clamp(1, 1000)),
            last_sample_ms: 0,
        }
    }

    /// Sampling period in milliseconds.
    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// Pull a reading if the period has elapsed, else `None`.
    pub fn poll(&mut self, now_ms: u64, src: &mut impl SamplePort) -> Option<u16> {
        if now_ms.saturating_sub(self.last_sample_ms) < self.period_ms {
            return None;
        }
        self.last_sample_ms = now_ms;
        Some(src.read_raw())
    }
}
