//! Outbound wire messages.
//!
//! Telemetry and the connect announce are plain JSON; the dashboard side
//! consumes both.  Shapes here are the contract — change a field name and
//! the bench tooling breaks.

use serde::Serialize;

/// One smoothed PPG observation.
///
/// `ppg` is rounded to two decimals before serialisation so the wire value
/// is stable regardless of float noise in the filter arithmetic.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PpgTelemetry {
    pub ppg: f64,
    /// Milliseconds since boot.
    pub ts: u64,
}

impl PpgTelemetry {
    pub fn new(value: f32, ts_ms: u64) -> Self {
        Self {
            ppg: round2(value),
            ts: ts_ms,
        }
    }
}

fn round2(value: f32) -> f64 {
    (f64::from(value) * 100.0).round() / 100.0
}

/// Published once on every successful (re)connect.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatusAnnounce {
    pub status: &'static str,
    pub fw_version: &'static str,
}

impl StatusAnnounce {
    pub fn connected() -> Self {
        Self {
            status: "connected",
            fw_version: env!("CARGO_PKG_VERSION"),
        }
    }
}
