//! System configuration parameters
//!
//! All tunable parameters for the PulsePace controller.  Everything here is
//! fixed at build time — there is no NVS persistence and no runtime
//! reconfiguration; every boot starts from these values.

/// MQTT topic for outbound PPG telemetry.
pub const TOPIC_TELEMETRY: &str = "pulsepace/sensor/ppg";
/// MQTT topic carrying inbound pacing commands.
pub const TOPIC_COMMAND: &str = "pulsepace/pacing/command";
/// MQTT topic for the one-shot announce published on each (re)connect.
pub const TOPIC_STATUS: &str = "pulsepace/device/status";

/// Core system configuration
#[derive(Debug, Clone)]
pub struct FirmwareConfig {
    // --- Sensing ---
    /// PPG sampling rate (Hz).
    pub sample_rate_hz: u32,
    /// Moving-average window applied to raw PPG samples.
    pub filter_window: usize,

    // --- Pacing ---
    /// Width of each pacing pulse (milliseconds).
    pub pulse_width_ms: u64,
    /// Lowest rate a command may set (BPM); lower requests are clamped.
    pub rate_min_bpm: f32,
    /// Highest rate a command may set (BPM); higher requests are clamped.
    pub rate_max_bpm: f32,

    // --- Network ---
    /// WiFi station SSID.
    pub wifi_ssid: &'static str,
    /// WiFi station password (WPA2).
    pub wifi_password: &'static str,
    /// MQTT broker host (bench network address).
    pub broker_host: &'static str,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier.
    pub client_id: &'static str,
    /// Fixed wait between broker reconnect attempts (milliseconds).
    /// Deliberately flat — no exponential growth.
    pub reconnect_delay_ms: u64,
    /// Consecutive connect failures before a persistent-disconnect warning
    /// is logged.  Diagnostic only; retries continue regardless.
    pub max_reconnect_retry: u32,

    // --- Liveness ---
    /// Task watchdog timeout (seconds).  The control loop must feed the
    /// watchdog every iteration or the device resets.
    pub watchdog_timeout_s: u32,
}

impl FirmwareConfig {
    /// Cross-field sanity checks, run once at boot before anything is
    /// constructed from these values.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::Error;

        if self.sample_rate_hz == 0 {
            return Err(Error::Config("sample_rate_hz must be nonzero"));
        }
        if self.filter_window == 0 || self.filter_window > crate::sensors::filter::MAX_WINDOW {
            return Err(Error::Config("filter_window outside supported range"));
        }
        if !(self.rate_min_bpm > 0.0 && self.rate_min_bpm < self.rate_max_bpm) {
            return Err(Error::Config("rate bounds must satisfy 0 < min < max"));
        }
        // The pulse must end well before the next one is due at the
        // fastest allowed rate, or the output degenerates to solid-on.
        let fastest_interval_ms = (60_000.0 / self.rate_max_bpm) as u64;
        if self.pulse_width_ms == 0 || self.pulse_width_ms * 2 >= fastest_interval_ms {
            return Err(Error::Config("pulse_width_ms too wide for rate_max_bpm"));
        }
        if self.reconnect_delay_ms == 0 {
            return Err(Error::Config("reconnect_delay_ms must be nonzero"));
        }
        if self.watchdog_timeout_s == 0 {
            return Err(Error::Config("watchdog_timeout_s must be nonzero"));
        }
        Ok(())
    }
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self {
            // Sensing
            sample_rate_hz: 100, // 10 ms period
            filter_window: 5,

            // Pacing
            pulse_width_ms: 20,
            rate_min_bpm: 30.0,
            rate_max_bpm: 200.0,

            // Network
            wifi_ssid: "PULSEPACE_LAB",
            wifi_password: "medical_grade_iot",
            broker_host: "192.168.1.100",
            broker_port: 1883,
            client_id: "ESP32_PulsePace_01",
            reconnect_delay_ms: 5000,
            max_reconnect_retry: 5,

            // Liveness
            watchdog_timeout_s: 5,
        }
    }
}
