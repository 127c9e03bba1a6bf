//! GPIO / peripheral pin assignments for the PulsePace demo board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Sensors — Analog (ADC1)
// ---------------------------------------------------------------------------

/// PPG (photoplethysmogram) sensor — analog voltage output.
/// ADC1 channel 6 (GPIO 34 on the classic ESP32, input-only pin).
pub const PPG_ADC_GPIO: i32 = 34;

/// ADC1 channel number for the PPG input (GPIO 34 → CH6).
pub const PPG_ADC_CHANNEL: u32 = 6;

// ---------------------------------------------------------------------------
// Actuation output
// ---------------------------------------------------------------------------

/// Pacing pulse output — drives the demo LED (stands in for the
/// stimulation stage).  Push-pull, active HIGH.
pub const PACE_OUT_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Status LED
// ---------------------------------------------------------------------------

/// Link status LED — lit while the MQTT session is up.
pub const STATUS_LED_GPIO: i32 = 4;
