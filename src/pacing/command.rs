//! Inbound pacing command validation.
//!
//! Commands arrive as JSON on the command topic:
//!
//! ```json
//! {"pacing_command": {"pacing_enabled": true, "target_rate_bpm": 72}}
//! ```
//!
//! Both inner fields are optional (`false` / `60.0` when absent).  This
//! parser is the sole gate on the rate safety bounds: whatever rate a
//! command requests, the setpoint handed to the pulse timer is already
//! inside `[rate_min_bpm, rate_max_bpm]`.  A payload that cannot be decoded
//! is discarded whole — a command is applied fully or not at all.

use core::fmt;

use serde::Deserialize;

use crate::config::FirmwareConfig;

/// Default rate when `target_rate_bpm` is absent from a command.
pub const DEFAULT_RATE_BPM: f32 = 60.0;

/// The commanded pacing target.  Replaced wholesale by each accepted
/// command; never mutated field-by-field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacingSetpoint {
    /// Whether pulse generation is active.
    pub enabled: bool,
    /// Pulse rate in beats per minute, already clamped to the safe range.
    pub rate_bpm: f32,
}

impl Default for PacingSetpoint {
    /// Boot state: pacing off at the nominal rate.
    fn default() -> Self {
        Self {
            enabled: false,
            rate_bpm: DEFAULT_RATE_BPM,
        }
    }
}

/// Why a command payload was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Payload is not decodable JSON (or has mistyped fields).
    Malformed,
    /// Valid JSON, but the `pacing_command` object is missing.
    SchemaMismatch,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed payload"),
            Self::SchemaMismatch => write!(f, "missing pacing_command object"),
        }
    }
}

// ── Wire shape ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CommandEnvelope {
    pacing_command: Option<PacingFields>,
}

#[derive(Debug, Deserialize)]
struct PacingFields {
    #[serde(default)]
    pacing_enabled: bool,
    #[serde(default = "default_rate_bpm")]
    target_rate_bpm: f32,
}

fn default_rate_bpm() -> f32 {
    DEFAULT_RATE_BPM
}

// ── Parser ────────────────────────────────────────────────────

/// Decodes and range-clamps command payloads.
#[derive(Debug, Clone, Copy)]
pub struct CommandParser {
    min_bpm: f32,
    max_bpm: f32,
}

impl CommandParser {
    pub fn new(config: &FirmwareConfig) -> Self {
        Self {
            min_bpm: config.rate_min_bpm,
            max_bpm: config.rate_max_bpm,
        }
    }

    /// Decode one payload into a setpoint.
    ///
    /// On any error the caller keeps its previous setpoint; nothing is
    /// partially applied.
    pub fn parse(&self, payload: &[u8]) -> Result<PacingSetpoint, CommandError> {
        let envelope: CommandEnvelope =
            serde_json::from_slice(payload).map_err(|_| CommandError::Malformed)?;
        let fields = envelope.pacing_command.ok_or(CommandError::SchemaMismatch)?;

        Ok(PacingSetpoint {
            enabled: fields.pacing_enabled,
            rate_bpm: fields.target_rate_bpm.clamp(self.min_bpm, self.max_bpm),
        })
    }
}
