//! Pacing subsystem — setpoint validation and pulse generation.
//!
//! [`CommandParser`](command::CommandParser) turns inbound JSON into a
//! clamped [`PacingSetpoint`](command::PacingSetpoint);
//! [`PulseTimer`](timer::PulseTimer) turns the setpoint into timed output
//! edges.  The parser is the only place rate bounds are enforced.

pub mod command;
pub mod timer;
