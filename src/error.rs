#![allow(dead_code)] // Funnel conversions reserved for typed port returns

//! Unified error types for the PulsePace firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level bring-up path's error handling uniform.  All variants are `Copy`
//! so they can be cheaply passed around without allocation.

use core::fmt;

use crate::app::ports::TransportError;
use crate::pacing::command::CommandError;

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An inbound pacing command could not be applied.
    Command(CommandError),
    /// The MQTT transport failed.
    Transport(TransportError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(e) => write!(f, "command: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
