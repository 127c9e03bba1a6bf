//! Port traits — the hexagonal boundary between the control loop and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlLoop (domain)
//! ```
//!
//! Driven adapters (ADC, GPIO, MQTT client, task watchdog) implement these
//! traits.  The [`ControlLoop`](super::service::ControlLoop) consumes them
//! via generics, so the timing logic never touches hardware directly and the
//! whole loop runs against mocks on the host.

use core::fmt;

// ───────────────────────────────────────────────────────────────
// Sample port (driven adapter: ADC → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: one raw PPG conversion per call.
pub trait SamplePort {
    /// Read the current raw ADC count (12-bit, 0..=4095).
    fn read_raw(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → GPIO)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the pulse timer and link supervisor drive outputs
/// through this.
pub trait ActuatorPort {
    /// Drive the pacing output (true = active/high).
    fn set_pace(&mut self, high: bool);

    /// Mirror the broker link state on the status LED.
    fn set_link_led(&mut self, lit: bool);
}

// ───────────────────────────────────────────────────────────────
// Watchdog port (driven adapter: domain → TWDT)
// ───────────────────────────────────────────────────────────────

/// Liveness acknowledgement.  Must be fed every loop iteration; a missed
/// window hard-resets the device from hardware.
pub trait WatchdogPort {
    fn feed(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Transport port (driven adapter: domain ↔ MQTT session)
// ───────────────────────────────────────────────────────────────

/// Publish/subscribe transport.  Inbound payloads do not flow through this
/// trait — the adapter delivers them straight to the command router from
/// its receive callback.
pub trait TransportPort {
    /// Establish a fresh broker session.  Bounded: returns within a few
    /// seconds at worst, success or failure.
    fn connect(&mut self) -> Result<(), TransportError>;

    /// Whether the session is currently up.
    fn is_connected(&self) -> bool;

    /// One bounded unit of protocol housekeeping (keepalive, ack
    /// processing).  Called once per loop iteration while connected.
    fn service(&mut self);

    /// Subscribe to a topic on the current session.
    fn subscribe(&mut self, topic: &str) -> Result<(), TransportError>;

    /// Publish a payload (QoS 0, not retained).
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError>;
}

/// Errors from [`TransportPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The broker session could not be established.
    ConnectFailed,
    /// The operation needs a live session and there is none.
    NotConnected,
    /// SUBSCRIBE was rejected or could not be sent.
    SubscribeFailed,
    /// PUBLISH could not be queued or sent.
    PublishFailed,
    /// Underlying driver error (raw ESP-IDF code).
    Driver(i32),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectFailed => write!(f, "connect failed"),
            Self::NotConnected => write!(f, "not connected"),
            Self::SubscribeFailed => write!(f, "subscribe failed"),
            Self::PublishFailed => write!(f, "publish failed"),
            Self::Driver(rc) => write!(f, "driver error (rc={rc})"),
        }
    }
}
