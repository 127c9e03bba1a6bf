//! Broker connection supervisor.
//!
//! Keeps the MQTT session alive without ever stalling the control loop:
//! one cheap timestamp comparison per iteration while disconnected, one
//! bounded connect attempt per retry window, and a single housekeeping call
//! per iteration while connected.
//!
//! The retry interval is flat.  Exponential backoff buys nothing on a bench
//! network where the broker is either there or it is not, and a flat window
//! keeps worst-case reconnect latency predictable.

use log::{info, warn};

use crate::app::ports::{TransportError, TransportPort};
use crate::config::{self, FirmwareConfig};
use crate::net::messages::StatusAnnounce;

/// Link lifecycle, as observed by the rest of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkPhase {
    /// No session; waiting out the retry window.
    Disconnected,
    /// A connect attempt is in flight this iteration.
    Connecting,
    /// Session up; publishes will be attempted.
    Connected,
}

/// Drives a [`TransportPort`] toward eventual connectivity.
pub struct ConnectionSupervisor {
    phase: LinkPhase,
    retry_delay_ms: u64,
    /// `None` until the first attempt, so boot connects immediately
    /// instead of waiting out a full retry window.
    last_attempt_ms: Option<u64>,
    consecutive_failures: u32,
    alarm_after: u32,
}

impl ConnectionSupervisor {
    pub fn new(config: &FirmwareConfig) -> Self {
        Self {
            phase: LinkPhase::Disconnected,
            retry_delay_ms: config.reconnect_delay_ms,
            last_attempt_ms: None,
            consecutive_failures: 0,
            alarm_after: config.max_reconnect_retry,
        }
    }

    pub fn phase(&self) -> LinkPhase {
        self.phase
    }

    /// Connect failures since the session last came up (diagnostics).
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// One supervision pass.  Never blocks beyond a single bounded connect
    /// attempt, and attempts at most once per retry window.
    pub fn tick(&mut self, now_ms: u64, transport: &mut impl TransportPort) -> LinkPhase {
        if transport.is_connected() {
            transport.service();
            self.phase = LinkPhase::Connected;
            self.consecutive_failures = 0;
            return self.phase;
        }

        if self.phase == LinkPhase::Connected {
            warn!("Link: session lost");
        }

        let due = match self.last_attempt_ms {
            None => true,
            Some(at) => now_ms.saturating_sub(at) >= self.retry_delay_ms,
        };
        if !due {
            self.phase = LinkPhase::Disconnected;
            return self.phase;
        }

        self.last_attempt_ms = Some(now_ms);
        self.phase = LinkPhase::Connecting;

        match self.establish(transport) {
            Ok(()) => {
                info!("Link: connected, command subscription active");
                self.phase = LinkPhase::Connected;
                self.consecutive_failures = 0;
            }
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                warn!(
                    "Link: connect attempt failed ({e}), retry in {} ms",
                    self.retry_delay_ms
                );
                if self.consecutive_failures == self.alarm_after {
                    // Diagnostic only.  Retries continue at the same pace;
                    // there is no give-up ceiling.
                    warn!(
                        "Link: {} consecutive failures, broker unreachable",
                        self.consecutive_failures
                    );
                }
                self.phase = LinkPhase::Disconnected;
            }
        }
        self.phase
    }

    /// Fresh session bring-up: connect, resubscribe, announce.
    fn establish(&mut self, transport: &mut impl TransportPort) -> Result<(), TransportError> {
        transport.connect()?;
        transport.subscribe(config::TOPIC_COMMAND)?;
        let announce = serde_json::to_vec(&StatusAnnounce::connected()).unwrap_or_default();
        transport.publish(config::TOPIC_STATUS, &announce)?;
        Ok(())
    }
}
