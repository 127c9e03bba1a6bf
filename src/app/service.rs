//! The control loop — cooperative scheduling core.
//!
//! One [`iterate`](ControlLoop::iterate) call is one pass of the firmware's
//! only execution context.  The order inside is the priority contract:
//!
//! 1. feed the watchdog (miss one pass and hardware resets us),
//! 2. link supervision (cheap while waiting, bounded while connecting),
//! 3. apply the freshest setpoint, tick the pulse timer,
//! 4. sample/filter/publish telemetry,
//!
//! with the yield owned by the caller's outer loop.  Nothing here blocks
//! beyond the supervisor's bounded connect attempt, so pulse edges stay on
//! their millisecond budget.
//!
//! ```text
//!  SamplePort ──▶ ┌─────────────────────────────┐ ──▶ TransportPort
//!                 │         ControlLoop         │
//! ActuatorPort ◀──│  gate · filter · pacer ·    │ ◀── SetpointMailbox
//!                 │  link supervisor            │      (from callback)
//!                 └─────────────────────────────┘
//! ```

use log::{debug, warn};

use crate::app::mailbox::SetpointMailbox;
use crate::app::ports::{ActuatorPort, SamplePort, TransportPort, WatchdogPort};
use crate::config::{self, FirmwareConfig};
use crate::net::messages::PpgTelemetry;
use crate::net::supervisor::{ConnectionSupervisor, LinkPhase};
use crate::pacing::command::PacingSetpoint;
use crate::pacing::timer::{PulsePhase, PulseTimer};
use crate::sensors::filter::MovingAverage;
use crate::sensors::sampler::SampleGate;

/// Owns every piece of per-iteration state.  Constructed once in `main`
/// and never torn down; hardware and transport come in through ports on
/// each call so the whole loop runs against mocks on the host.
pub struct ControlLoop {
    supervisor: ConnectionSupervisor,
    pacer: PulseTimer,
    sampler: SampleGate,
    filter: MovingAverage,
    mailbox: SetpointMailbox,
    setpoint: PacingSetpoint,
    iterations: u64,
}

impl ControlLoop {
    /// Build the loop.  `mailbox` is the same slot the command router
    /// deposits into; the loop keeps one end, the receive callback the
    /// other.
    pub fn new(config: &FirmwareConfig, mailbox: SetpointMailbox) -> Self {
        Self {
            supervisor: ConnectionSupervisor::new(config),
            pacer: PulseTimer::new(config.pulse_width_ms),
            sampler: SampleGate::new(config.sample_rate_hz),
            filter: MovingAverage::new(config.filter_window),
            mailbox,
            setpoint: PacingSetpoint::default(),
            iterations: 0,
        }
    }

    /// Setpoint currently driving the pulse timer.
    pub fn setpoint(&self) -> PacingSetpoint {
        self.setpoint
    }

    pub fn link_phase(&self) -> LinkPhase {
        self.supervisor.phase()
    }

    pub fn pulse_phase(&self) -> PulsePhase {
        self.pacer.phase()
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// One full pass.  See the module docs for the ordering contract.
    pub fn iterate(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SamplePort + ActuatorPort),
        transport: &mut impl TransportPort,
        watchdog: &mut impl WatchdogPort,
    ) {
        self.iterations += 1;

        // 1. Liveness first: even a wedged transport must not starve the
        //    watchdog.
        watchdog.feed();

        // 2. Link supervision, mirrored on the status LED.
        let link = self.supervisor.tick(now_ms, transport);
        hw.set_link_led(link == LinkPhase::Connected);

        // 3. Freshest setpoint, then the time-critical pulse edge work.
        if let Some(sp) = self.mailbox.take() {
            self.setpoint = sp;
        }
        self.pacer.update(now_ms, &self.setpoint, hw);

        // 4. Sensing and telemetry. Publishes are skipped, not queued,
        //    while the link is down — stale vitals are worse than absent
        //    ones.
        if let Some(raw) = self.sampler.poll(now_ms, hw) {
            let smoothed = self.filter.push(raw);
            if link == LinkPhase::Connected {
                let frame = PpgTelemetry::new(smoothed, now_ms);
                match serde_json::to_vec(&frame) {
                    Ok(payload) => {
                        if let Err(e) = transport.publish(config::TOPIC_TELEMETRY, &payload) {
                            warn!("Telemetry: publish failed ({e})");
                        } else {
                            debug!("Telemetry: ppg={:.2} ts={now_ms}", frame.ppg);
                        }
                    }
                    Err(e) => warn!("Telemetry: encode failed ({e})"),
                }
            }
        }
    }
}
