//! Mock hardware and a full-loop rig shared by the integration tests.
//!
//! The rig wires a real `ControlLoop` to recording doubles: a mock
//! sample/actuator adapter, the in-memory `SimTransport`, and the host
//! watchdog counter. Inbound messages enter through a real
//! `CommandRouter`, the same path the MQTT receive callback uses on
//! target, so tests exercise the whole topic → parse → mailbox chain.

use core::ops::Range;

use pulsepace::adapters::mqtt::SimTransport;
use pulsepace::app::mailbox::SetpointMailbox;
use pulsepace::app::ports::{ActuatorPort, SamplePort};
use pulsepace::app::router::CommandRouter;
use pulsepace::app::service::ControlLoop;
use pulsepace::config::{self, FirmwareConfig};
use pulsepace::drivers::watchdog::Watchdog;
use pulsepace::pacing::command::CommandParser;

// ── Recording hardware double ────────────────────────────────────────────

pub struct MockHardware {
    /// Raw count returned by every ADC read.
    pub raw_adc: u16,
    pub adc_reads: u32,
    pub pace_high: bool,
    pub led_lit: bool,
}

impl MockHardware {
    pub fn new() -> Self {
        Self {
            raw_adc: 0,
            adc_reads: 0,
            pace_high: false,
            led_lit: false,
        }
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SamplePort for MockHardware {
    fn read_raw(&mut self) -> u16 {
        self.adc_reads += 1;
        self.raw_adc
    }
}

impl ActuatorPort for MockHardware {
    fn set_pace(&mut self, high: bool) {
        self.pace_high = high;
    }

    fn set_link_led(&mut self, lit: bool) {
        self.led_lit = lit;
    }
}

// ── Full-loop rig ────────────────────────────────────────────────────────

pub struct Rig {
    pub control: ControlLoop,
    pub hw: MockHardware,
    pub transport: SimTransport,
    pub watchdog: Watchdog,
    router: CommandRouter,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        Self::with_transport(SimTransport::new())
    }

    pub fn with_transport(transport: SimTransport) -> Self {
        let cfg = FirmwareConfig::default();
        let mailbox = SetpointMailbox::new();
        let router = CommandRouter::new(
            CommandParser::new(&cfg),
            mailbox.clone(),
            config::TOPIC_COMMAND,
        );
        Self {
            control: ControlLoop::new(&cfg, mailbox),
            hw: MockHardware::new(),
            transport,
            watchdog: Watchdog::new(cfg.watchdog_timeout_s),
            router,
        }
    }

    /// Deliver one inbound message exactly as the receive callback would.
    pub fn deliver(&mut self, topic: &str, payload: &[u8]) {
        self.router.route(topic, payload);
    }

    /// Deliver a payload on the pacing command topic.
    pub fn send_command(&mut self, payload: &[u8]) {
        self.deliver(config::TOPIC_COMMAND, payload);
    }

    /// One loop iteration at `now_ms`.
    pub fn step(&mut self, now_ms: u64) {
        self.control
            .iterate(now_ms, &mut self.hw, &mut self.transport, &mut self.watchdog);
    }

    /// Iterate once per millisecond over `range`, recording every pace
    /// output edge as `(timestamp_ms, level_after_edge)`.
    pub fn run(&mut self, range: Range<u64>) -> Vec<(u64, bool)> {
        let mut edges = Vec::new();
        for now in range {
            let before = self.hw.pace_high;
            self.step(now);
            if self.hw.pace_high != before {
                edges.push((now, self.hw.pace_high));
            }
        }
        edges
    }

    /// Telemetry frames published so far, oldest first.
    pub fn telemetry(&self) -> Vec<&[u8]> {
        self.transport.published_on(config::TOPIC_TELEMETRY)
    }
}

impl Default for Rig {
    fn default() -> Self {
        Self::new()
    }
}
