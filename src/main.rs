//! PulsePace Firmware — Main Entry Point
//!
//! Hexagonal architecture around a single cooperative control loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  HardwareAdapter     EspMqtt           WifiStation           │
//! │  (Sample+Actuator)   (TransportPort)   (station join)        │
//! │  Watchdog            Uptime                                  │
//! │  (WatchdogPort)      (monotonic clock)                       │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ───────────────────    │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │               ControlLoop (pure logic)                 │  │
//! │  │  link supervisor · pulse timer · sample gate · filter  │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                                                              │
//! │  CommandRouter (MQTT receive task → setpoint mailbox)        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
mod error;
mod esp_link_shims;
mod pins;

pub mod app;
mod adapters;
mod drivers;
mod net;
mod pacing;
mod sensors;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{info, warn};

use adapters::hardware::HardwareAdapter;
use adapters::mqtt::EspMqtt;
use adapters::station::WifiStation;
use adapters::time::Uptime;
use app::mailbox::SetpointMailbox;
use app::router::CommandRouter;
use app::service::ControlLoop;
use config::FirmwareConfig;
use drivers::pace_output::PaceOutput;
use drivers::status_led::StatusLed;
use drivers::watchdog::Watchdog;
use pacing::command::CommandParser;
use sensors::ppg::PpgSensor;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    let config = FirmwareConfig::default();
    config.validate()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  PulsePace v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");
    info!(
        "Broker mqtt://{}:{}, PPG {} Hz, pacing {:.0}-{:.0} bpm",
        config.broker_host,
        config.broker_port,
        config.sample_rate_hz,
        config.rate_min_bpm,
        config.rate_max_bpm
    );

    // ── 2. Hardware peripherals ───────────────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.  The TWDT
        // is not armed yet, so the halt is visible, not a reset loop.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    let peripherals = esp_idf_hal::peripherals::Peripherals::take()?;
    let sysloop = esp_idf_svc::eventloop::EspSystemEventLoop::take()?;
    let nvs = esp_idf_svc::nvs::EspDefaultNvsPartition::take()?;

    // GPIO2 == pins::PACE_OUT_GPIO; the PinDriver keeps exclusive
    // ownership so nothing else can glitch the pacing output.
    let pace_pin = esp_idf_hal::gpio::PinDriver::output(peripherals.pins.gpio2)?;

    let mut hw = HardwareAdapter::new(
        PpgSensor::new(pins::PPG_ADC_GPIO),
        PaceOutput::new(pace_pin),
        StatusLed::new(),
    );

    // ── 3. WiFi station join — the one allowed blocking wait ──
    let mut station = WifiStation::new(&config)?;
    if let Err(e) = station.join(peripherals.modem, sysloop, nvs) {
        // Not fatal: the loop starts anyway, and the broker supervisor
        // keeps retrying cheaply until the network shows up.
        warn!("WiFi: {} — starting loop without network", e);
    }

    // ── 4. Command path and transport ─────────────────────────
    let mailbox = SetpointMailbox::new();
    let router = CommandRouter::new(
        CommandParser::new(&config),
        mailbox.clone(),
        config::TOPIC_COMMAND,
    );
    let mut transport = EspMqtt::new(&config, router);

    // ── 5. Watchdog — armed only after the blocking join ──────
    let mut watchdog = Watchdog::new(config.watchdog_timeout_s);

    // ── 6. Control loop ───────────────────────────────────────
    let clock = Uptime::new();
    let mut control = ControlLoop::new(&config, mailbox);

    info!("System ready. Entering control loop.");

    loop {
        control.iterate(clock.now_ms(), &mut hw, &mut transport, &mut watchdog);

        // Short yield so the IDLE task (and the MQTT client task) get CPU.
        esp_idf_hal::delay::FreeRtos::delay_ms(1);
    }
}
