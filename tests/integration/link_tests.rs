//! Integration tests for link supervision as observed from the full loop:
//! boot announce, retry pacing, broker-restart recovery, the status LED
//! mirror, and telemetry gating.

use crate::mock_hw::Rig;
use pulsepace::adapters::mqtt::SimTransport;
use pulsepace::config;
use pulsepace::net::supervisor::LinkPhase;

#[test]
fn boot_announces_once_on_the_status_topic() {
    let mut rig = Rig::new();
    rig.run(0..100);

    let announces = rig.transport.published_on(config::TOPIC_STATUS);
    assert_eq!(announces.len(), 1, "exactly one announce per session");
    let expect = format!(
        r#"{{"status":"connected","fw_version":"{}"}}"#,
        env!("CARGO_PKG_VERSION")
    );
    assert_eq!(announces[0], expect.as_bytes());
    assert_eq!(
        rig.transport.subscriptions,
        vec![config::TOPIC_COMMAND.to_string()]
    );
}

#[test]
fn one_connect_attempt_per_retry_window() {
    let mut rig = Rig::with_transport(SimTransport::failing_first(u32::MAX));

    rig.run(0..5000);
    assert_eq!(rig.transport.connect_attempts, 1, "boot attempt only");

    rig.run(5000..15_000);
    assert_eq!(rig.transport.connect_attempts, 3); // t = 5000 and t = 10000
}

#[test]
fn broker_restart_resubscribes_and_reannounces() {
    let mut rig = Rig::new();
    rig.run(0..50);
    assert_eq!(
        rig.transport.subscriptions,
        vec![config::TOPIC_COMMAND.to_string()]
    );

    // Broker restart: the session and its subscriptions are gone.
    rig.transport.drop_link();
    assert!(rig.transport.subscriptions.is_empty());

    rig.run(50..6000);

    assert_eq!(rig.control.link_phase(), LinkPhase::Connected);
    assert_eq!(
        rig.transport.subscriptions,
        vec![config::TOPIC_COMMAND.to_string()],
        "command subscription must be re-established"
    );
    assert_eq!(rig.transport.published_on(config::TOPIC_STATUS).len(), 2);
}

#[test]
fn status_led_mirrors_the_link_phase() {
    let mut rig = Rig::with_transport(SimTransport::failing_first(1));

    rig.step(0); // first attempt refused
    assert!(!rig.hw.led_lit);

    rig.run(1..5000); // waiting out the retry window
    assert!(!rig.hw.led_lit);

    rig.step(5000); // window elapses, connect succeeds
    assert!(rig.hw.led_lit);

    rig.transport.drop_link();
    rig.step(5001);
    assert!(!rig.hw.led_lit, "LED must drop as soon as loss is noticed");
}

#[test]
fn telemetry_pauses_during_an_outage_and_resumes() {
    let mut rig = Rig::new();
    rig.hw.raw_adc = 1000;

    rig.run(0..100);
    let before_drop = rig.telemetry().len();
    assert_eq!(before_drop, 9); // t = 10..90

    rig.transport.drop_link();
    rig.run(100..5000);
    assert_eq!(
        rig.telemetry().len(),
        before_drop,
        "publishes are skipped, not queued, while the link is down"
    );

    rig.run(5000..5100);
    assert!(rig.telemetry().len() > before_drop, "stream resumes after reconnect");
}
