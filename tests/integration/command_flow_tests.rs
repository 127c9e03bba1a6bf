//! Integration tests for the inbound command path: receive callback →
//! router → validator → mailbox → control loop → pulse timer.
//!
//! The rig routes payloads through a real `CommandRouter`, so topic
//! filtering and JSON validation are exercised exactly as on target.

use crate::mock_hw::Rig;
use pulsepace::config;

#[test]
fn command_topic_payload_reaches_the_pulse_timer() {
    let mut rig = Rig::new();
    rig.send_command(br#"{"pacing_command":{"pacing_enabled":true,"target_rate_bpm":200}}"#);

    let edges = rig.run(0..400);
    assert_eq!(edges.first(), Some(&(300, true)));
}

#[test]
fn foreign_topic_never_touches_the_setpoint() {
    let mut rig = Rig::new();
    // A well-formed command on the wrong topic must be routed past us.
    rig.deliver(
        config::TOPIC_STATUS,
        br#"{"pacing_command":{"pacing_enabled":true,"target_rate_bpm":150}}"#,
    );

    let edges = rig.run(0..2000);
    assert!(edges.is_empty());
    assert!(!rig.control.setpoint().enabled);
}

#[test]
fn command_burst_applies_the_newest_only() {
    let mut rig = Rig::new();
    // Three commands land between loop iterations; the mailbox holds one.
    rig.send_command(br#"{"pacing_command":{"pacing_enabled":true,"target_rate_bpm":80}}"#);
    rig.send_command(br#"{"pacing_command":{"pacing_enabled":true,"target_rate_bpm":120}}"#);
    rig.send_command(br#"{"pacing_command":{"pacing_enabled":false,"target_rate_bpm":55}}"#);

    rig.step(0);

    let sp = rig.control.setpoint();
    assert!(!sp.enabled);
    assert_eq!(sp.rate_bpm, 55.0);
}

#[test]
fn setpoint_is_replaced_wholesale_not_merged() {
    let mut rig = Rig::new();
    rig.send_command(br#"{"pacing_command":{"pacing_enabled":true,"target_rate_bpm":150}}"#);
    rig.step(0);
    assert_eq!(rig.control.setpoint().rate_bpm, 150.0);

    // Rate omitted: the default applies; the old 150 must not leak through.
    rig.send_command(br#"{"pacing_command":{"pacing_enabled":true}}"#);
    rig.step(1);

    assert!(rig.control.setpoint().enabled);
    assert_eq!(rig.control.setpoint().rate_bpm, 60.0);
}

#[test]
fn rate_change_mid_run_retimes_the_next_interval() {
    let mut rig = Rig::new();
    rig.send_command(br#"{"pacing_command":{"pacing_enabled":true,"target_rate_bpm":60}}"#);

    let edges = rig.run(0..1030);
    assert_eq!(edges, vec![(1000, true), (1020, false)]);

    // Speed up to 200 bpm: the next rising edge lands one new interval
    // (300 ms) after the last falling edge.
    rig.send_command(br#"{"pacing_command":{"pacing_enabled":true,"target_rate_bpm":200}}"#);
    let edges = rig.run(1030..1400);
    assert_eq!(edges.first(), Some(&(1320, true)));
}
