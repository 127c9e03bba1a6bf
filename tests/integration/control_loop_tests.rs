//! Integration tests for the full control-loop iteration contract.
//!
//! These run on the host (x86_64) and drive a real `ControlLoop` — sample
//! gate, moving-average filter, pulse timer, link supervisor — against
//! recording doubles, verifying the end-to-end behaviour one iteration per
//! millisecond, the same cadence `main` runs at on target.

use crate::mock_hw::Rig;
use pulsepace::adapters::mqtt::SimTransport;
use pulsepace::net::supervisor::LinkPhase;
use pulsepace::pacing::timer::pulse_interval_ms;

// ── Sampling → filter → telemetry ────────────────────────────────────────

#[test]
fn ramp_of_five_samples_filters_to_exact_mean() {
    let mut rig = Rig::new();
    rig.step(0); // connects; first sample not yet due

    // One sample per 10 ms period at the default 100 Hz.
    for (i, raw) in [10u16, 20, 30, 40, 50].into_iter().enumerate() {
        rig.hw.raw_adc = raw;
        rig.step(10 * (i as u64 + 1));
    }

    let frames = rig.telemetry();
    assert_eq!(frames.len(), 5, "one frame per elapsed sample period");
    // Window of 5 now holds exactly the ramp: mean is 30, no rounding.
    assert_eq!(frames[4], br#"{"ppg":30.0,"ts":50}"#);
}

#[test]
fn sample_cadence_tracks_the_configured_rate() {
    let mut rig = Rig::new();
    rig.run(0..1001);
    // Fires at t = 10, 20, .., 1000: never more than one read per period.
    assert_eq!(rig.hw.adc_reads, 100);
}

// ── Pacing through the whole stack ───────────────────────────────────────

#[test]
fn overspeed_command_clamps_to_the_rate_ceiling() {
    let mut rig = Rig::new();
    rig.send_command(br#"{"pacing_command":{"pacing_enabled":true,"target_rate_bpm":300}}"#);

    let edges = rig.run(0..2000);

    let sp = rig.control.setpoint();
    assert!(sp.enabled);
    assert_eq!(sp.rate_bpm, 200.0, "300 bpm must clamp to the ceiling");
    assert_eq!(pulse_interval_ms(sp.rate_bpm), 300);

    let rising: Vec<u64> = edges
        .iter()
        .filter(|(_, level)| *level)
        .map(|(t, _)| *t)
        .collect();
    assert_eq!(rising, vec![300, 620, 940, 1260, 1580, 1900]);
    // Interval measured from the falling edge, so rising edges sit a full
    // interval + width apart even at the ceiling rate.
    for pair in rising.windows(2) {
        assert!(pair[1] - pair[0] >= 300);
    }
}

#[test]
fn omitted_rate_defaults_to_60_bpm() {
    let mut rig = Rig::new();
    rig.send_command(br#"{"pacing_command":{"pacing_enabled":true}}"#);

    let edges = rig.run(0..3000);

    assert_eq!(rig.control.setpoint().rate_bpm, 60.0);
    assert_eq!(pulse_interval_ms(60.0), 1000);

    // Falling edge to the next rising edge is exactly one interval.
    let fall = edges
        .iter()
        .find(|(_, level)| !level)
        .map(|(t, _)| *t)
        .unwrap();
    let next_rise = edges
        .iter()
        .filter(|(t, level)| *level && *t > fall)
        .map(|(t, _)| *t)
        .next()
        .unwrap();
    assert_eq!(next_rise - fall, 1000);
}

#[test]
fn disable_lands_within_one_iteration_and_sticks() {
    let mut rig = Rig::new();
    rig.send_command(br#"{"pacing_command":{"pacing_enabled":true,"target_rate_bpm":120}}"#);

    rig.run(0..520); // rising edge at 500; still mid-pulse at 519
    assert!(rig.hw.pace_high, "pulse should be in progress");

    rig.send_command(br#"{"pacing_command":{"pacing_enabled":false}}"#);
    rig.step(520);
    assert!(!rig.hw.pace_high, "output must drop on the very next iteration");

    let edges = rig.run(521..4000);
    assert!(edges.is_empty(), "no further edges while disabled");
}

// ── Robustness ───────────────────────────────────────────────────────────

#[test]
fn bad_payloads_leave_the_previous_setpoint_intact() {
    let mut rig = Rig::new();
    rig.send_command(br#"{"pacing_command":{"pacing_enabled":true,"target_rate_bpm":100}}"#);
    rig.step(0);
    let before = rig.control.setpoint();

    rig.send_command(br#"{"pacing_comand": {}}"#); // misspelled envelope key
    rig.send_command(b"\xffnot json at all");
    rig.step(1);

    assert_eq!(rig.control.setpoint(), before);
    assert!(before.enabled);
    assert_eq!(before.rate_bpm, 100.0);
}

#[test]
fn pacing_is_unaffected_by_a_broker_outage() {
    let mut rig = Rig::with_transport(SimTransport::failing_first(u32::MAX));
    rig.send_command(br#"{"pacing_command":{"pacing_enabled":true,"target_rate_bpm":60}}"#);

    let edges = rig.run(0..5000);

    assert_eq!(rig.control.link_phase(), LinkPhase::Disconnected);
    let rising = edges.iter().filter(|(_, level)| *level).count();
    assert_eq!(rising, 4); // t = 1000, 2020, 3040, 4060
    // Sensing keeps running too; only the publishes are withheld.
    assert_eq!(rig.hw.adc_reads, 499);
    assert!(rig.telemetry().is_empty());
}

#[test]
fn watchdog_is_fed_once_per_iteration() {
    let mut rig = Rig::new();
    rig.run(0..1000);
    assert_eq!(rig.watchdog.feed_count(), 1000);
    assert_eq!(rig.control.iterations(), 1000);
}
