//! Pacing pulse timer.
//!
//! Generates the square-wave stimulation pattern: a fixed-width active pulse
//! every `60000 / rate_bpm` milliseconds while the setpoint enables pacing.
//! Driven by polling — [`PulseTimer::update`] runs once per loop iteration
//! and compares timestamps; there are no timer interrupts to race with.
//!
//! The timer trusts its input: rate clamping happens in the command parser
//! before a setpoint ever reaches this module.

use crate::app::ports::ActuatorPort;
use crate::pacing::command::PacingSetpoint;

/// Pulse interval for a given rate.  `rate_bpm` must be positive (the
/// parser guarantees it); truncates toward zero like the period registers
/// it stands in for.
pub fn pulse_interval_ms(rate_bpm: f32) -> u64 {
    (60_000.0 / rate_bpm) as u64
}

/// Where the timer is within one pacing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulsePhase {
    /// Pacing disabled, output held low.
    Idle,
    /// Waiting for the interval to elapse, output low.
    Armed,
    /// Pulse in progress, output high.
    Pulsing,
}

/// The pacing state machine.
///
/// ```text
///   Idle ──enabled──▶ Armed ──interval elapsed──▶ Pulsing
///    ▲                  ▲                            │
///    │                  └─────pulse width over───────┘
///    └───────────── enabled == false (from any phase)
/// ```
pub struct PulseTimer {
    phase: PulsePhase,
    pulse_width_ms: u64,
    /// End of the most recent pulse (including one cut short by disable).
    last_pulse_ms: u64,
    pulse_start_ms: u64,
}

impl PulseTimer {
    pub fn new(pulse_width_ms: u64) -> Self {
        Self {
            phase: PulsePhase::Idle,
            pulse_width_ms,
            last_pulse_ms: 0,
            pulse_start_ms: 0,
        }
    }

    pub fn phase(&self) -> PulsePhase {
        self.phase
    }

    /// Advance the state machine by one iteration.
    ///
    /// Must be called every loop pass regardless of link or sensor state —
    /// pulse edges land on whichever iteration first observes their
    /// deadline, so iteration cadence bounds the timing error.
    pub fn update(&mut self, now_ms: u64, setpoint: &PacingSetpoint, out: &mut impl ActuatorPort) {
        if !setpoint.enabled {
            // Fail-safe: force the output low on every disabled tick, and
            // count a truncated pulse as the latest one so re-enabling
            // cannot fire again sooner than one full interval.
            out.set_pace(false);
            if self.phase == PulsePhase::Pulsing {
                self.last_pulse_ms = now_ms;
            }
            self.phase = PulsePhase::Idle;
            return;
        }

        match self.phase {
            PulsePhase::Idle => {
                // Timing is evaluated from the next tick onward.
                self.phase = PulsePhase::Armed;
            }
            PulsePhase::Armed => {
                let interval = pulse_interval_ms(setpoint.rate_bpm);
                if now_ms.saturating_sub(self.last_pulse_ms) >= interval {
                    out.set_pace(true);
                    self.pulse_start_ms = now_ms;
                    self.phase = PulsePhase::Pulsing;
                }
            }
            PulsePhase::Pulsing => {
                // A rate change mid-pulse affects the next interval only;
                // the running pulse always completes its full width.
                if now_ms.saturating_sub(self.pulse_start_ms) >= self.pulse_width_ms {
                    out.set_pace(false);
                    self.last_pulse_ms = now_ms;
                    self.phase = PulsePhase::Armed;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockPace {
        level: bool,
    }

    impl MockPace {
        fn new() -> Self {
            Self { level: false }
        }
    }

    impl ActuatorPort for MockPace {
        fn set_pace(&mut self, high: bool) {
            self.level = high;
        }
        fn set_link_led(&mut self, _lit: bool) {}
    }

    fn enabled(rate_bpm: f32) -> PacingSetpoint {
        PacingSetpoint {
            enabled: true,
            rate_bpm,
        }
    }

    /// Tick `timer` once per millisecond over `range`, recording every
    /// output edge as `(timestamp, level)`.
    fn drive(
        timer: &mut PulseTimer,
        setpoint: &PacingSetpoint,
        range: core::ops::Range<u64>,
        pace: &mut MockPace,
    ) -> Vec<(u64, bool)> {
        let mut edges = Vec::new();
        for now in range {
            let before = pace.level;
            timer.update(now, setpoint, pace);
            if pace.level != before {
                edges.push((now, pace.level));
            }
        }
        edges
    }

    #[test]
    fn disabled_setpoint_never_raises_output() {
        let mut timer = PulseTimer::new(20);
        let mut pace = MockPace::new();
        let edges = drive(&mut timer, &PacingSetpoint::default(), 0..2000, &mut pace);
        assert!(edges.is_empty());
        assert_eq!(timer.phase(), PulsePhase::Idle);
    }

    #[test]
    fn pulse_train_at_120_bpm() {
        let mut timer = PulseTimer::new(20);
        let mut pace = MockPace::new();
        let sp = enabled(120.0); // 500 ms interval

        let edges = drive(&mut timer, &sp, 5000..7000, &mut pace);

        // First pulse fires as soon as the timer arms (boot reference is
        // long past), then every 500 ms after each falling edge.
        assert_eq!(
            edges,
            vec![
                (5001, true),
                (5021, false),
                (5521, true),
                (5541, false),
                (6041, true),
                (6061, false),
                (6561, true),
                (6581, false),
            ]
        );
    }

    #[test]
    fn pulse_width_is_exact_at_any_rate() {
        for rate in [30.0, 72.0, 200.0] {
            let mut timer = PulseTimer::new(20);
            let mut pace = MockPace::new();
            let edges = drive(&mut timer, &enabled(rate), 10_000..16_000, &mut pace);

            for pair in edges.chunks(2) {
                if let [(up, true), (down, false)] = pair {
                    assert_eq!(down - up, 20, "pulse width drifted at {rate} bpm");
                }
            }
        }
    }

    #[test]
    fn rising_edges_respect_interval() {
        let mut timer = PulseTimer::new(20);
        let mut pace = MockPace::new();
        let sp = enabled(200.0); // fastest allowed: 300 ms interval

        let edges = drive(&mut timer, &sp, 3000..9000, &mut pace);
        let rising: Vec<u64> = edges
            .iter()
            .filter(|(_, level)| *level)
            .map(|(t, _)| *t)
            .collect();

        assert!(rising.len() >= 3);
        for pair in rising.windows(2) {
            assert!(
                pair[1] - pair[0] >= pulse_interval_ms(sp.rate_bpm),
                "edges {} and {} closer than the pacing interval",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn disable_mid_pulse_forces_low_immediately() {
        let mut timer = PulseTimer::new(20);
        let mut pace = MockPace::new();
        let sp = enabled(60.0);

        drive(&mut timer, &sp, 2000..2012, &mut pace);
        assert!(pace.level, "pulse should be in progress");

        timer.update(2012, &PacingSetpoint::default(), &mut pace);
        assert!(!pace.level);
        assert_eq!(timer.phase(), PulsePhase::Idle);
    }

    #[test]
    fn reenable_after_truncated_pulse_waits_full_interval() {
        let mut timer = PulseTimer::new(20);
        let mut pace = MockPace::new();
        let sp = enabled(60.0); // 1000 ms interval

        // Pulse starts at 2001, gets cut at 2010.
        drive(&mut timer, &sp, 2000..2010, &mut pace);
        timer.update(2010, &PacingSetpoint::default(), &mut pace);

        // Re-enable right away: next rising edge must wait out the full
        // interval measured from the truncation point.
        let edges = drive(&mut timer, &sp, 2011..3500, &mut pace);
        assert_eq!(edges.first(), Some(&(3010, true)));
    }

    #[test]
    fn rate_change_mid_pulse_does_not_truncate() {
        let mut timer = PulseTimer::new(20);
        let mut pace = MockPace::new();

        drive(&mut timer, &enabled(60.0), 4000..4010, &mut pace);
        assert!(pace.level);

        // Jump to the fastest rate while the pulse is high: the pulse
        // still runs its full 20 ms.
        let edges = drive(&mut timer, &enabled(200.0), 4010..4100, &mut pace);
        assert_eq!(edges.first(), Some(&(4021, false)));
    }

    #[test]
    fn rate_change_takes_effect_on_next_interval() {
        let mut timer = PulseTimer::new(20);
        let mut pace = MockPace::new();

        // Settle into a 60 bpm train, ending just after a falling edge.
        let edges = drive(&mut timer, &enabled(60.0), 5000..5025, &mut pace);
        let fall = edges
            .iter()
            .find(|(_, level)| !level)
            .map(|(t, _)| *t)
            .unwrap();

        // Speed up: the next rising edge lands one 300 ms interval after
        // the previous falling edge, not one 1000 ms interval.
        let edges = drive(&mut timer, &enabled(200.0), 5025..6000, &mut pace);
        assert_eq!(edges.first(), Some(&(fall + 300, true)));
    }
}
