//! Fuzz target: `CommandParser::parse`
//!
//! Feeds arbitrary byte sequences to the pacing command parser and asserts
//! that it never panics, that every accepted setpoint lies inside the
//! safety band, and that parsing is deterministic.
//!
//! cargo fuzz run fuzz_command_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use pulsepace::config::FirmwareConfig;
use pulsepace::pacing::command::CommandParser;

fuzz_target!(|data: &[u8]| {
    let parser = CommandParser::new(&FirmwareConfig::default());

    let first = parser.parse(data);
    if let Ok(sp) = first {
        assert!(
            (30.0..=200.0).contains(&sp.rate_bpm),
            "rate {} escaped the safety clamp",
            sp.rate_bpm
        );
    }

    // The parser holds no state: a second pass must agree with the first.
    assert_eq!(parser.parse(data), first);
});
