//! Fuzz target: `CommandRouter::route`
//!
//! Splits the input into an arbitrary topic and payload and drives the
//! receive-callback path end to end: route → parse → mailbox.  Asserts
//! that only the command topic ever deposits a setpoint and that every
//! deposited rate is already clamped.
//!
//! cargo fuzz run fuzz_command_router

#![no_main]

use libfuzzer_sys::fuzz_target;
use pulsepace::app::mailbox::SetpointMailbox;
use pulsepace::app::router::CommandRouter;
use pulsepace::config::{self, FirmwareConfig};
use pulsepace::pacing::command::CommandParser;

fuzz_target!(|data: &[u8]| {
    let mailbox = SetpointMailbox::new();
    let router = CommandRouter::new(
        CommandParser::new(&FirmwareConfig::default()),
        mailbox.clone(),
        config::TOPIC_COMMAND,
    );

    // First byte picks the topic/payload split point.
    let split = data.first().copied().unwrap_or(0) as usize % (data.len() + 1);
    let (topic_bytes, payload) = data.split_at(split);
    let topic = String::from_utf8_lossy(topic_bytes);

    router.route(&topic, payload);
    if let Some(sp) = mailbox.take() {
        assert_eq!(topic, config::TOPIC_COMMAND, "deposit from a foreign topic");
        assert!((30.0..=200.0).contains(&sp.rate_bpm));
    }

    // The same payload on the command topic proper must never leave an
    // out-of-band rate behind either.
    router.route(config::TOPIC_COMMAND, payload);
    if let Some(sp) = mailbox.take() {
        assert!((30.0..=200.0).contains(&sp.rate_bpm));
    }
});
