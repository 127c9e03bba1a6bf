//! Inbound payload routing.
//!
//! The transport adapter calls [`CommandRouter::route`] from its receive
//! callback for every message the session delivers.  Routing is the
//! callback's entire job: match the topic, parse, deposit in the mailbox.
//! No blocking, no actuation, no retained state — the callback may run
//! while the loop is mid-iteration.

use log::{debug, info, warn};

use crate::app::mailbox::SetpointMailbox;
use crate::pacing::command::CommandParser;

/// Routes command-topic payloads into the setpoint mailbox.
#[derive(Clone)]
pub struct CommandRouter {
    parser: CommandParser,
    mailbox: SetpointMailbox,
    command_topic: &'static str,
}

impl CommandRouter {
    pub fn new(parser: CommandParser, mailbox: SetpointMailbox, command_topic: &'static str) -> Self {
        Self {
            parser,
            mailbox,
            command_topic,
        }
    }

    /// Handle one delivered message.  Rejected payloads are logged and
    /// dropped; the loop keeps its previous setpoint.
    pub fn route(&self, topic: &str, payload: &[u8]) {
        if topic != self.command_topic {
            debug!("Router: ignoring message on '{topic}'");
            return;
        }
        match self.parser.parse(payload) {
            Ok(sp) => {
                info!(
                    "Command: pacing {} at {:.0} bpm",
                    if sp.enabled { "enabled" } else { "disabled" },
                    sp.rate_bpm
                );
                self.mailbox.replace(sp);
            }
            Err(e) => warn!("Command: payload rejected ({e})"),
        }
    }
}
