//! Network subsystem — link supervision and wire message shapes.
//!
//! The [`ConnectionSupervisor`](supervisor::ConnectionSupervisor) owns
//! reconnect policy; the actual MQTT session lives behind the
//! [`TransportPort`](crate::app::ports::TransportPort) boundary in
//! `adapters::mqtt`.

pub mod messages;
pub mod supervisor;
