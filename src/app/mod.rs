//! Application layer: the control loop and the ports it runs against.
//!
//! Everything in here is hardware-agnostic.  Concrete ESP32 bindings live
//! in `adapters/` and `drivers/`; host tests substitute mocks.

pub mod mailbox;
pub mod ports;
pub mod router;
pub mod service;
