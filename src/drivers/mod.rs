//! Actuator drivers, hardware initialisation, and peripheral helpers.

pub mod hw_init;
pub mod pace_output;
pub mod status_led;
pub mod watchdog;
