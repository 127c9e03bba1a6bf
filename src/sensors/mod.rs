//! Sensor subsystem — acquisition cadence, smoothing, and the ADC front-end.
//!
//! [`SampleGate`](sampler::SampleGate) decides *when* to sample,
//! [`PpgSensor`](ppg::PpgSensor) performs the conversion, and
//! [`MovingAverage`](filter::MovingAverage) smooths the result before the
//! control loop publishes it.

pub mod filter;
pub mod ppg;
pub mod sampler;
