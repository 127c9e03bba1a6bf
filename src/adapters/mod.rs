//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements     | Connects to                |
//! |------------|----------------|----------------------------|
//! | `hardware` | SamplePort     | ESP32 ADC (PPG input)      |
//! |            | ActuatorPort   | ESP32 GPIO (pace, LED)     |
//! | `mqtt`     | TransportPort  | ESP-IDF MQTT client        |
//! | `station`  | —              | ESP-IDF WiFi STA           |
//! | `time`     | —              | ESP32 high-resolution timer|

pub mod hardware;
pub mod mqtt;
pub mod station;
pub mod time;
