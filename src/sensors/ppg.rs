//! PPG (photoplethysmogram) sensor front-end.
//!
//! The analog stage produces a voltage proportional to transmitted light;
//! this driver reads it through an ESP32 ADC1 channel.  Interpretation
//! (filtering, publication) happens upstream — this is the raw tap only.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1_CH6 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static `AtomicU16` for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

use crate::app::ports::SamplePort;

#[cfg(not(target_os = "espidf"))]
static SIM_PPG_ADC: AtomicU16 = AtomicU16::new(0);

/// Inject a raw ADC count for host-side runs.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_ppg_adc(raw: u16) {
    SIM_PPG_ADC.store(raw, Ordering::Relaxed);
}

/// Raw PPG tap on one ADC channel.
pub struct PpgSensor {
    total_reads: u32,
    _adc_gpio: i32,
}

impl PpgSensor {
    pub fn new(adc_gpio: i32) -> Self {
        Self {
            total_reads: 0,
            _adc_gpio: adc_gpio,
        }
    }

    /// Number of conversions since boot (diagnostics).
    pub fn total_reads(&self) -> u32 {
        self.total_reads
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> u16 {
        hw_init::adc1_read(hw_init::ADC1_CH_PPG)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> u16 {
        SIM_PPG_ADC.load(Ordering::Relaxed)
    }
}

impl SamplePort for PpgSensor {
    fn read_raw(&mut self) -> u16 {
        self.total_reads = self.total_reads.saturating_add(1);
        self.read_adc()
    }
}
