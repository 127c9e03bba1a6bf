//! Task Watchdog Timer (TWDT) driver.
//!
//! Wraps the ESP-IDF TWDT API to reset the device if the control loop
//! stalls. The loop feeds it as the very first step of every iteration,
//! so a trigger means the loop itself stopped turning.
//!
//! Construct this *after* any blocking bring-up work (the Wi-Fi join can
//! take longer than the timeout); once subscribed, the clock is running.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::app::ports::WatchdogPort;

pub struct Watchdog {
    #[cfg(target_os = "espidf")]
    subscribed: bool,
    #[cfg(not(target_os = "espidf"))]
    feeds: u64,
}

impl Watchdog {
    /// Initialise and subscribe the current task to the TWDT.
    #[allow(unused_variables)]
    pub fn new(timeout_s: u32) -> Self {
        #[cfg(target_os = "espidf")]
        {
            unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms: timeout_s * 1_000,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK {
                    log::warn!(
                        "TWDT reconfigure returned {} (may already be configured)",
                        ret
                    );
                }

                let ret = esp_task_wdt_add(core::ptr::null_mut());
                let subscribed = ret == ESP_OK;
                if subscribed {
                    info!("Watchdog: subscribed ({}s timeout, panic on trigger)", timeout_s);
                } else {
                    log::warn!("Watchdog: failed to subscribe ({})", ret);
                }

                Self { subscribed }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            log::info!("Watchdog(sim): no-op");
            Self { feeds: 0 }
        }
    }

    /// Number of feeds observed (host builds only, for tests).
    #[cfg(not(target_os = "espidf"))]
    pub fn feed_count(&self) -> u64 {
        self.feeds
    }
}

impl WatchdogPort for Watchdog {
    fn feed(&mut self) {
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            self.feeds += 1;
        }
    }
}
