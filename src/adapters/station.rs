//! WiFi station-mode adapter.
//!
//! Joins the configured access point once at boot.  The firmware treats
//! WiFi as a precondition of the MQTT link, not something it manages at
//! runtime: if the join fails the control loop still starts, and the
//! connection supervisor keeps retrying the broker (which will keep
//! failing until the network returns on its own).
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via
//!   `esp_idf_svc::wifi::EspWifi`; `join()` takes the modem peripheral
//!   and system event loop.
//! - **all other targets**: simulation stub; `join()` takes no hardware
//!   and always succeeds.
//!
//! ## Join policy
//!
//! The join is blocking but bounded: after `start()`/`connect()` the
//! adapter polls the driver every 500 ms and gives up after 10 s.  The
//! watchdog must not be armed until this returns.

use core::fmt;
use log::info;

#[cfg(target_os = "espidf")]
use log::error;

use crate::config::FirmwareConfig;

// ───────────────────────────────────────────────────────────────
// Errors
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    JoinFailed,
}

impl fmt::Display for StationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
            Self::JoinFailed => write!(f, "WiFi join failed"),
        }
    }
}

impl std::error::Error for StationError {}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

const JOIN_TIMEOUT_MS: u32 = 10_000;
const JOIN_POLL_MS: u32 = 500;

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), StationError> {
    if ssid.is_empty() || ssid.len() > 32 {
        return Err(StationError::InvalidSsid);
    }
    if !is_printable_ascii(ssid) {
        return Err(StationError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), StationError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(StationError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Station adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiStation {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    joined: bool,
    #[cfg(target_os = "espidf")]
    wifi: Option<esp_idf_svc::wifi::EspWifi<'static>>,
}

impl WifiStation {
    /// Validate and capture credentials from the firmware config.
    pub fn new(config: &FirmwareConfig) -> Result<Self, StationError> {
        if config.wifi_ssid.is_empty() {
            return Err(StationError::NoCredentials);
        }
        validate_ssid(config.wifi_ssid)?;
        validate_password(config.wifi_password)?;

        let mut ssid = heapless::String::new();
        ssid.push_str(config.wifi_ssid)
            .map_err(|_| StationError::InvalidSsid)?;
        let mut password = heapless::String::new();
        password
            .push_str(config.wifi_password)
            .map_err(|_| StationError::InvalidPassword)?;

        Ok(Self {
            ssid,
            password,
            joined: false,
            #[cfg(target_os = "espidf")]
            wifi: None,
        })
    }

    pub fn is_joined(&self) -> bool {
        self.joined
    }

    /// Bring the station up and associate with the AP.  Blocks for at
    /// most `JOIN_TIMEOUT_MS`.  The NVS partition carries the radio
    /// calibration data.
    #[cfg(target_os = "espidf")]
    pub fn join(
        &mut self,
        modem: esp_idf_hal::modem::Modem,
        sysloop: esp_idf_svc::eventloop::EspSystemEventLoop,
        nvs: esp_idf_svc::nvs::EspDefaultNvsPartition,
    ) -> Result<(), StationError> {
        use esp_idf_hal::delay::FreeRtos;
        use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi};

        let mut wifi = EspWifi::new(modem, sysloop, Some(nvs)).map_err(|e| {
            error!("WiFi: driver init failed ({e})");
            StationError::JoinFailed
        })?;

        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        wifi.set_configuration(&Configuration::Client(ClientConfiguration {
            ssid: self.ssid.clone(),
            password: self.password.clone(),
            auth_method,
            ..Default::default()
        }))
        .map_err(|e| {
            error!("WiFi: set_configuration failed ({e})");
            StationError::JoinFailed
        })?;

        wifi.start().map_err(|e| {
            error!("WiFi: start failed ({e})");
            StationError::JoinFailed
        })?;

        info!("WiFi: joining '{}'", self.ssid);
        wifi.connect().map_err(|e| {
            error!("WiFi: connect failed ({e})");
            StationError::JoinFailed
        })?;

        // Bounded wait for association + DHCP lease.
        let mut waited_ms = 0u32;
        while !wifi.is_up().unwrap_or(false) {
            if waited_ms >= JOIN_TIMEOUT_MS {
                error!("WiFi: join timed out after {}ms", JOIN_TIMEOUT_MS);
                return Err(StationError::JoinFailed);
            }
            FreeRtos::delay_ms(JOIN_POLL_MS);
            waited_ms += JOIN_POLL_MS;
        }

        info!("WiFi: station up (SSID='{}')", self.ssid);
        self.wifi = Some(wifi);
        self.joined = true;
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn join(&mut self) -> Result<(), StationError> {
        info!("WiFi(sim): joined '{}'", self.ssid);
        self.joined = true;
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
