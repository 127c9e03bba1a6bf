//! MQTT transport adapter.
//!
//! Implements [`TransportPort`] over the ESP-IDF MQTT client.  All
//! traffic is QoS 0; telemetry is fire-and-forget and command delivery
//! relies on the broker session being up.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: [`EspMqtt`] wraps `EspMqttClient`.  The
//!   IDF client runs its own receive task; incoming publishes are routed
//!   to the [`CommandRouter`] from that task's event callback, which only
//!   parses and deposits into the setpoint mailbox.
//! - **all other targets**: [`SimTransport`], an in-memory recording
//!   transport with scriptable connect failures for host tests.
//!
//! ## Session ownership
//!
//! Reconnect pacing belongs to the connection supervisor, not the IDF
//! client.  A lost session is therefore sticky: once `Disconnected`
//! fires, `is_connected()` stays false until the supervisor calls
//! `connect()` again, which tears the old client down and builds a fresh
//! one.  Without this, an IDF-internal reconnect would bring the session
//! back with no command subscription on it.

use log::{info, warn};

use crate::app::ports::{TransportError, TransportPort};

#[cfg(target_os = "espidf")]
use crate::app::router::CommandRouter;
#[cfg(target_os = "espidf")]
use crate::config::FirmwareConfig;

// ───────────────────────────────────────────────────────────────
// ESP-IDF client
// ───────────────────────────────────────────────────────────────

/// Bounded wait for the broker session after client creation.  Must stay
/// well under the watchdog timeout.
#[cfg(target_os = "espidf")]
const CONNECT_WAIT_MS: u32 = 3_000;
#[cfg(target_os = "espidf")]
const CONNECT_POLL_MS: u32 = 20;

#[cfg(target_os = "espidf")]
pub struct EspMqtt {
    broker_url: String,
    client_id: &'static str,
    router: CommandRouter,
    connected: std::sync::Arc<std::sync::atomic::AtomicBool>,
    session_lost: std::sync::Arc<std::sync::atomic::AtomicBool>,
    client: Option<esp_idf_svc::mqtt::client::EspMqttClient<'static>>,
}

#[cfg(target_os = "espidf")]
impl EspMqtt {
    pub fn new(config: &FirmwareConfig, router: CommandRouter) -> Self {
        use std::sync::Arc;
        use std::sync::atomic::AtomicBool;

        Self {
            broker_url: format!("mqtt://{}:{}", config.broker_host, config.broker_port),
            client_id: config.client_id,
            router,
            connected: Arc::new(AtomicBool::new(false)),
            session_lost: Arc::new(AtomicBool::new(false)),
            client: None,
        }
    }
}

#[cfg(target_os = "espidf")]
impl TransportPort for EspMqtt {
    fn connect(&mut self) -> Result<(), TransportError> {
        use esp_idf_hal::delay::FreeRtos;
        use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration};
        use std::sync::atomic::Ordering;

        // Tear down any previous session before dialing again.
        self.client = None;
        self.connected.store(false, Ordering::Relaxed);
        self.session_lost.store(false, Ordering::Relaxed);

        let connected = std::sync::Arc::clone(&self.connected);
        let session_lost = std::sync::Arc::clone(&self.session_lost);
        let router = self.router.clone();

        let conf = MqttClientConfiguration {
            client_id: Some(self.client_id),
            ..Default::default()
        };
        let client = EspMqttClient::new_cb(&self.broker_url, &conf, move |event| {
            match event.payload() {
                EventPayload::Connected(_) => {
                    connected.store(true, Ordering::Relaxed);
                    info!("Mqtt: broker session up");
                }
                EventPayload::Disconnected => {
                    session_lost.store(true, Ordering::Relaxed);
                    warn!("Mqtt: broker session lost");
                }
                EventPayload::Received { topic, data, .. } => {
                    if let Some(topic) = topic {
                        router.route(topic, data);
                    }
                }
                EventPayload::Error(e) => {
                    warn!("Mqtt: event error ({e})");
                }
                _ => {}
            }
        })
        .map_err(|e| {
            warn!("Mqtt: client init failed ({e})");
            TransportError::Driver(e.code())
        })?;
        self.client = Some(client);

        // The IDF client dials from its own task; wait here so the
        // supervisor's attempt gets a definite answer within this window.
        let mut waited_ms = 0u32;
        loop {
            if self.connected.load(Ordering::Relaxed) {
                return Ok(());
            }
            if self.session_lost.load(Ordering::Relaxed) || waited_ms >= CONNECT_WAIT_MS {
                self.client = None;
                warn!("Mqtt: connect to {} failed", self.broker_url);
                return Err(TransportError::ConnectFailed);
            }
            FreeRtos::delay_ms(CONNECT_POLL_MS);
            waited_ms += CONNECT_POLL_MS;
        }
    }

    fn is_connected(&self) -> bool {
        use std::sync::atomic::Ordering;
        self.client.is_some()
            && self.connected.load(Ordering::Relaxed)
            && !self.session_lost.load(Ordering::Relaxed)
    }

    fn service(&mut self) {
        // Nothing to pump: the IDF client receives on its own task.
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), TransportError> {
        use esp_idf_svc::mqtt::client::QoS;

        let Some(client) = self.client.as_mut() else {
            return Err(TransportError::NotConnected);
        };
        client.subscribe(topic, QoS::AtMostOnce).map_err(|e| {
            warn!("Mqtt: subscribe '{topic}' failed ({e})");
            TransportError::SubscribeFailed
        })?;
        info!("Mqtt: subscribed to '{topic}'");
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
        use esp_idf_svc::mqtt::client::QoS;

        if !self.is_connected() {
            return Err(TransportError::NotConnected);
        }
        let Some(client) = self.client.as_mut() else {
            return Err(TransportError::NotConnected);
        };
        client
            .enqueue(topic, QoS::AtMostOnce, false, payload)
            .map_err(|e| {
                warn!("Mqtt: publish to '{topic}' failed ({e})");
                TransportError::PublishFailed
            })?;
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Host simulation
// ───────────────────────────────────────────────────────────────

/// In-memory transport for host-side tests.  Records every call and can
/// be scripted to refuse the first N connect attempts or to drop an
/// established link mid-run.
#[cfg(not(target_os = "espidf"))]
pub struct SimTransport {
    connected: bool,
    fail_connects: u32,
    pub connect_attempts: u32,
    pub subscriptions: Vec<String>,
    pub published: Vec<(String, Vec<u8>)>,
    pub service_calls: u32,
}

#[cfg(not(target_os = "espidf"))]
impl SimTransport {
    pub fn new() -> Self {
        Self {
            connected: false,
            fail_connects: 0,
            connect_attempts: 0,
            subscriptions: Vec::new(),
            published: Vec::new(),
            service_calls: 0,
        }
    }

    /// Refuse the first `n` connect attempts, then accept.
    pub fn failing_first(n: u32) -> Self {
        Self {
            fail_connects: n,
            ..Self::new()
        }
    }

    /// Simulate broker loss: the session and its subscriptions are gone.
    pub fn drop_link(&mut self) {
        self.connected = false;
        self.subscriptions.clear();
        warn!("Mqtt(sim): link dropped");
    }

    pub fn published_on(&self, topic: &str) -> Vec<&[u8]> {
        self.published
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, p)| p.as_slice())
            .collect()
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for SimTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_os = "espidf"))]
impl TransportPort for SimTransport {
    fn connect(&mut self) -> Result<(), TransportError> {
        self.connect_attempts += 1;
        if self.fail_connects > 0 {
            self.fail_connects -= 1;
            warn!("Mqtt(sim): connect refused (attempt {})", self.connect_attempts);
            return Err(TransportError::ConnectFailed);
        }
        self.connected = true;
        info!("Mqtt(sim): connected (attempt {})", self.connect_attempts);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn service(&mut self) {
        self.service_calls += 1;
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), TransportError> {
        if !self.connected {
            return Err(TransportError::NotConnected);
        }
        self.subscriptions.push(topic.to_string());
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
        if !self.connected {
            return Err(TransportError::NotConnected);
        }
        self.published.push((topic.to_string(), payload.to_vec()));
        Ok(())
    }
}
