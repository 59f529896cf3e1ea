//! WiFi station-mode link adapter.
//!
//! Implements [`LinkPort`] — the black-box lower connectivity layer
//! (association + address acquisition) beneath the pub/sub session.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi STA driver calls via
//!   `esp_idf_svc::wifi`, non-blocking (`connect()` starts association;
//!   the supervisor observes completion through `is_up()`).
//! - **all other targets**: simulation backend for host-side tests; the
//!   link comes up a configurable number of attempts after
//!   `start_connect`.

use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

use crate::app::ports::LinkPort;
use crate::config::SystemConfig;
use crate::error::CommsError;

pub struct WifiLink {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    #[cfg(target_os = "espidf")]
    wifi: Option<Box<esp_idf_svc::wifi::EspWifi<'static>>>,
    #[cfg(not(target_os = "espidf"))]
    sim_connects: u32,
    #[cfg(not(target_os = "espidf"))]
    sim_up_after: u32,
    #[cfg(not(target_os = "espidf"))]
    sim_up: bool,
}

impl WifiLink {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            ssid: config.wifi_ssid.clone(),
            password: config.wifi_password.clone(),
            #[cfg(target_os = "espidf")]
            wifi: None,
            #[cfg(not(target_os = "espidf"))]
            sim_connects: 0,
            #[cfg(not(target_os = "espidf"))]
            sim_up_after: 1,
            #[cfg(not(target_os = "espidf"))]
            sim_up: false,
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    /// Attach the driver handle created from the modem peripheral in
    /// `main`. Until this is called, connect attempts fail.
    #[cfg(target_os = "espidf")]
    pub fn attach(&mut self, wifi: Box<esp_idf_svc::wifi::EspWifi<'static>>) {
        self.wifi = Some(wifi);
    }

    #[cfg(target_os = "espidf")]
    fn platform_start_connect(&mut self) -> Result<(), CommsError> {
        use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};

        let Some(wifi) = self.wifi.as_mut() else {
            warn!("WiFi(espidf): driver not attached");
            return Err(CommsError::LinkConnectFailed);
        };

        let client = ClientConfiguration {
            ssid: self.ssid.as_str().try_into().map_err(|()| CommsError::LinkConnectFailed)?,
            password: self
                .password
                .as_str()
                .try_into()
                .map_err(|()| CommsError::LinkConnectFailed)?,
            auth_method: if self.password.is_empty() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            },
            ..Default::default()
        };
        wifi.set_configuration(&Configuration::Client(client))
            .map_err(|_| CommsError::LinkConnectFailed)?;
        if !wifi.is_started().unwrap_or(false) {
            wifi.start().map_err(|_| CommsError::LinkConnectFailed)?;
        }
        // Non-blocking: association completion is observed via is_up().
        wifi.connect().map_err(|_| CommsError::LinkConnectFailed)?;
        info!("WiFi: STA connect started (SSID='{}')", self.ssid);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_is_up(&self) -> bool {
        let Some(wifi) = self.wifi.as_ref() else {
            return false;
        };
        // "Up" needs association *and* an acquired address.
        if !wifi.is_connected().unwrap_or(false) {
            return false;
        }
        wifi.sta_netif()
            .get_ip_info()
            .map(|ip| u32::from(ip.ip) != 0)
            .unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start_connect(&mut self) -> Result<(), CommsError> {
        self.sim_connects += 1;
        if self.sim_connects >= self.sim_up_after {
            self.sim_up = true;
        }
        info!(
            "WiFi(sim): connect attempt {} to '{}' (up={})",
            self.sim_connects, self.ssid, self.sim_up
        );
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_up(&self) -> bool {
        self.sim_up
    }

    // ── Simulation controls (host tests only) ─────────────────

    /// Require `n` connect attempts before the simulated link comes up.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_up_after(&mut self, n: u32) {
        self.sim_up_after = n;
        self.sim_up = self.sim_connects >= n;
    }

    /// Simulate an asynchronous link loss.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_drop(&mut self) {
        self.sim_up = false;
        self.sim_up_after = self.sim_connects + 1;
    }
}

impl LinkPort for WifiLink {
    fn start_connect(&mut self) -> Result<(), CommsError> {
        self.platform_start_connect()
    }

    fn is_up(&self) -> bool {
        self.platform_is_up()
    }
}
