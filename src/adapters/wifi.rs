//! WiFi connectivity adapter.
//!
//! Implements [`ConnectivityPort`], the hexagonal boundary for network
//! bring-up.  The node joins the configured network as a station; if that
//! keeps failing it falls back to hosting its own access point so the
//! control surface stays reachable.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stubs for host-side tests.
//!
//! ## Bring-up policy
//!
//! ```text
//!   join_station ──fail──▶ sleep(retry_delay) ──▶ join_station ... (N attempts)
//!        │ ok                                          │ all failed
//!        ▼                                             ▼
//!   NetworkMode::Station                    start_access_point ──▶ NetworkMode::AccessPoint
//! ```

use std::time::Duration;

use log::{info, warn};

use crate::error::CommsError;

// ───────────────────────────────────────────────────────────────
// Port trait
// ───────────────────────────────────────────────────────────────

pub trait ConnectivityPort {
    /// One association attempt.  Returns once the interface has an address.
    fn join_station(&mut self, creds: &WifiCredentials) -> Result<(), CommsError>;
    fn start_access_point(&mut self, creds: &WifiCredentials) -> Result<(), CommsError>;
    fn rssi(&self) -> Option<i8>;
}

/// How the node ended up on the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkMode {
    /// Joined the configured network.
    Station,
    /// Hosting its own network after station join failed.
    AccessPoint,
}

// ───────────────────────────────────────────────────────────────
// Credentials
// ───────────────────────────────────────────────────────────────

const DEFAULT_AP_SSID: &str = "HazardNode-Setup";
const DEFAULT_AP_PASS: &str = "hazardnode";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiCredentials {
    pub ssid: heapless::String<32>,
    pub password: heapless::String<64>,
}

impl WifiCredentials {
    pub fn new(ssid: &str, password: &str) -> Result<Self, CommsError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        let mut creds = Self {
            ssid: heapless::String::new(),
            password: heapless::String::new(),
        };
        creds.ssid.push_str(ssid).map_err(|_| CommsError::InvalidSsid)?;
        creds
            .password
            .push_str(password)
            .map_err(|_| CommsError::InvalidPassword)?;
        Ok(creds)
    }

    /// Station credentials baked in at build time.
    pub fn station_from_env() -> Result<Self, CommsError> {
        let ssid = option_env!("HAZARD_WIFI_SSID").ok_or(CommsError::NoCredentials)?;
        Self::new(ssid, option_env!("HAZARD_WIFI_PASS").unwrap_or(""))
    }

    /// Fallback access-point credentials, with built-in defaults.
    pub fn access_point_from_env() -> Result<Self, CommsError> {
        Self::new(
            option_env!("HAZARD_AP_SSID").unwrap_or(DEFAULT_AP_SSID),
            option_env!("HAZARD_AP_PASS").unwrap_or(DEFAULT_AP_PASS),
        )
    }

    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), CommsError> {
    if ssid.is_empty() || ssid.len() > 32 {
        return Err(CommsError::InvalidSsid);
    }
    if !is_printable_ascii(ssid) {
        return Err(CommsError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), CommsError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(CommsError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Bring-up
// ───────────────────────────────────────────────────────────────

/// Join `station` with bounded retries, else start the fallback AP.
///
/// `station` is `Err` when no usable credentials were configured; the
/// node then goes straight to the access point.
pub fn bring_up<P: ConnectivityPort>(
    port: &mut P,
    station: Result<&WifiCredentials, CommsError>,
    access_point: &WifiCredentials,
    attempts: u8,
    retry_delay_ms: u32,
) -> Result<NetworkMode, CommsError> {
    match station {
        Ok(creds) => {
            for attempt in 1..=attempts {
                info!("WiFi: joining '{}' (attempt {}/{})", creds.ssid, attempt, attempts);
                match port.join_station(creds) {
                    Ok(()) => {
                        info!("WiFi: joined '{}' (RSSI={:?})", creds.ssid, port.rssi());
                        return Ok(NetworkMode::Station);
                    }
                    Err(e) => warn!("WiFi: join failed: {}", e),
                }
                if attempt < attempts {
                    std::thread::sleep(Duration::from_millis(u64::from(retry_delay_ms)));
                }
            }
            warn!("WiFi: giving up on '{}' after {} attempts", creds.ssid, attempts);
        }
        Err(e) => warn!("WiFi: station disabled: {}", e),
    }

    info!("WiFi: starting access point '{}'", access_point.ssid);
    port.start_access_point(access_point)?;
    Ok(NetworkMode::AccessPoint)
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{
    AccessPointConfiguration, AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi,
};

pub struct WifiAdapter {
    #[cfg(target_os = "espidf")]
    wifi: BlockingWifi<EspWifi<'static>>,
    /// Simulation: attempt number on which the join succeeds (`None` = never).
    #[cfg(not(target_os = "espidf"))]
    sim_join_on: Option<u32>,
    #[cfg(not(target_os = "espidf"))]
    sim_join_attempts: u32,
    #[cfg(not(target_os = "espidf"))]
    sim_ap_up: bool,
    mode: Option<NetworkMode>,
}

impl WifiAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(wifi: BlockingWifi<EspWifi<'static>>) -> Self {
        Self { wifi, mode: None }
    }

    /// Simulation adapter whose join succeeds on attempt `join_on`.
    #[cfg(not(target_os = "espidf"))]
    pub fn new_sim(join_on: Option<u32>) -> Self {
        Self {
            sim_join_on: join_on,
            sim_join_attempts: 0,
            sim_ap_up: false,
            mode: None,
        }
    }

    pub fn mode(&self) -> Option<NetworkMode> {
        self.mode
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_join_attempts(&self) -> u32 {
        self.sim_join_attempts
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_join(&mut self, creds: &WifiCredentials) -> Result<(), CommsError> {
        let cfg = Configuration::Client(ClientConfiguration {
            ssid: creds.ssid.as_str().try_into().map_err(|_| CommsError::InvalidSsid)?,
            password: creds
                .password
                .as_str()
                .try_into()
                .map_err(|_| CommsError::InvalidPassword)?,
            auth_method: if creds.is_open() { AuthMethod::None } else { AuthMethod::WPA2Personal },
            ..Default::default()
        });
        let join = |wifi: &mut BlockingWifi<EspWifi<'static>>| {
            wifi.set_configuration(&cfg)?;
            if !wifi.is_started()? {
                wifi.start()?;
            }
            wifi.connect()?;
            wifi.wait_netif_up()
        };
        join(&mut self.wifi).map_err(|e| {
            warn!("WiFi(espidf): {}", e);
            // Leave the driver clean for the next attempt.
            let _ = self.wifi.disconnect();
            CommsError::WifiJoinFailed
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_join(&mut self, creds: &WifiCredentials) -> Result<(), CommsError> {
        self.sim_join_attempts += 1;
        match self.sim_join_on {
            Some(n) if self.sim_join_attempts >= n => {
                info!("WiFi(sim): associated with '{}'", creds.ssid);
                Ok(())
            }
            _ => Err(CommsError::WifiJoinFailed),
        }
    }

    #[cfg(target_os = "espidf")]
    fn platform_start_ap(&mut self, creds: &WifiCredentials) -> Result<(), CommsError> {
        let cfg = Configuration::AccessPoint(AccessPointConfiguration {
            ssid: creds.ssid.as_str().try_into().map_err(|_| CommsError::InvalidSsid)?,
            password: creds
                .password
                .as_str()
                .try_into()
                .map_err(|_| CommsError::InvalidPassword)?,
            auth_method: if creds.is_open() { AuthMethod::None } else { AuthMethod::WPA2Personal },
            channel: 1,
            ..Default::default()
        });
        let start = |wifi: &mut BlockingWifi<EspWifi<'static>>| {
            if wifi.is_started()? {
                wifi.stop()?;
            }
            wifi.set_configuration(&cfg)?;
            wifi.start()?;
            wifi.wait_netif_up()
        };
        start(&mut self.wifi).map_err(|e| {
            warn!("WiFi(espidf): AP start failed: {}", e);
            CommsError::AccessPointFailed
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start_ap(&mut self, creds: &WifiCredentials) -> Result<(), CommsError> {
        info!("WiFi(sim): hosting '{}'", creds.ssid);
        self.sim_ap_up = true;
        Ok(())
    }
}

impl ConnectivityPort for WifiAdapter {
    fn join_station(&mut self, creds: &WifiCredentials) -> Result<(), CommsError> {
        self.platform_join(creds)?;
        self.mode = Some(NetworkMode::Station);
        Ok(())
    }

    fn start_access_point(&mut self, creds: &WifiCredentials) -> Result<(), CommsError> {
        self.platform_start_ap(creds)?;
        self.mode = Some(NetworkMode::AccessPoint);
        Ok(())
    }

    fn rssi(&self) -> Option<i8> {
        if self.mode == Some(NetworkMode::Station) {
            station_rssi()
        } else {
            None
        }
    }
}

/// RSSI of the associated AP, `None` when not joined as a station.
#[cfg(target_os = "espidf")]
pub fn station_rssi() -> Option<i8> {
    let mut ap_info: esp_idf_svc::sys::wifi_ap_record_t = Default::default();
    // SAFETY: fills a caller-owned record; returns an error when unassociated.
    let ret = unsafe { esp_idf_svc::sys::esp_wifi_sta_get_ap_info(&mut ap_info) };
    (ret == esp_idf_svc::sys::ESP_OK as i32).then_some(ap_info.rssi)
}

#[cfg(not(target_os = "espidf"))]
pub fn station_rssi() -> Option<i8> {
    None
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
