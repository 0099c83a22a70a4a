use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration loaded from `~/.netmaprc`.
#[derive(Debug, Clone, Serialize, Deserialize, Resource)]
pub struct NetmapConfig {
    /// Base URL of the monitoring backend, e.g. "http://127.0.0.1:8080".
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Seconds between topology polls.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Seconds to wait after triggering discovery before re-polling.
    #[serde(default = "default_rediscover_delay_secs")]
    pub rediscover_delay_secs: u64,
    /// Device-detail page, `{id}` replaced by the clicked device's id.
    #[serde(default = "default_detail_url_template")]
    pub detail_url_template: String,
    /// Background color of the canvas in hex format (e.g. "#10141c").
    #[serde(default = "default_background_color")]
    pub background_color: String,
    /// Region border/label color in hex format.
    #[serde(default = "default_region_color")]
    pub region_color: String,
    #[serde(default = "default_status_message_duration")]
    pub status_message_duration: f32,
}

fn default_api_base_url() -> String { "http://127.0.0.1:8080".to_string() }
fn default_poll_interval_secs() -> u64 { 30 }
fn default_rediscover_delay_secs() -> u64 { 5 }
fn default_detail_url_template() -> String {
    "http://127.0.0.1:8080/devices/{id}".to_string()
}
fn default_background_color() -> String { "#10141c".to_string() }
fn default_region_color() -> String { "#3b4a6b".to_string() }
fn default_status_message_duration() -> f32 { 4.0 }

impl Default for NetmapConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            poll_interval_secs: default_poll_interval_secs(),
            rediscover_delay_secs: default_rediscover_delay_secs(),
            detail_url_template: default_detail_url_template(),
            background_color: default_background_color(),
            region_color: default_region_color(),
            status_message_duration: default_status_message_duration(),
        }
    }
}

impl NetmapConfig {
    /// Parse the background hex string into a Bevy Color.
    pub fn bg_color(&self) -> Color {
        bevy::color::Srgba::hex(&self.background_color)
            .unwrap_or(bevy::color::Srgba::new(0.06, 0.08, 0.11, 1.0))
            .into()
    }

    /// Parse the region hex string into a Bevy Color.
    pub fn region_color(&self) -> Color {
        bevy::color::Srgba::hex(&self.region_color)
            .unwrap_or(bevy::color::Srgba::new(0.23, 0.29, 0.42, 1.0))
            .into()
    }

    /// The detail URL for one device id.
    pub fn detail_url(&self, id: i64) -> String {
        self.detail_url_template.replace("{id}", &id.to_string())
    }
}

/// Attempts to load the configuration from `~/.netmaprc`.
/// Falls back to default if the file is missing or invalid.
pub fn load_config() -> NetmapConfig {
    if let Ok(home) = env::var("HOME") {
        return load_config_from(&PathBuf::from(home).join(".netmaprc"));
    }
    NetmapConfig::default()
}

/// Load from an explicit path (separated out for tests).
pub fn load_config_from(path: &Path) -> NetmapConfig {
    if let Ok(contents) = fs::read_to_string(path) {
        match toml::from_str(&contents) {
            Ok(config) => return config,
            Err(err) => {
                eprintln!("Failed to parse {}: {}", path.display(), err);
            }
        }
    }
    NetmapConfig::default()
}
