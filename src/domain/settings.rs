use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Logging knobs. Console output is always on for the shell; the file copy
/// is opt-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    /// "trace", "debug", "info", "warn" or "error"; `RUST_LOG` wins.
    #[serde(default = "default_level")]
    pub level: String,
    /// Mirror log lines into a daily-rolling file under `log_dir`.
    #[serde(default)]
    pub log_to_file: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            log_to_file: false,
            log_dir: default_log_dir(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
fn default_log_dir() -> String {
    "logs".to_string()
}

/// Tuning knobs for capability binding and target selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkSettings {
    /// How many times the enabled-check polls for the capability before
    /// reporting "disabled".
    #[serde(default = "default_bind_attempts")]
    pub bind_attempts: u32,
    /// Delay between bind polls in milliseconds.
    #[serde(default = "default_bind_interval_ms")]
    pub bind_interval_ms: u64,
    /// One-shot wait before `connect` gives up on an unbound capability.
    #[serde(default = "default_rebind_delay_ms")]
    pub rebind_delay_ms: u64,
    /// Substring a device name must contain to be auto-selected.
    #[serde(default = "default_target_name")]
    pub target_name: String,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            bind_attempts: default_bind_attempts(),
            bind_interval_ms: default_bind_interval_ms(),
            rebind_delay_ms: default_rebind_delay_ms(),
            target_name: default_target_name(),
        }
    }
}

fn default_bind_attempts() -> u32 {
    20
}
fn default_bind_interval_ms() -> u64 {
    500
}
fn default_rebind_delay_ms() -> u64 {
    1000
}
fn default_target_name() -> String {
    "ZUMOE2".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub link: LinkSettings,

    /// Addresses the rover was reached at before.
    #[serde(default)]
    pub known_addresses: Vec<String>,
    #[serde(default)]
    pub last_connected_address: Option<String>,

    #[serde(default)]
    pub log_settings: LogSettings,
}

pub struct SettingsService {
    settings: Settings,
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self::at_path(Self::default_settings_path()?))
    }

    /// Load from `path`, falling back to defaults when the file is missing
    /// or unreadable.
    pub fn at_path(path: PathBuf) -> Self {
        let settings = Self::load_from_file(&path).unwrap_or_default();
        Self {
            settings,
            settings_path: path,
        }
    }

    fn default_settings_path() -> anyhow::Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        path.push("ZumoLink");
        fs::create_dir_all(&path)?;
        path.push("settings.json");
        Ok(path)
    }

    fn load_from_file(path: &PathBuf) -> anyhow::Result<Settings> {
        let contents = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&contents)?;
        Ok(settings)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self.settings)?;
        fs::write(&self.settings_path, json)?;
        Ok(())
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Record a successful connection target and persist it.
    pub fn remember_address(&mut self, address: &str) -> anyhow::Result<()> {
        if !self.settings.known_addresses.iter().any(|a| a == address) {
            self.settings.known_addresses.push(address.to_string());
        }
        self.settings.last_connected_address = Some(address.to_string());
        self.save()
    }
}
