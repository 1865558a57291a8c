//! Configuration system for the simulator.
//!
//! This module defines all configuration structures and enums used to
//! parameterize a run. It provides:
//! 1. **Defaults:** Baseline hardware constants (clock, supply sampling,
//!    storage capacitor).
//! 2. **Structures:** Hierarchical config for general, power, and scheme
//!    settings.
//! 3. **Enums:** The closed set of checkpointing schemes.
//!
//! Configuration is supplied via JSON (every field individually
//! defaulted, so a partial file works) or `Config::default()`.

use serde::Deserialize;

/// Default configuration constants for the simulator.
///
/// These values define the baseline hardware configuration when not
/// explicitly overridden in a JSON configuration file.
mod defaults {
    /// Core clock frequency (24 MHz).
    ///
    /// Sets the cycle-to-wall-time conversion for the whole run.
    pub const CLOCK_FREQUENCY: u32 = 24_000_000;

    /// Seconds between supply-voltage trace samples (1 ms).
    pub const SAMPLE_PERIOD: f64 = 0.001;

    /// Storage capacitance in farads (100 uF).
    pub const CAPACITANCE: f64 = 100e-6;

    /// Rated capacitor voltage in volts.
    ///
    /// Caps the energy the battery can hold; harvest beyond this level
    /// is lost to the environment.
    pub const VOLTAGE_RATING: f64 = 3.3;

    /// Harvest while the core executes, not only while it is off.
    pub const ALWAYS_HARVEST: bool = true;

    /// Instructions between periodic-scheme backups.
    pub const BACKUP_INTERVAL: u64 = 1000;
}

/// Checkpointing scheme implementations.
///
/// Selects the policy that decides when the core runs and when its
/// state is saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemeKind {
    /// Idealized reference scheme.
    ///
    /// Always active, never backs up, and draws from an effectively
    /// unbounded battery. Every run completes; progress is perfect.
    #[default]
    #[serde(alias = "Baseline")]
    Baseline,

    /// Periodic checkpointing.
    ///
    /// Backs up every N instructions, powers on at a charge threshold,
    /// and powers off when the battery can no longer fund a backup.
    #[serde(alias = "Periodic")]
    Periodic,
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use ehsim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.general.clock_frequency, 24_000_000);
/// assert!(config.general.always_harvest);
/// ```
///
/// Deserializing from JSON, with unspecified fields defaulted:
///
/// ```
/// use ehsim_core::config::{Config, SchemeKind};
///
/// let json = r#"{
///     "power": { "capacitance": 4.7e-5, "voltage_rating": 2.5 },
///     "scheme": { "kind": "periodic", "backup_interval": 500 }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.scheme.kind, SchemeKind::Periodic);
/// assert_eq!(config.scheme.backup_interval, 500);
/// assert_eq!(config.general.clock_frequency, 24_000_000);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General simulation settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Power supply and storage parameters
    #[serde(default)]
    pub power: PowerConfig,
    /// Checkpointing scheme selection and tuning
    #[serde(default)]
    pub scheme: SchemeConfig,
}

/// General simulation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Core clock frequency in hertz
    #[serde(default = "GeneralConfig::default_clock_frequency")]
    pub clock_frequency: u32,

    /// Harvest during active execution, not only while powered off
    #[serde(default = "GeneralConfig::default_always_harvest")]
    pub always_harvest: bool,
}

impl GeneralConfig {
    /// Returns the default core clock frequency.
    fn default_clock_frequency() -> u32 {
        defaults::CLOCK_FREQUENCY
    }

    /// Default harvesting to always-on, the common hardware arrangement.
    fn default_always_harvest() -> bool {
        defaults::ALWAYS_HARVEST
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            clock_frequency: defaults::CLOCK_FREQUENCY,
            always_harvest: defaults::ALWAYS_HARVEST,
        }
    }
}

/// Power supply and storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PowerConfig {
    /// Seconds between voltage-trace samples
    #[serde(default = "PowerConfig::default_sample_period")]
    pub sample_period: f64,

    /// Storage capacitance in farads
    #[serde(default = "PowerConfig::default_capacitance")]
    pub capacitance: f64,

    /// Rated capacitor voltage in volts
    #[serde(default = "PowerConfig::default_voltage_rating")]
    pub voltage_rating: f64,
}

impl PowerConfig {
    /// Returns the default trace sample period in seconds.
    fn default_sample_period() -> f64 {
        defaults::SAMPLE_PERIOD
    }

    /// Returns the default storage capacitance in farads.
    fn default_capacitance() -> f64 {
        defaults::CAPACITANCE
    }

    /// Returns the default rated capacitor voltage in volts.
    fn default_voltage_rating() -> f64 {
        defaults::VOLTAGE_RATING
    }
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            sample_period: defaults::SAMPLE_PERIOD,
            capacitance: defaults::CAPACITANCE,
            voltage_rating: defaults::VOLTAGE_RATING,
        }
    }
}

/// Checkpointing scheme selection and tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemeConfig {
    /// Scheme implementation to run
    #[serde(default)]
    pub kind: SchemeKind,

    /// Instructions between periodic backups
    #[serde(default = "SchemeConfig::default_backup_interval")]
    pub backup_interval: u64,
}

impl SchemeConfig {
    /// Returns the default periodic backup interval in instructions.
    fn default_backup_interval() -> u64 {
        defaults::BACKUP_INTERVAL
    }
}

impl Default for SchemeConfig {
    fn default() -> Self {
        Self {
            kind: SchemeKind::default(),
            backup_interval: defaults::BACKUP_INTERVAL,
        }
    }
}
