// src/settings.rs
use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use crate::chart::ChartConfig;
use crate::drivers::{SimulationProfile, TriggerSettings};
pub const DEFAULT_SETTINGS_FILE: &str = "power-profiler.json";
pub const SETTINGS_PATH_ENV: &str = "POWER_PROFILER_CONFIG";
/// Startup configuration, read from JSON. Every field is optional in the file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub samples_per_second: f64,
    /// How much history the sample ring keeps.
    pub buffer_seconds: f64,
    /// Length of the live window at startup.
    pub window_ms: f64,
    pub output_slots: usize,
    /// Initial trigger level in microamperes.
    pub trigger_level_ua: f64,
    pub trigger_length_ms: f64,
    pub simulation: SimulationSettings,
}
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub batch_len: usize,
    pub sleep_current_ua: f32,
    pub burst_current_ua: f32,
    pub burst_period_ms: f64,
    pub burst_length_ms: f64,
    pub noise_ua: f32,
    pub gap_probability: f64,
}
impl Default for AppSettings {
    fn default() -> Self {
        Self {
            samples_per_second: 100_000.0,
            buffer_seconds: 60.0,
            window_ms: 7_000.0,
            output_slots: ChartConfig::default().output_slots,
            trigger_level_ua: TriggerSettings::default().level,
            trigger_length_ms: TriggerSettings::default().length_ms,
            simulation: SimulationSettings::default(),
        }
    }
}
impl Default for SimulationSettings {
    fn default() -> Self {
        let profile = SimulationProfile::default();
        Self {
            batch_len: profile.batch_len,
            sleep_current_ua: profile.sleep_current_ua,
            burst_current_ua: profile.burst_current_ua,
            burst_period_ms: profile.burst_period_ms,
            burst_length_ms: profile.burst_length_ms,
            noise_ua: profile.noise_ua,
            gap_probability: profile.gap_probability,
        }
    }
}
impl AppSettings {
    /// Reads `$POWER_PROFILER_CONFIG`, else `./power-profiler.json`, else defaults.
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(SETTINGS_PATH_ENV) {
            return Self::from_path(Path::new(&path));
        }
        let path = PathBuf::from(DEFAULT_SETTINGS_FILE);
        if path.exists() {
            Self::from_path(&path)
        } else {
            debug!("no {DEFAULT_SETTINGS_FILE}, using defaults");
            Ok(Self::default())
        }
    }
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let settings = Self::from_json(&text)
            .with_context(|| format!("parsing settings in {}", path.display()))?;
        info!("loaded settings from {}", path.display());
        Ok(settings)
    }
    pub fn from_json(text: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }
    fn validate(&self) -> Result<()> {
        if !(self.samples_per_second > 0.0) {
            bail!("samples_per_second must be positive, got {}", self.samples_per_second);
        }
        if !(self.buffer_seconds > 0.0) {
            bail!("buffer_seconds must be positive, got {}", self.buffer_seconds);
        }
        if !(self.window_ms > 0.0) || self.window_ms > self.buffer_seconds * 1e3 {
            bail!(
                "window_ms must be in (0, {}], got {}",
                self.buffer_seconds * 1e3,
                self.window_ms
            );
        }
        if !(self.trigger_length_ms > 0.0) || self.trigger_length_ms > self.buffer_seconds * 1e3 {
            bail!(
                "trigger_length_ms must be in (0, {}], got {}",
                self.buffer_seconds * 1e3,
                self.trigger_length_ms
            );
        }
        Ok(())
    }
    pub fn chart_config(&self) -> ChartConfig {
        ChartConfig::default()
            .with_output_slots(self.output_slots)
            .with_default_window_us(self.window_ms * 1e3)
    }
    /// Disarmed trigger with the configured level and length.
    pub fn trigger_settings(&self) -> TriggerSettings {
        let defaults = TriggerSettings::default();
        defaults
            .with_level(self.trigger_level_ua)
            .with_window_range(
                defaults.window_range.min,
                self.trigger_length_ms.max(defaults.window_range.max),
            )
            .with_length(self.trigger_length_ms)
    }
    pub fn simulation_profile(&self) -> SimulationProfile {
        let sim = &self.simulation;
        SimulationProfile {
            samples_per_second: self.samples_per_second,
            batch_len: sim.batch_len,
            sleep_current_ua: sim.sleep_current_ua,
            burst_current_ua: sim.burst_current_ua,
            burst_period_ms: sim.burst_period_ms,
            burst_length_ms: sim.burst_length_ms,
            noise_ua: sim.noise_ua,
            gap_probability: sim.gap_probability,
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn partial_json_falls_back_to_defaults() {
        let settings =
            AppSettings::from_json(r#"{"window_ms": 500, "simulation": {"noise_ua": 2.5}}"#).unwrap();
        assert_eq!(settings.window_ms, 500.0);
        assert_eq!(settings.samples_per_second, 100_000.0);
        assert_eq!(settings.simulation.noise_ua, 2.5);
        assert_eq!(settings.simulation.batch_len, 1_000);
        let config = settings.chart_config();
        assert_eq!(config.default_window_us, 500_000.0);
        assert_eq!(config.output_slots, 4000);
        assert_eq!(settings.simulation_profile().noise_ua, 2.5);
    }
    #[test]
    fn trigger_settings_come_from_the_file() {
        let settings =
            AppSettings::from_json(r#"{"trigger_level_ua": 250, "trigger_length_ms": 400}"#).unwrap();
        let trigger = settings.trigger_settings();
        assert_eq!(trigger.level, 250.0);
        assert_eq!(trigger.length_ms, 400.0);
        assert!(!trigger.is_armed());
        assert_eq!(AppSettings::default().trigger_settings(), TriggerSettings::default());
    }
    #[test]
    fn invalid_values_are_rejected() {
        assert!(AppSettings::from_json(r#"{"samples_per_second": 0}"#).is_err());
        assert!(AppSettings::from_json(r#"{"buffer_seconds": 1, "window_ms": 5000}"#).is_err());
        assert!(AppSettings::from_json("not json").is_err());
        assert!(AppSettings::from_json(r#"{"trigger_length_ms": 0}"#).is_err());
    }
    #[test]
    fn missing_file_is_an_error_with_context() {
        let err = AppSettings::from_path(Path::new("/nonexistent/power-profiler.json")).unwrap_err();
        assert!(format!("{err:#}").contains("reading settings"));
    }
}
