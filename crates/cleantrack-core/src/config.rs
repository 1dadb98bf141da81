//! Configuration loading and typed config structures.
//!
//! The configuration lives in `cleantrack-config.yaml` next to the binary's
//! working directory. Every field has a default matching the demo
//! deployment, so a missing file or a partial file is fine.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is outside its allowed range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `cleantrack-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CleanTrackConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerSettings,

    /// Tick timing and random-walk parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Thresholds and rewards applied to world state.
    #[serde(default)]
    pub rules: WorldRules,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CleanTrackConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment overrides are not applied here; see
    /// [`Self::apply_env_overrides`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides:
    /// - `PORT` overrides `server.port`
    /// - `CLEANTRACK_HOST` overrides `server.host`
    /// - `CLEANTRACK_SEED` overrides `simulation.seed`
    ///
    /// None of these fields take part in [`Self::validate`]. Values that do
    /// not parse leave the field untouched and are returned so the caller
    /// can report them once logging is up.
    pub fn apply_env_overrides(&mut self) -> Vec<RejectedOverride> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Vec<RejectedOverride> {
        let mut rejected = Vec::new();
        if let Some(port) = lookup("PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(e) => rejected.push(RejectedOverride::new("PORT", port, &e)),
            }
        }
        if let Some(host) = lookup("CLEANTRACK_HOST") {
            self.server.host = host;
        }
        if let Some(seed) = lookup("CLEANTRACK_SEED") {
            match seed.trim().parse::<u64>() {
                Ok(seed) => self.simulation.seed = Some(seed),
                Err(e) => rejected.push(RejectedOverride::new("CLEANTRACK_SEED", seed, &e)),
            }
        }
        rejected
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        self.rules.validate()
    }
}

/// An environment override that was ignored because it did not parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedOverride {
    /// Environment variable name.
    pub key: &'static str,
    /// The raw value found in the environment.
    pub value: String,
    /// Parse error text.
    pub reason: String,
}

impl RejectedOverride {
    fn new(key: &'static str, value: String, reason: &impl std::fmt::Display) -> Self {
        Self {
            key,
            value,
            reason: reason.to_string(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Geographic box that trucks are kept inside.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Bounds {
    /// Southern edge.
    pub min_lat: f64,
    /// Northern edge.
    pub max_lat: f64,
    /// Western edge.
    pub min_lng: f64,
    /// Eastern edge.
    pub max_lng: f64,
}

impl Bounds {
    /// Whether the point lies inside the box (edges included).
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lng..=self.max_lng).contains(&lng)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let finite = [self.min_lat, self.max_lat, self.min_lng, self.max_lng]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.min_lat > self.max_lat || self.min_lng > self.max_lng {
            return Err(ConfigError::Invalid {
                field: "simulation.bounds",
                reason: format!("{self:?} is not a finite, ordered box"),
            });
        }
        Ok(())
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min_lat: 12.960,
            max_lat: 12.985,
            min_lng: 77.580,
            max_lng: 77.610,
        }
    }
}

/// Tick timing and random-walk parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Real-time milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Fixed RNG seed. `None` seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Box trucks are clamped to.
    #[serde(default)]
    pub bounds: Bounds,

    /// Maximum per-axis truck displacement per unit of speed per tick.
    #[serde(default = "default_max_step")]
    pub max_step: f64,

    /// Chance per truck per tick that its status is re-rolled.
    #[serde(default = "default_status_flip_probability")]
    pub status_flip_probability: f64,

    /// Smallest fill-level change per tick.
    #[serde(default = "default_fill_drift_min")]
    pub fill_drift_min: i32,

    /// Largest fill-level change per tick.
    #[serde(default = "default_fill_drift_max")]
    pub fill_drift_max: i32,
}

impl SimulationConfig {
    /// Check ranges the random source depends on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "simulation.tick_interval_ms",
                reason: String::from("must be greater than zero"),
            });
        }
        self.bounds.validate()?;
        if !self.max_step.is_finite() || self.max_step < 0.0 {
            return Err(ConfigError::Invalid {
                field: "simulation.max_step",
                reason: format!("{} is not a finite, non-negative step", self.max_step),
            });
        }
        if !(0.0..=1.0).contains(&self.status_flip_probability) {
            return Err(ConfigError::Invalid {
                field: "simulation.status_flip_probability",
                reason: format!("{} is not in [0, 1]", self.status_flip_probability),
            });
        }
        if self.fill_drift_min > self.fill_drift_max {
            return Err(ConfigError::Invalid {
                field: "simulation.fill_drift_min",
                reason: format!(
                    "{} is greater than fill_drift_max {}",
                    self.fill_drift_min, self.fill_drift_max
                ),
            });
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            seed: None,
            bounds: Bounds::default(),
            max_step: default_max_step(),
            status_flip_probability: default_status_flip_probability(),
            fill_drift_min: default_fill_drift_min(),
            fill_drift_max: default_fill_drift_max(),
        }
    }
}

/// Thresholds and rewards applied to world state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WorldRules {
    /// A bin with `fill_level` strictly above this counts as full.
    #[serde(default = "default_full_threshold")]
    pub full_threshold: u8,

    /// A bin with `fill_level` strictly below this accepts more waste.
    #[serde(default = "default_available_threshold")]
    pub available_threshold: u8,

    /// Eco points granted per accepted report.
    #[serde(default = "default_report_reward")]
    pub report_reward: u64,

    /// Eco points the world starts with.
    #[serde(default = "default_initial_eco_points")]
    pub initial_eco_points: u64,
}

impl WorldRules {
    fn validate(self) -> Result<(), ConfigError> {
        if self.full_threshold > 100 || self.available_threshold > 100 {
            return Err(ConfigError::Invalid {
                field: "rules",
                reason: String::from("fill thresholds must be within 0..=100"),
            });
        }
        Ok(())
    }
}

impl Default for WorldRules {
    fn default() -> Self {
        Self {
            full_threshold: default_full_threshold(),
            available_threshold: default_available_threshold(),
            report_reward: default_report_reward(),
            initial_eco_points: default_initial_eco_points(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    3000
}

const fn default_tick_interval_ms() -> u64 {
    3000
}

const fn default_max_step() -> f64 {
    0.0005
}

const fn default_status_flip_probability() -> f64 {
    0.1
}

const fn default_fill_drift_min() -> i32 {
    -4
}

const fn default_fill_drift_max() -> i32 {
    5
}

const fn default_full_threshold() -> u8 {
    80
}

const fn default_available_threshold() -> u8 {
    90
}

const fn default_report_reward() -> u64 {
    50
}

const fn default_initial_eco_points() -> u64 {
    1250
}

fn default_log_level() -> String {
    String::from("info")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn empty_yaml_yields_demo_defaults() {
        let config: CleanTrackConfig = serde_yml::from_str("{}").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.simulation.tick_interval_ms, 3000);
        assert_eq!(config.simulation.fill_drift_min, -4);
        assert_eq!(config.simulation.fill_drift_max, 5);
        assert_eq!(config.rules.report_reward, 50);
        assert_eq!(config.rules.initial_eco_points, 1250);
        assert_eq!(config.logging.format, LogFormat::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn shipped_config_file_matches_defaults() {
        let yaml = include_str!("../../../cleantrack-config.yaml");
        let parsed: CleanTrackConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(parsed, CleanTrackConfig::default());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let yaml = "simulation:\n  seed: 42\n  tick_interval_ms: 500\nlogging:\n  format: json\n";
        let config: CleanTrackConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.simulation.tick_interval_ms, 500);
        assert_eq!(config.simulation.bounds, Bounds::default());
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let yaml = "simulation:\n  bounds: { min_lat: 13.0, max_lat: 12.0, min_lng: 77.0, max_lng: 78.0 }\n";
        let err = CleanTrackConfig::parse(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "simulation.bounds", .. }));
    }

    #[test]
    fn flip_probability_above_one_is_rejected() {
        let mut config = CleanTrackConfig::default();
        config.simulation.status_flip_probability = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let mut config = CleanTrackConfig::default();
        config.simulation.tick_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn env_overrides_apply_and_bad_values_are_ignored() {
        let env: BTreeMap<&str, &str> = [("PORT", "8081"), ("CLEANTRACK_SEED", "not-a-number")]
            .into_iter()
            .collect();
        let mut config = CleanTrackConfig::default();
        let rejected = config.apply_overrides(|key| env.get(key).map(|v| (*v).to_owned()));
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.simulation.seed, None);
        assert_eq!(config.server.host, "0.0.0.0");

        assert_eq!(rejected.len(), 1);
        let seed = rejected.first().unwrap();
        assert_eq!(seed.key, "CLEANTRACK_SEED");
        assert_eq!(seed.value, "not-a-number");
        assert!(!seed.reason.is_empty());
    }

    #[test]
    fn every_bad_override_is_reported_in_order() {
        let env: BTreeMap<&str, &str> = [
            ("PORT", "70000"),
            ("CLEANTRACK_HOST", "127.0.0.1"),
            ("CLEANTRACK_SEED", "-1"),
        ]
        .into_iter()
        .collect();
        let mut config = CleanTrackConfig::default();
        let rejected = config.apply_overrides(|key| env.get(key).map(|v| (*v).to_owned()));
        let keys: Vec<&str> = rejected.iter().map(|r| r.key).collect();
        assert_eq!(keys, ["PORT", "CLEANTRACK_SEED"]);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn clean_environment_rejects_nothing() {
        let mut config = CleanTrackConfig::default();
        assert!(config.apply_overrides(|_| None).is_empty());
        assert_eq!(config, CleanTrackConfig::default());
    }

    #[test]
    fn bounds_contains_includes_edges() {
        let b = Bounds::default();
        assert!(b.contains(12.960, 77.610));
        assert!(!b.contains(12.959, 77.600));
    }
}
