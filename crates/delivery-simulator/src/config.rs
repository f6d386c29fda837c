//! # Simulator Configuration
//!
//! Environment-based configuration for the delivery simulation. CLI flags
//! in the binary override whatever is loaded here.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use delivery_domain::Position;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::hubs::MAX_HUB_RADIUS;

/// Default hub scatter center (Ho Chi Minh City).
pub const DEFAULT_CENTER: Position = Position::new(106.7000, 10.7700);
/// Default scatter radius in degrees (roughly 5 km).
pub const DEFAULT_HUB_RADIUS: f64 = 0.05;
pub const DEFAULT_HUB_COUNT: usize = 100;
pub const DEFAULT_DRONE_COUNT: usize = 10;
/// Default step size in degrees per tick.
pub const DEFAULT_SPEED: f64 = 0.00005;
pub const DEFAULT_TICK_MS: u64 = 2000;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("speed must be a positive finite number, got {0}")]
    InvalidSpeed(f64),

    #[error("tick interval must be at least 1 ms")]
    InvalidTickInterval,

    #[error("hub radius must be between 0 and 180 degrees, got {0}")]
    InvalidRadius(f64),

    #[error("hub center must be finite, got ({lon}, {lat})")]
    InvalidCenter { lon: f64, lat: f64 },

    #[error("at least 2 hubs are required, got {0}")]
    TooFewHubs(usize),
}

/// Simulation configuration
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Center of the hub scatter square
    pub center: Position,

    /// Half side of the hub scatter square, in degrees
    pub hub_radius: f64,

    /// Number of hubs to generate
    pub hub_count: usize,

    /// Number of drones to launch
    pub drone_count: usize,

    /// Step size in degrees per tick
    pub speed: f64,

    /// Wall-clock tick period in milliseconds
    pub tick_ms: u64,

    /// Seed for reproducible runs
    pub seed: Option<u64>,

    /// Map service access token handed to the map collaborator
    pub map_token: Option<String>,

    /// Logging level
    pub log_level: String,
}

impl SimulatorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            center: Position::new(
                parse_var(&lookup, "HUB_CENTER_LON").unwrap_or(DEFAULT_CENTER.longitude),
                parse_var(&lookup, "HUB_CENTER_LAT").unwrap_or(DEFAULT_CENTER.latitude),
            ),
            hub_radius: parse_var(&lookup, "HUB_RADIUS").unwrap_or(DEFAULT_HUB_RADIUS),
            hub_count: parse_var(&lookup, "HUB_COUNT").unwrap_or(DEFAULT_HUB_COUNT),
            drone_count: parse_var(&lookup, "DRONE_COUNT").unwrap_or(DEFAULT_DRONE_COUNT),
            speed: parse_var(&lookup, "DRONE_SPEED").unwrap_or(DEFAULT_SPEED),
            tick_ms: parse_var(&lookup, "TICK_MS").unwrap_or(DEFAULT_TICK_MS),
            seed: parse_var(&lookup, "SIM_SEED"),
            map_token: lookup("MAPBOX_TOKEN").filter(|token| !token.is_empty()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        }
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(ConfigError::InvalidSpeed(self.speed));
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::InvalidTickInterval);
        }
        if !(0.0..=MAX_HUB_RADIUS).contains(&self.hub_radius) {
            return Err(ConfigError::InvalidRadius(self.hub_radius));
        }
        if !(self.center.longitude.is_finite() && self.center.latitude.is_finite()) {
            return Err(ConfigError::InvalidCenter {
                lon: self.center.longitude,
                lat: self.center.latitude,
            });
        }
        if self.hub_count < 2 {
            return Err(ConfigError::TooFewHubs(self.hub_count));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Random source for generation: seeded when a seed is configured.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SimulatorConfig::default();
        assert_eq!(config.center, DEFAULT_CENTER);
        assert_eq!(config.hub_count, 100);
        assert_eq!(config.drone_count, 10);
        assert_eq!(config.tick_interval(), Duration::from_millis(2000));
        assert!(config.map_token.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let config = SimulatorConfig::from_lookup(lookup_from(&[
            ("DRONE_COUNT", "25"),
            ("DRONE_SPEED", "0.0001"),
            ("TICK_MS", "not-a-number"),
            ("SIM_SEED", "42"),
            ("MAPBOX_TOKEN", "pk.test"),
        ]));
        assert_eq!(config.drone_count, 25);
        assert!((config.speed - 0.0001).abs() < f64::EPSILON);
        assert_eq!(config.tick_ms, DEFAULT_TICK_MS);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.map_token.as_deref(), Some("pk.test"));
    }

    #[test]
    fn test_validate_rejects_degenerate_values() {
        let mut config = SimulatorConfig::default();
        config.speed = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidSpeed(0.0)));

        let mut config = SimulatorConfig::default();
        config.hub_count = 1;
        assert_eq!(config.validate(), Err(ConfigError::TooFewHubs(1)));

        let mut config = SimulatorConfig::default();
        config.tick_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidTickInterval));

        let mut config = SimulatorConfig::default();
        config.hub_radius = -1.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidRadius(-1.0)));
    }

    #[test]
    fn test_validate_rejects_radius_beyond_geographic_range() {
        let mut config = SimulatorConfig::default();
        config.hub_radius = 1e308;
        assert_eq!(config.validate(), Err(ConfigError::InvalidRadius(1e308)));

        config.hub_radius = MAX_HUB_RADIUS;
        assert!(config.validate().is_ok());
    }
}
