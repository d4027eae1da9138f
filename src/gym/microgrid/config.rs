use std::path::Path;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use serde_with::{DurationSeconds, serde_as};

use crate::{
    data::TIME_RESOLUTION,
    error::{EnvError, IoError, MicrogridResult},
};

/// Construction-time parameters of the microgrid environment.
///
/// Action limits, storage capacities and the one-hour time resolution are
/// physical constants of the site and are not part of the configuration.
///
/// # Example
///
/// ```
/// # use microgrid_gym::prelude::*;
/// let cfg = EnvConfig::default()
///     .with_episode_length(chrono::TimeDelta::days(7))
///     .with_seed(42);
/// assert!(cfg.validate().is_ok());
/// ```
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Length of one episode. Must be a positive whole number of hours.
    #[serde_as(as = "DurationSeconds<i64>")]
    episode_length: TimeDelta,

    /// Fraction of battery charging power that ends up stored.
    battery_charge_loss: f64,

    /// Fraction of hydrogen charging power that ends up stored.
    hydrogen_charge_loss: f64,

    /// Flat tariff on every imported kWh [NOK/kWh].
    grid_tariff: f64,

    /// Tariff on the episode's highest hourly import [NOK/kW], charged once at the end.
    peak_grid_tariff: f64,

    /// Seed for the start-time sampler. `None` draws from OS entropy.
    seed: Option<u64>,

    /// Start a fresh episode inside the terminal `step()` instead of waiting for `reset()`.
    /// If that start fails the environment stays done until `reset()` is called.
    auto_reset: bool,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            episode_length: TimeDelta::days(30),
            battery_charge_loss: 0.85,
            hydrogen_charge_loss: 0.325,
            grid_tariff: 0.05,
            peak_grid_tariff: 49.0,
            seed: None,
            auto_reset: false,
        }
    }
}

impl EnvConfig {
    pub fn with_episode_length(self, episode_length: TimeDelta) -> Self {
        Self {
            episode_length,
            ..self
        }
    }

    pub fn with_battery_charge_loss(self, battery_charge_loss: f64) -> Self {
        Self {
            battery_charge_loss,
            ..self
        }
    }

    pub fn with_hydrogen_charge_loss(self, hydrogen_charge_loss: f64) -> Self {
        Self {
            hydrogen_charge_loss,
            ..self
        }
    }

    pub fn with_grid_tariff(self, grid_tariff: f64) -> Self {
        Self {
            grid_tariff,
            ..self
        }
    }

    pub fn with_peak_grid_tariff(self, peak_grid_tariff: f64) -> Self {
        Self {
            peak_grid_tariff,
            ..self
        }
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    pub fn with_auto_reset(self, auto_reset: bool) -> Self {
        Self { auto_reset, ..self }
    }

    pub fn episode_length(&self) -> TimeDelta {
        self.episode_length
    }

    pub fn battery_charge_loss(&self) -> f64 {
        self.battery_charge_loss
    }

    pub fn hydrogen_charge_loss(&self) -> f64 {
        self.hydrogen_charge_loss
    }

    pub fn grid_tariff(&self) -> f64 {
        self.grid_tariff
    }

    pub fn peak_grid_tariff(&self) -> f64 {
        self.peak_grid_tariff
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn auto_reset(&self) -> bool {
        self.auto_reset
    }

    pub fn validate(&self) -> MicrogridResult<()> {
        fn invalid(msg: String) -> MicrogridResult<()> {
            Err(EnvError::InvalidConfig(msg).into())
        }

        let len = self.episode_length;
        if len <= TimeDelta::zero() {
            return invalid(format!("episode length must be positive, got {len}"));
        }
        if len.num_seconds() % TIME_RESOLUTION.num_seconds() != 0 || len.subsec_nanos() != 0 {
            return invalid(format!("episode length must be whole hours, got {len}"));
        }

        for (name, loss) in [
            ("battery_charge_loss", self.battery_charge_loss),
            ("hydrogen_charge_loss", self.hydrogen_charge_loss),
        ] {
            if !(loss > 0.0 && loss <= 1.0) {
                return invalid(format!("{name} must lie in (0, 1], got {loss}"));
            }
        }

        for (name, tariff) in [
            ("grid_tariff", self.grid_tariff),
            ("peak_grid_tariff", self.peak_grid_tariff),
        ] {
            if !(tariff >= 0.0 && tariff.is_finite()) {
                return invalid(format!("{name} must be a non-negative number, got {tariff}"));
            }
        }

        Ok(())
    }

    /// Parses a JSON config. Missing keys fall back to their defaults.
    pub fn from_json_str(json: &str) -> MicrogridResult<Self> {
        let cfg: Self = serde_json::from_str(json).map_err(IoError::Json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> MicrogridResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(IoError::Io)?;
        Self::from_json_str(&raw)
    }

    pub fn to_json_string(&self) -> MicrogridResult<String> {
        Ok(serde_json::to_string_pretty(self).map_err(IoError::Json)?)
    }
}
