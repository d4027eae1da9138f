use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    data::SignalBounds,
    gym::microgrid::{action::Action, state::State},
};

/// Battery capacity [kWh].
pub const BATTERY_CAPACITY: f64 = 500.0;
/// Hydrogen storage capacity [kWh].
pub const HYDROGEN_CAPACITY: f64 = 1670.0;

/// Maximum battery charge (positive) and discharge (negative) rate [kW].
pub const BATTERY_RATE_MIN: f64 = -400.0;
pub const BATTERY_RATE_MAX: f64 = 400.0;
/// Maximum hydrogen charge (positive) and discharge (negative) rate [kW].
pub const HYDROGEN_RATE_MIN: f64 = -100.0;
pub const HYDROGEN_RATE_MAX: f64 = 55.0;

/// Element-wise saturation of a fixed-size numeric record.
pub trait Clip: Sized {
    /// Clamps every field into `[low, high]`.
    fn clip(&self, low: &Self, high: &Self) -> Self;

    /// `true` if every field lies in `[low, high]`.
    fn within(&self, low: &Self, high: &Self) -> bool;
}

/// Coordinate-wise `[low, high]` box over a record type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds<T> {
    pub low: T,
    pub high: T,
}

impl<T: Clip> Bounds<T> {
    pub fn new(low: T, high: T) -> Self {
        Self { low, high }
    }

    pub fn clip(&self, value: &T) -> T {
        value.clip(&self.low, &self.high)
    }

    pub fn contains(&self, value: &T) -> bool {
        value.within(&self.low, &self.high)
    }
}

pub type ActionSpace = Bounds<Action>;
pub type ObservationSpace = Bounds<State>;

impl ActionSpace {
    /// The fixed charge/discharge limits of the two storages.
    pub fn microgrid() -> Self {
        Self::new(
            Action::new(BATTERY_RATE_MIN, HYDROGEN_RATE_MIN),
            Action::new(BATTERY_RATE_MAX, HYDROGEN_RATE_MAX),
        )
    }

    /// Draws an action uniformly from the box.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Action {
        Action::new(
            rng.random_range(self.low.charge_battery..=self.high.charge_battery),
            rng.random_range(self.low.charge_hydrogen..=self.high.charge_hydrogen),
        )
    }
}

/// Storage levels only, as the `[min, max]` pair used when clipping a candidate state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorageBounds {
    pub battery: (f64, f64),
    pub hydrogen: (f64, f64),
}

impl ObservationSpace {
    /// Exogenous bounds come from the data, storages from their capacities.
    /// Grid import and its peak are unbounded above; the spot price is unbounded.
    pub fn microgrid(signals: &SignalBounds) -> Self {
        let low = State {
            consumption: signals.consumption.0,
            wind_production: signals.wind_production.0,
            photovoltaic_production: signals.photovoltaic_production.0,
            battery_storage: 0.0,
            hydrogen_storage: 0.0,
            grid_import: 0.0,
            grid_import_peak: 0.0,
            spot_market_price: f64::NEG_INFINITY,
        };
        let high = State {
            consumption: signals.consumption.1,
            wind_production: signals.wind_production.1,
            photovoltaic_production: signals.photovoltaic_production.1,
            battery_storage: BATTERY_CAPACITY,
            hydrogen_storage: HYDROGEN_CAPACITY,
            grid_import: f64::INFINITY,
            grid_import_peak: f64::INFINITY,
            spot_market_price: f64::INFINITY,
        };
        Self::new(low, high)
    }

    pub fn storage(&self) -> StorageBounds {
        StorageBounds {
            battery: (self.low.battery_storage, self.high.battery_storage),
            hydrogen: (self.low.hydrogen_storage, self.high.hydrogen_storage),
        }
    }
}
