use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    data::Sample,
    error::{DataError, MicrogridResult},
    gym::microgrid::space::Clip,
};

/// Observation vector handed to agents.
///
/// Field order is the wire contract with RL tooling:
/// `[consumption, wind_production, photovoltaic_production, battery_storage,
/// hydrogen_storage, grid_import, grid_import_peak, spot_market_price]`.
pub type Observation = [f64; State::DIM];

/// Physical snapshot of the microgrid at one timestep.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct State {
    /// Measured consumption [kWh/h].
    pub consumption: f64,
    /// Wind production [kWh/h].
    pub wind_production: f64,
    /// Photovoltaic production [kWh/h].
    pub photovoltaic_production: f64,
    /// Battery storage level [kWh].
    pub battery_storage: f64,
    /// Hydrogen storage level [kWh].
    pub hydrogen_storage: f64,
    /// Import from the external grid during this step [kWh/h].
    pub grid_import: f64,
    /// Highest `grid_import` seen in the current episode [kWh/h].
    pub grid_import_peak: f64,
    /// Spot market price [NOK/kWh].
    pub spot_market_price: f64,
}

impl State {
    pub const DIM: usize = 8;

    /// Combines exogenous signals with the storage and grid metrics.
    pub fn from_parts(
        sample: &Sample,
        battery_storage: f64,
        hydrogen_storage: f64,
        grid_import: f64,
        grid_import_peak: f64,
    ) -> Self {
        Self {
            consumption: sample.consumption,
            wind_production: sample.wind_production,
            photovoltaic_production: sample.photovoltaic_production,
            battery_storage,
            hydrogen_storage,
            grid_import,
            grid_import_peak,
            spot_market_price: sample.spot_market_price,
        }
    }

    pub fn to_vector(&self) -> Observation {
        [
            self.consumption,
            self.wind_production,
            self.photovoltaic_production,
            self.battery_storage,
            self.hydrogen_storage,
            self.grid_import,
            self.grid_import_peak,
            self.spot_market_price,
        ]
    }

    /// Rebuilds a state from a vector in the documented field order.
    ///
    /// Fails with [`DataError::Shape`] if `v` does not hold exactly
    /// [`State::DIM`] elements.
    pub fn from_vector(v: &[f64]) -> MicrogridResult<Self> {
        let arr: Observation = v.try_into().map_err(|_| DataError::Shape {
            kind: "state",
            expected: Self::DIM,
            actual: v.len(),
        })?;
        Ok(arr.into())
    }
}

impl From<Observation> for State {
    fn from(v: Observation) -> Self {
        let [
            consumption,
            wind_production,
            photovoltaic_production,
            battery_storage,
            hydrogen_storage,
            grid_import,
            grid_import_peak,
            spot_market_price,
        ] = v;
        Self {
            consumption,
            wind_production,
            photovoltaic_production,
            battery_storage,
            hydrogen_storage,
            grid_import,
            grid_import_peak,
            spot_market_price,
        }
    }
}

impl From<State> for Observation {
    fn from(state: State) -> Self {
        state.to_vector()
    }
}

impl Clip for State {
    fn clip(&self, low: &Self, high: &Self) -> Self {
        let (v, lo, hi) = (self.to_vector(), low.to_vector(), high.to_vector());
        State::from(std::array::from_fn(|i| v[i].max(lo[i]).min(hi[i])))
    }

    fn within(&self, low: &Self, high: &Self) -> bool {
        let (v, lo, hi) = (self.to_vector(), low.to_vector(), high.to_vector());
        (0..Self::DIM).all(|i| (lo[i]..=hi[i]).contains(&v[i]))
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "consumption {:.2} kWh/h, wind {:.2} kWh/h, pv {:.2} kWh/h, battery {:.2} kWh, \
             hydrogen {:.2} kWh, import {:.2} kWh/h, peak {:.2} kWh/h, price {:.4} NOK/kWh",
            self.consumption,
            self.wind_production,
            self.photovoltaic_production,
            self.battery_storage,
            self.hydrogen_storage,
            self.grid_import,
            self.grid_import_peak,
            self.spot_market_price,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MicrogridError;

    fn state() -> State {
        State::from([11.0, 6.0, 6.0, 500.0, 1670.0, 1_000_000.0, 100_000.0, 100_000.0])
    }

    #[test]
    fn vector_order_matches_fields() {
        let s = state();
        assert_eq!(s.consumption, 11.0);
        assert_eq!(s.wind_production, 6.0);
        assert_eq!(s.photovoltaic_production, 6.0);
        assert_eq!(s.battery_storage, 500.0);
        assert_eq!(s.hydrogen_storage, 1670.0);
        assert_eq!(s.grid_import, 1_000_000.0);
        assert_eq!(s.grid_import_peak, 100_000.0);
        assert_eq!(s.spot_market_price, 100_000.0);
    }

    #[test]
    fn vector_round_trip() {
        let s = state();
        assert_eq!(State::from_vector(&s.to_vector()).unwrap(), s);
    }

    #[test]
    fn wrong_length_is_a_shape_error() {
        let err = State::from_vector(&[0.0; 7]).unwrap_err();
        assert!(matches!(
            err,
            MicrogridError::Data(DataError::Shape {
                kind: "state",
                expected: 8,
                actual: 7
            })
        ));
    }

    #[test]
    fn from_parts_copies_exogenous_signals() {
        let sample = Sample {
            consumption: 3.0,
            wind_production: 2.0,
            photovoltaic_production: 1.0,
            spot_market_price: 0.7,
        };
        let s = State::from_parts(&sample, 10.0, 20.0, 4.0, 5.0);
        assert_eq!(s.to_vector(), [3.0, 2.0, 1.0, 10.0, 20.0, 4.0, 5.0, 0.7]);
    }

    #[test]
    fn clip_handles_unbounded_fields() {
        let low = State::from([0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, f64::NEG_INFINITY]);
        let high = State::from([
            10.0,
            10.0,
            10.0,
            500.0,
            1670.0,
            f64::INFINITY,
            f64::INFINITY,
            f64::INFINITY,
        ]);
        let clipped = state().clip(&low, &high);
        assert_eq!(
            clipped.to_vector(),
            [10.0, 6.0, 6.0, 500.0, 1670.0, 1_000_000.0, 100_000.0, 100_000.0]
        );
        assert!(clipped.within(&low, &high));
        assert!(!state().within(&low, &high));
    }
}
