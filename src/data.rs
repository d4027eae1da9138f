use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DataError, MicrogridResult};

pub mod episode;
pub mod frame;
pub mod series;

/// The fixed simulation step.
pub const TIME_RESOLUTION: TimeDelta = TimeDelta::hours(1);

/// Exogenous signals recorded for one hour.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sample {
    /// [kWh/h]
    pub consumption: f64,
    /// [kWh/h]
    pub wind_production: f64,
    /// [kWh/h]
    pub photovoltaic_production: f64,
    /// [NOK/kWh]
    pub spot_market_price: f64,
}

/// Observed `(min, max)` of the signals that bound the observation space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalBounds {
    pub consumption: (f64, f64),
    pub wind_production: (f64, f64),
    pub photovoltaic_production: (f64, f64),
}

/// Read-only, time-indexed source of the exogenous microgrid signals.
///
/// Implementations are owned outside the environment and only ever queried
/// with timestamps on the hour grid.
pub trait TimeSeriesSource {
    /// Returns the signals recorded for the hour containing `ts`.
    ///
    /// Fails with [`DataError::TimestampOutOfRange`] if `ts` is outside
    /// `[first_timestamp, last_timestamp]`.
    fn sample(&self, ts: DateTime<Utc>) -> MicrogridResult<Sample>;

    /// Earliest covered hour.
    fn first_timestamp(&self) -> DateTime<Utc>;

    /// Latest covered hour.
    fn last_timestamp(&self) -> DateTime<Utc>;

    fn signal_bounds(&self) -> SignalBounds;
}

impl<T: TimeSeriesSource + ?Sized> TimeSeriesSource for std::sync::Arc<T> {
    fn sample(&self, ts: DateTime<Utc>) -> MicrogridResult<Sample> {
        (**self).sample(ts)
    }

    fn first_timestamp(&self) -> DateTime<Utc> {
        (**self).first_timestamp()
    }

    fn last_timestamp(&self) -> DateTime<Utc> {
        (**self).last_timestamp()
    }

    fn signal_bounds(&self) -> SignalBounds {
        (**self).signal_bounds()
    }
}

/// Truncates `ts` to the start of its hour.
pub fn hour_floor(ts: DateTime<Utc>) -> MicrogridResult<DateTime<Utc>> {
    ts.duration_trunc(TIME_RESOLUTION)
        .map_err(|e| DataError::TimestampConversion(format!("{ts}: {e}")).into())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn hour_floor_drops_minutes_and_seconds() {
        let ts = Utc.with_ymd_and_hms(2021, 2, 1, 13, 47, 12).unwrap();
        assert_eq!(
            hour_floor(ts).unwrap(),
            Utc.with_ymd_and_hms(2021, 2, 1, 13, 0, 0).unwrap()
        );
    }

    #[test]
    fn hour_floor_keeps_whole_hours() {
        let ts = Utc.with_ymd_and_hms(2020, 10, 1, 0, 0, 0).unwrap();
        assert_eq!(hour_floor(ts).unwrap(), ts);
    }
}
