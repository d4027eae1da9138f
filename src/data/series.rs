use chrono::{DateTime, Utc};

use crate::{
    data::{Sample, SignalBounds, TimeSeriesSource, hour_floor},
    error::{DataError, MicrogridResult},
};

/// In-memory hourly series of measured signals.
///
/// Timestamps are kept sorted and unique on the hour grid; lookups are a
/// binary search. Gaps are allowed but looking up a missing hour fails.
#[derive(Debug, Clone)]
pub struct MeasuredSeries {
    timestamps: Box<[DateTime<Utc>]>,
    samples: Box<[Sample]>,
    bounds: SignalBounds,
}

impl MeasuredSeries {
    /// Builds a series from unordered rows.
    ///
    /// Timestamps are truncated to the hour. Fails on empty input or if two
    /// rows fall into the same hour.
    pub fn new(rows: impl IntoIterator<Item = (DateTime<Utc>, Sample)>) -> MicrogridResult<Self> {
        let mut rows = rows
            .into_iter()
            .map(|(ts, sample)| hour_floor(ts).map(|ts| (ts, sample)))
            .collect::<MicrogridResult<Vec<_>>>()?;

        if rows.is_empty() {
            return Err(DataError::EmptySeries.into());
        }
        rows.sort_by_key(|(ts, _)| *ts);

        if let Some(w) = rows.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(DataError::DuplicateSample(w[0].0).into());
        }

        let bounds = signal_bounds(rows.iter().map(|(_, s)| s));
        let (timestamps, samples): (Vec<_>, Vec<_>) = rows.into_iter().unzip();

        tracing::debug!(
            rows = timestamps.len(),
            first = %timestamps[0],
            last = %timestamps[timestamps.len() - 1],
            "Built measured series"
        );

        Ok(Self {
            timestamps: timestamps.into_boxed_slice(),
            samples: samples.into_boxed_slice(),
            bounds,
        })
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, &Sample)> {
        self.timestamps.iter().copied().zip(self.samples.iter())
    }
}

impl TimeSeriesSource for MeasuredSeries {
    fn sample(&self, ts: DateTime<Utc>) -> MicrogridResult<Sample> {
        let hour = hour_floor(ts)?;
        let (first, last) = (self.first_timestamp(), self.last_timestamp());
        if hour < first || hour > last {
            return Err(DataError::TimestampOutOfRange {
                ts: hour,
                first,
                last,
            }
            .into());
        }
        self.timestamps
            .binary_search(&hour)
            .map(|idx| self.samples[idx])
            .map_err(|_| DataError::MissingSample(hour).into())
    }

    fn first_timestamp(&self) -> DateTime<Utc> {
        self.timestamps[0]
    }

    fn last_timestamp(&self) -> DateTime<Utc> {
        self.timestamps[self.timestamps.len() - 1]
    }

    fn signal_bounds(&self) -> SignalBounds {
        self.bounds
    }
}

fn signal_bounds<'a>(samples: impl Iterator<Item = &'a Sample>) -> SignalBounds {
    let widen = |(lo, hi): (f64, f64), v: f64| (lo.min(v), hi.max(v));
    let empty = (f64::INFINITY, f64::NEG_INFINITY);

    samples.fold(
        SignalBounds {
            consumption: empty,
            wind_production: empty,
            photovoltaic_production: empty,
        },
        |acc, s| SignalBounds {
            consumption: widen(acc.consumption, s.consumption),
            wind_production: widen(acc.wind_production, s.wind_production),
            photovoltaic_production: widen(acc.photovoltaic_production, s.photovoltaic_production),
        },
    )
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::error::MicrogridError;

    // ============================================================================================
    // Helper Functions
    // ============================================================================================

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, 12, 0, 0).unwrap()
    }

    fn sample(consumption: f64, production: f64, price: f64) -> Sample {
        Sample {
            consumption,
            wind_production: production,
            photovoltaic_production: production,
            spot_market_price: price,
        }
    }

    fn series() -> MeasuredSeries {
        MeasuredSeries::new([
            (t0() + Duration::hours(2), sample(1.0, 3.0, 3.0)),
            (t0(), sample(1.0, 1.0, 1.0)),
            (t0() + Duration::hours(3), sample(3.0, 4.0, 4.0)),
            (t0() + Duration::hours(1), sample(2.0, 2.0, 2.0)),
        ])
        .unwrap()
    }

    // ============================================================================================
    // Construction
    // ============================================================================================

    #[test]
    fn rows_are_sorted() {
        let s = series();
        assert_eq!(s.len(), 4);
        assert_eq!(s.first_timestamp(), t0());
        assert_eq!(s.last_timestamp(), t0() + Duration::hours(3));
        let prices: Vec<f64> = s.iter().map(|(_, x)| x.spot_market_price).collect();
        assert_eq!(prices, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn empty_input_fails() {
        let err = MeasuredSeries::new(Vec::new()).unwrap_err();
        assert!(matches!(err, MicrogridError::Data(DataError::EmptySeries)));
    }

    #[test]
    fn duplicate_hour_fails() {
        let err = MeasuredSeries::new([
            (t0(), sample(1.0, 1.0, 1.0)),
            (t0() + Duration::minutes(30), sample(2.0, 2.0, 2.0)),
        ])
        .unwrap_err();
        assert!(matches!(err, MicrogridError::Data(DataError::DuplicateSample(_))));
    }

    #[test]
    fn bounds_track_min_and_max() {
        let bounds = series().signal_bounds();
        assert_eq!(bounds.consumption, (1.0, 3.0));
        assert_eq!(bounds.wind_production, (1.0, 4.0));
        assert_eq!(bounds.photovoltaic_production, (1.0, 4.0));
    }

    // ============================================================================================
    // Lookups
    // ============================================================================================

    #[test]
    fn lookup_truncates_to_the_hour() {
        let s = series();
        let got = s.sample(t0() + Duration::minutes(90)).unwrap();
        assert_eq!(got, sample(2.0, 2.0, 2.0));
    }

    #[test]
    fn lookup_outside_range_fails() {
        let s = series();
        for ts in [t0() - Duration::hours(1), t0() + Duration::hours(4)] {
            let err = s.sample(ts).unwrap_err();
            assert!(matches!(
                err,
                MicrogridError::Data(DataError::TimestampOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn lookup_in_gap_fails() {
        let s = MeasuredSeries::new([
            (t0(), sample(1.0, 1.0, 1.0)),
            (t0() + Duration::hours(2), sample(1.0, 1.0, 1.0)),
        ])
        .unwrap();
        let err = s.sample(t0() + Duration::hours(1)).unwrap_err();
        assert!(matches!(err, MicrogridError::Data(DataError::MissingSample(_))));
    }
}
