use std::sync::Arc;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use microgrid_gym::prelude::*;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 12, 0, 0).unwrap()
}

/// Four hourly rows starting at 2020-01-01 12:00.
pub fn four_hour_series() -> Arc<MeasuredSeries> {
    let consumption = [1.0, 2.0, 1.0, 3.0];
    let production = [1.0, 2.0, 3.0, 4.0];
    let rows = (0..4).map(|i| {
        (
            t0() + TimeDelta::hours(i as i64),
            Sample {
                consumption: consumption[i],
                wind_production: production[i],
                photovoltaic_production: production[i],
                spot_market_price: production[i],
            },
        )
    });
    Arc::new(MeasuredSeries::new(rows).unwrap())
}

pub fn two_hour_env() -> Environment {
    let cfg = EnvConfig::default()
        .with_episode_length(TimeDelta::hours(2))
        .with_seed(1);
    Environment::new(four_hour_series(), cfg).unwrap()
}
