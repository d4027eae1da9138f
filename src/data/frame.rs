use std::path::Path;

use chrono::{DateTime, Utc};
use polars::prelude::{CsvReadOptions, DataFrame, DataType, SerReader, TimeUnit};
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::{
    data::{Sample, series::MeasuredSeries},
    error::{DataError, IoError, MicrogridResult},
};

/// Columns expected in a measured-data frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum SeriesCol {
    Time,
    Consumption,
    WindProduction,
    PhotovoltaicProduction,
    SpotMarketPrice,
}

impl SeriesCol {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl MeasuredSeries {
    /// Builds a series from a frame holding the [`SeriesCol`] columns.
    ///
    /// Signal columns are cast to `Float64`; `time` must be castable to a
    /// datetime and is interpreted as UTC.
    pub fn from_data_frame(df: &DataFrame) -> MicrogridResult<Self> {
        for col in SeriesCol::iter() {
            if df.column(col.as_str()).is_err() {
                return Err(DataError::MissingColumn(col.to_string()).into());
            }
        }

        let timestamps = time_column(df)?;
        let consumption = f64_column(df, SeriesCol::Consumption)?;
        let wind = f64_column(df, SeriesCol::WindProduction)?;
        let pv = f64_column(df, SeriesCol::PhotovoltaicProduction)?;
        let price = f64_column(df, SeriesCol::SpotMarketPrice)?;

        let rows = (0..df.height()).map(|i| {
            (
                timestamps[i],
                Sample {
                    consumption: consumption[i],
                    wind_production: wind[i],
                    photovoltaic_production: pv[i],
                    spot_market_price: price[i],
                },
            )
        });
        MeasuredSeries::new(rows)
    }

    /// Reads a CSV file with a header row and the [`SeriesCol`] columns.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_csv(path: impl AsRef<Path>) -> MicrogridResult<Self> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .map_parse_options(|opts| opts.with_try_parse_dates(true))
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))
            .map_err(|e| IoError::ReadFailed(e.to_string()))?
            .finish()
            .map_err(|e| IoError::ReadFailed(e.to_string()))?;

        tracing::info!(rows = df.height(), "Loaded measured data");
        Self::from_data_frame(&df)
    }
}

fn f64_column(df: &DataFrame, col: SeriesCol) -> MicrogridResult<Vec<f64>> {
    let name = col.as_str();
    let casted = df.column(name)?.cast(&DataType::Float64)?;
    casted
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| {
                DataError::NullValue {
                    column: name.to_string(),
                    row,
                }
                .into()
            })
        })
        .collect()
}

fn time_column(df: &DataFrame) -> MicrogridResult<Vec<DateTime<Utc>>> {
    let name = SeriesCol::Time.as_str();
    let millis = df
        .column(name)?
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
        .cast(&DataType::Int64)?;

    millis
        .i64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            let ms = v.ok_or_else(|| DataError::NullValue {
                column: name.to_string(),
                row,
            })?;
            DateTime::<Utc>::from_timestamp_millis(ms).ok_or_else(|| {
                DataError::TimestampConversion(format!("{ms} ms at row {row}")).into()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use polars::prelude::{Column, IntoColumn, NamedFrom, Series};

    use super::*;
    use crate::{data::TimeSeriesSource, error::MicrogridError};

    fn frame(with_price: bool) -> DataFrame {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 12, 0, 0).unwrap();
        let millis: Vec<i64> = (0..4)
            .map(|h| (start + chrono::Duration::hours(h)).timestamp_millis())
            .collect();
        let time = Series::new("time".into(), millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            .unwrap()
            .into_column();

        let mut cols: Vec<Column> = vec![
            time,
            Column::new("consumption".into(), [1i64, 2, 1, 3]),
            Column::new("wind_production".into(), [1.0, 2.0, 3.0, 4.0]),
            Column::new("photovoltaic_production".into(), [1.0, 2.0, 3.0, 4.0]),
        ];
        if with_price {
            cols.push(Column::new("spot_market_price".into(), [1.0, 2.0, 3.0, 4.0]));
        }
        DataFrame::new(cols).unwrap()
    }

    #[test]
    fn builds_series_from_frame() {
        let series = MeasuredSeries::from_data_frame(&frame(true)).unwrap();
        assert_eq!(series.len(), 4);

        let start = Utc.with_ymd_and_hms(2020, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(series.first_timestamp(), start);
        assert_eq!(series.last_timestamp(), start + chrono::Duration::hours(3));

        let s = series.sample(start + chrono::Duration::hours(3)).unwrap();
        assert_eq!(s.consumption, 3.0);
        assert_eq!(s.spot_market_price, 4.0);
    }

    #[test]
    fn missing_column_is_reported() {
        let err = MeasuredSeries::from_data_frame(&frame(false)).unwrap_err();
        assert!(matches!(
            err,
            MicrogridError::Data(DataError::MissingColumn(ref c)) if c == "spot_market_price"
        ));
    }

    #[test]
    fn column_names_are_snake_case() {
        assert_eq!(SeriesCol::PhotovoltaicProduction.as_str(), "photovoltaic_production");
        assert_eq!(SeriesCol::Time.to_string(), "time");
    }
}
