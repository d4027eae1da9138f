use std::sync::Arc;

use polars::{
    frame::DataFrame,
    prelude::{
        Column, DataType, Field, PlSmallStr, Schema, SchemaRef, TimeUnit, TimeZone,
    },
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{
    error::MicrogridResult,
    gym::{Reward, microgrid::context::StepInfo},
    report::io::{Report, ReportName, ToSchema},
};

/// Columns of the episode journal, one row per step.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    PartialOrd,
    Ord,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum JournalCol {
    /// Simulated time after the step.
    Time,
    /// Reward of this step [NOK].
    Reward,
    /// Reward accumulated since the episode started [NOK].
    CumulativeReward,

    // === Realized action ===
    ChargeBattery,
    ChargeHydrogen,

    // === State ===
    Consumption,
    WindProduction,
    PhotovoltaicProduction,
    BatteryStorage,
    HydrogenStorage,
    GridImport,
    GridImportPeak,
    SpotMarketPrice,
}

impl From<JournalCol> for PlSmallStr {
    fn from(value: JournalCol) -> Self {
        value.as_str().into()
    }
}

impl JournalCol {
    pub fn name(&self) -> PlSmallStr {
        (*self).into()
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Numeric value of this column for one step. `None` for [`JournalCol::Time`].
    fn value(&self, info: &StepInfo) -> Option<f64> {
        let s = &info.state;
        let v = match self {
            JournalCol::Time => return None,
            JournalCol::Reward => info.reward.0,
            JournalCol::CumulativeReward => info.cumulative_reward.0,
            JournalCol::ChargeBattery => info.action.charge_battery,
            JournalCol::ChargeHydrogen => info.action.charge_hydrogen,
            JournalCol::Consumption => s.consumption,
            JournalCol::WindProduction => s.wind_production,
            JournalCol::PhotovoltaicProduction => s.photovoltaic_production,
            JournalCol::BatteryStorage => s.battery_storage,
            JournalCol::HydrogenStorage => s.hydrogen_storage,
            JournalCol::GridImport => s.grid_import,
            JournalCol::GridImportPeak => s.grid_import_peak,
            JournalCol::SpotMarketPrice => s.spot_market_price,
        };
        Some(v)
    }
}

/// Step-by-step record of one episode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    steps: Vec<StepInfo>,
}

impl Journal {
    pub fn record(&mut self, info: &StepInfo) {
        self.steps.push(*info);
    }

    pub fn steps(&self) -> &[StepInfo] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Cumulative reward after the last recorded step, zero if nothing was recorded.
    pub fn cumulative_reward(&self) -> Reward {
        self.steps
            .last()
            .map(|s| s.cumulative_reward)
            .unwrap_or_default()
    }

    fn column(&self, col: JournalCol) -> MicrogridResult<Column> {
        if col == JournalCol::Time {
            let millis: Vec<i64> = self
                .steps
                .iter()
                .map(|s| s.time.timestamp_millis())
                .collect();
            return Ok(Column::new(col.name(), millis).cast(&time_dtype())?);
        }
        let values: Vec<f64> = self.steps.iter().filter_map(|s| col.value(s)).collect();
        Ok(Column::new(col.name(), values))
    }
}

impl From<Vec<StepInfo>> for Journal {
    fn from(steps: Vec<StepInfo>) -> Self {
        Self { steps }
    }
}

impl ReportName for Journal {
    fn base_name(&self) -> String {
        "episode_journal".to_string()
    }
}

impl Report for Journal {
    fn as_df(&self) -> MicrogridResult<DataFrame> {
        let columns = JournalCol::iter()
            .map(|col| self.column(col))
            .collect::<MicrogridResult<Vec<_>>>()?;
        Ok(DataFrame::new(columns)?)
    }
}

impl ToSchema for Journal {
    fn to_schema() -> SchemaRef {
        let fields: Vec<Field> = JournalCol::iter()
            .map(|col| {
                let dtype = match col {
                    JournalCol::Time => time_dtype(),
                    _ => DataType::Float64,
                };
                Field::new(col.into(), dtype)
            })
            .collect();

        Arc::new(Schema::from_iter(fields))
    }
}

fn time_dtype() -> DataType {
    DataType::Datetime(TimeUnit::Milliseconds, Some(TimeZone::UTC))
}

#[cfg(test)]
mod test {
    use chrono::{DateTime, TimeZone as _, Utc};

    use super::*;
    use crate::{
        gym::microgrid::{action::Action, state::State},
        report::io::ToCsv,
    };

    fn t(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, hour, 0, 0).unwrap()
    }

    fn info(hour: u32, reward: f64, cumulative: f64) -> StepInfo {
        StepInfo {
            action: Action::new(10.0, -5.0),
            state: State {
                grid_import: reward,
                ..State::default()
            },
            time: t(hour),
            reward: Reward(reward),
            cumulative_reward: Reward(cumulative),
        }
    }

    fn journal() -> Journal {
        let mut j = Journal::default();
        j.record(&info(13, 2.0, 2.0));
        j.record(&info(14, 3.0, 5.0));
        j
    }

    #[test]
    fn cumulative_reward_is_last_row() {
        assert_eq!(journal().cumulative_reward(), Reward(5.0));
        assert_eq!(Journal::default().cumulative_reward(), Reward(0.0));
    }

    #[test]
    fn data_frame_matches_schema() {
        let df = journal().as_df().unwrap();
        assert_eq!(df.height(), 2);

        let schema = df.schema();
        for (name, dtype) in Journal::to_schema().iter() {
            assert_eq!(schema.get(name), Some(dtype), "column {name}");
        }

        let rewards: Vec<Option<f64>> = df
            .column(JournalCol::Reward.as_str())
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(rewards, vec![Some(2.0), Some(3.0)]);
    }

    #[test]
    fn empty_journal_has_all_columns() {
        let df = Journal::default().as_df().unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), JournalCol::iter().count());
    }

    #[test]
    fn writes_csv_with_header() {
        let dir =
            std::env::temp_dir().join(format!("microgrid-journal-writes-csv-{}", std::process::id()));
        journal().to_csv(&dir).unwrap();

        let csv = std::fs::read_to_string(dir.join("episode_journal.csv")).unwrap();
        let header = csv.lines().next().unwrap();
        assert!(header.starts_with("time,reward,cumulative_reward,charge_battery"));
        assert_eq!(csv.lines().count(), 3);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
