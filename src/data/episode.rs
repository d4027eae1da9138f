use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DurationSeconds, serde_as};

use crate::{
    error::{MicrogridError, MicrogridResult, SystemError},
    impl_add_sub_mul_div_primitive, impl_from_primitive,
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct EpisodeId(pub usize);
impl_from_primitive!(EpisodeId, usize);
impl_add_sub_mul_div_primitive!(EpisodeId, usize);

/// One bounded simulation run over `[start, end)`, with `end = start + length`.
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Episode {
    id: EpisodeId,
    #[serde_as(as = "DurationSeconds<i64>")]
    length: TimeDelta,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Episode {
    /// An episode ends once the simulated clock reaches `end`.
    pub fn is_episode_end(&self, current_ts: DateTime<Utc>) -> bool {
        current_ts >= self.end
    }

    pub fn id(&self) -> EpisodeId {
        self.id
    }

    pub fn length(&self) -> TimeDelta {
        self.length
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

impl Episode {
    pub(crate) fn next(self, start: DateTime<Utc>) -> Episode {
        Self {
            id: self.id + 1,
            length: self.length,
            start,
            end: start + self.length,
        }
    }
}

pub(crate) struct EpisodeBuilder {
    id: EpisodeId,
    length: Option<TimeDelta>,
    start: Option<DateTime<Utc>>,
}

impl EpisodeBuilder {
    pub fn new() -> Self {
        Self {
            id: EpisodeId(0),
            length: None,
            start: None,
        }
    }

    pub(crate) fn with_length(self, length: TimeDelta) -> Self {
        Self {
            length: Some(length),
            ..self
        }
    }

    pub(crate) fn with_start(self, start: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            ..self
        }
    }

    pub(crate) fn build(self) -> MicrogridResult<Episode> {
        let length = self.length.ok_or_else(|| episode_build_err("length"))?;
        let start = self.start.ok_or_else(|| episode_build_err("start"))?;
        Ok(Episode {
            id: self.id,
            length,
            start,
            end: start + length,
        })
    }
}

fn episode_build_err(s: &str) -> MicrogridError {
    MicrogridError::System(SystemError::MissingField(format!(
        "Field `{s}` is required to build `Episode`"
    )))
}
