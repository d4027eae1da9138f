use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    data::episode::Episode,
    gym::{
        Reward, StepOutcome,
        microgrid::{action::Action, state::State},
    },
};

/// Everything that changes while an episode runs, as one immutable value.
///
/// [`Environment::transition`](super::env::Environment::transition) consumes a
/// context and returns the next one, so callers may keep, replay or fork
/// episodes without touching the environment itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeContext {
    pub(crate) episode: Episode,
    pub(crate) time: DateTime<Utc>,
    pub(crate) state: State,
    pub(crate) cumulative_reward: Reward,
    pub(crate) steps: usize,
}

impl EpisodeContext {
    pub fn episode(&self) -> Episode {
        self.episode
    }

    /// Current simulated time.
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn cumulative_reward(&self) -> Reward {
        self.cumulative_reward
    }

    /// Number of steps taken since the episode started.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn is_terminal(&self) -> bool {
        self.episode.is_episode_end(self.time)
    }
}

/// Optional inputs of `reset()`.
///
/// Unset storage levels and grid import default to zero; an unset start
/// time is drawn uniformly from the admissible range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResetOptions {
    pub start_time: Option<DateTime<Utc>>,
    pub battery_storage: Option<f64>,
    pub hydrogen_storage: Option<f64>,
    pub grid_import: Option<f64>,
}

impl ResetOptions {
    pub fn with_start_time(self, start_time: DateTime<Utc>) -> Self {
        Self {
            start_time: Some(start_time),
            ..self
        }
    }

    pub fn with_battery_storage(self, battery_storage: f64) -> Self {
        Self {
            battery_storage: Some(battery_storage),
            ..self
        }
    }

    pub fn with_hydrogen_storage(self, hydrogen_storage: f64) -> Self {
        Self {
            hydrogen_storage: Some(hydrogen_storage),
            ..self
        }
    }

    pub fn with_grid_import(self, grid_import: f64) -> Self {
        Self {
            grid_import: Some(grid_import),
            ..self
        }
    }
}

/// Auxiliary information returned with every step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// The action after saturation and storage-floor back-adjustment.
    pub action: Action,
    pub state: State,
    pub time: DateTime<Utc>,
    pub reward: Reward,
    pub cumulative_reward: Reward,
}

/// Result of applying one action to an [`EpisodeContext`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub context: EpisodeContext,
    pub reward: Reward,
    pub outcome: StepOutcome,
    pub info: StepInfo,
}
