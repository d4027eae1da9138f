use serde::{Deserialize, Serialize};

use crate::{impl_add_sub_mul_div_primitive, impl_from_primitive};

pub mod microgrid;

/// Represents a reward value in NOK.
///
/// Rewards in the microgrid environment are costs: the price paid for energy
/// imported from the external grid plus, at the end of an episode, the
/// peak-demand penalty. A lower cumulative reward is therefore better.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Reward(pub f64);
impl_from_primitive!(Reward, f64);
impl_add_sub_mul_div_primitive!(Reward, f64);

/// Represents the lifecycle status of the microgrid environment.
///
/// # Lifecycle
///
/// The environment follows a finite state machine (FSM) with the following valid transitions. Other transitions return an error.
///
/// ```md
/// Current State                      | Action  | Next State  | Notes
/// -----------------------------------|---------|-------------|-------------------------------------------
/// `Running` (end of episode)         | step()  | EpisodeDone | Episode terminates
/// `Running`                          | step()  | Running     | Continue within episode
/// `Ready` / `Running` / `EpisodeDone`| reset() | Running     | Start a new episode
/// ```
///
/// With `auto_reset` enabled, a terminal `step()` rolls over to a fresh episode
/// and the status stays `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvStatus {
    /// Initial state. The environment is waiting for `reset()` to be called.
    Ready,

    /// An episode is active and the environment is ready for `step()` calls.
    Running,

    /// The active episode has reached its end time.
    ///
    /// A call to `reset()` is required to start the next episode.
    EpisodeDone,
}

impl EnvStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn is_episode_done(&self) -> bool {
        matches!(self, Self::EpisodeDone)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    InProgress,
    /// episode boundary due to time
    Truncated,
}

impl StepOutcome {
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated)
    }

    pub fn is_terminal(&self) -> bool {
        self.is_truncated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reward_arithmetic() {
        let mut total = Reward(1.5) + Reward(2.0);
        total += Reward(0.5);
        assert_eq!(total, Reward(4.0));
        assert_eq!(Reward(3.0) * 2.0, Reward(6.0));
        assert_eq!(Reward(3.0) - Reward(1.0), Reward(2.0));
    }

    #[test]
    fn reward_sum() {
        let total: Reward = [Reward(1.0), Reward(2.0), Reward(3.0)].into_iter().sum();
        assert_eq!(total, Reward(6.0));
    }

    #[test]
    fn only_truncated_is_terminal() {
        assert!(!StepOutcome::InProgress.is_terminal());
        assert!(StepOutcome::Truncated.is_terminal());
    }

    #[test]
    fn status_predicates() {
        assert!(EnvStatus::Ready.is_ready());
        assert!(EnvStatus::Running.is_running());
        assert!(EnvStatus::EpisodeDone.is_episode_done());
    }
}
