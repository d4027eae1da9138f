use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, info, warn};

use crate::{
    agent::Agent,
    data::{
        TIME_RESOLUTION, TimeSeriesSource, hour_floor,
        episode::{Episode, EpisodeBuilder},
        series::MeasuredSeries,
    },
    error::{EnvError, MicrogridResult},
    gym::{
        EnvStatus, Reward, StepOutcome,
        microgrid::{
            Env,
            action::Action,
            config::EnvConfig,
            context::{EpisodeContext, ResetOptions, StepInfo, Transition},
            dynamics::Dynamics,
            render::RenderMode,
            space::{ActionSpace, ObservationSpace},
            state::{Observation, State},
        },
    },
    report::journal::Journal,
};

/// Microgrid energy-balance environment over a shared, read-only time series.
///
/// The environment itself only holds construction-time data (spaces, tariffs,
/// the start-time sampler) plus the [`EpisodeContext`] of the running episode.
/// The transition logic lives in [`Environment::begin_episode`] and
/// [`Environment::transition`], which never mutate `self`.
#[derive(Debug)]
pub struct Environment<S: TimeSeriesSource + ?Sized = MeasuredSeries> {
    data: Arc<S>,
    config: EnvConfig,
    dynamics: Dynamics,
    action_space: ActionSpace,
    observation_space: ObservationSpace,
    rng: StdRng,
    ctx: Option<EpisodeContext>,
    env_status: EnvStatus,
}

impl<S: TimeSeriesSource + ?Sized> Environment<S> {
    pub fn observation_space(&self) -> ObservationSpace {
        self.observation_space
    }

    pub fn action_space(&self) -> ActionSpace {
        self.action_space
    }

    pub fn status(&self) -> EnvStatus {
        self.env_status
    }

    /// Context of the current (or just finished) episode. `None` before the first `reset()`.
    pub fn context(&self) -> Option<&EpisodeContext> {
        self.ctx.as_ref()
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn data(&self) -> &Arc<S> {
        &self.data
    }

    /// `[earliest, latest]` start hours that leave a full episode of data.
    pub fn admissible_start_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let earliest = self.data.first_timestamp();
        let latest = self.data.last_timestamp() - self.config.episode_length();
        (earliest, latest)
    }

    /// Builds the initial context of an episode starting at `start`.
    ///
    /// `start` is truncated to the hour and must lie in
    /// [`admissible_start_range`](Self::admissible_start_range). Storage levels
    /// and grid import come from `opts` (zero when unset); `opts.start_time` is
    /// not consulted. The initial state is clipped into the observation space.
    pub fn begin_episode(
        &self,
        start: DateTime<Utc>,
        opts: &ResetOptions,
    ) -> MicrogridResult<EpisodeContext> {
        let episode = EpisodeBuilder::new()
            .with_length(self.config.episode_length())
            .with_start(self.checked_start(start)?)
            .build()?;
        self.open(episode, opts)
    }

    /// Applies one raw action to `ctx` and returns the next context.
    ///
    /// Fails with [`DataError::Shape`](crate::error::DataError::Shape) if
    /// `action` does not hold two elements and with [`EnvError::InvalidState`]
    /// if `ctx` has already reached its episode end.
    pub fn transition(&self, ctx: &EpisodeContext, action: &[f64]) -> MicrogridResult<Transition> {
        if ctx.is_terminal() {
            return Err(EnvError::InvalidState(
                "Episode is done. Begin a new episode before stepping.".to_string(),
            )
            .into());
        }
        let raw = Action::from_vector(action)?;

        let time = ctx.time + TIME_RESOLUTION;
        let requested = self.action_space.clip(&raw);
        if requested != raw {
            warn!(%raw, %requested, "Action saturated at action-space bounds");
        }

        let sample = self.data.sample(time)?;
        let update = self.dynamics.charge(&ctx.state, &requested);
        if update.saturated {
            warn!(
                battery_storage = update.battery_storage,
                hydrogen_storage = update.hydrogen_storage,
                realized = %update.realized,
                "Storage saturated at capacity bound"
            );
        }

        let grid_import = self.dynamics.grid_import(&sample, &update.realized);
        let grid_import_peak = ctx.state.grid_import_peak.max(grid_import);
        // Not clipped into the observation space.
        let state = State::from_parts(
            &sample,
            update.battery_storage,
            update.hydrogen_storage,
            grid_import,
            grid_import_peak,
        );

        let done = ctx.episode.is_episode_end(time);
        let reward = self.dynamics.reward(&state, done);
        let cumulative_reward = ctx.cumulative_reward + reward;
        let outcome = if done {
            StepOutcome::Truncated
        } else {
            StepOutcome::InProgress
        };

        debug!(
            %time,
            %requested,
            realized = %update.realized,
            grid_import,
            reward = reward.0,
            "Transition"
        );

        Ok(Transition {
            context: EpisodeContext {
                episode: ctx.episode,
                time,
                state,
                cumulative_reward,
                steps: ctx.steps + 1,
            },
            reward,
            outcome,
            info: StepInfo {
                action: update.realized,
                state,
                time,
                reward,
                cumulative_reward,
            },
        })
    }

    /// One-line text summary of the current episode. Only `"human"` is supported.
    pub fn render(&self, mode: &str) -> MicrogridResult<String> {
        let mode = RenderMode::parse(mode)?;
        let ctx = self.ctx.as_ref().ok_or_else(|| {
            EnvError::InvalidState(
                "Environment is not started. Call `reset()` before rendering.".to_string(),
            )
        })?;
        Ok(mode.render(ctx))
    }

    /// Runs one episode from `reset(opts)` to its terminal step and records every step.
    #[tracing::instrument(skip_all)]
    pub fn evaluate_agent<T: Agent>(
        &mut self,
        agent: &mut T,
        opts: ResetOptions,
    ) -> MicrogridResult<Journal> {
        agent.reset();
        let (mut obs, _, mut outcome) = self.reset(opts)?;
        let mut journal = Journal::default();

        while !outcome.is_terminal() {
            let action = agent.act(&obs)?;
            let (next_obs, _, next_outcome, info) = self.step(&action)?;
            journal.record(&info);
            obs = next_obs;
            outcome = next_outcome;
        }

        info!(
            agent = %agent.identifier(),
            steps = journal.len(),
            cumulative_reward = journal.cumulative_reward().0,
            "Agent evaluation finished"
        );
        Ok(journal)
    }
}

impl<S: TimeSeriesSource + ?Sized> Env for Environment<S> {
    #[tracing::instrument(skip(self))]
    fn reset(&mut self, opts: ResetOptions) -> MicrogridResult<(Observation, Reward, StepOutcome)> {
        let ctx = self.restart(&opts)?;
        self.env_status = EnvStatus::Running;
        Ok((ctx.state.to_vector(), Reward(0.0), StepOutcome::InProgress))
    }

    #[tracing::instrument(skip(self))]
    fn step(
        &mut self,
        action: &[f64],
    ) -> MicrogridResult<(Observation, Reward, StepOutcome, StepInfo)> {
        self.check_step_status()?;
        let ctx = self.ctx.as_ref().ok_or_else(|| {
            EnvError::InvalidState("Running environment has no episode context.".to_string())
        })?;

        let Transition {
            context,
            reward,
            outcome,
            info,
        } = self.transition(ctx, action)?;
        self.ctx = Some(context);
        self.update_env_status(outcome);

        Ok((context.state.to_vector(), reward, outcome, info))
    }
}

impl<S: TimeSeriesSource + ?Sized> Environment<S> {
    fn restart(&mut self, opts: &ResetOptions) -> MicrogridResult<EpisodeContext> {
        let start = match opts.start_time {
            Some(ts) => self.checked_start(ts)?,
            None => self.random_start(),
        };

        let episode = match self.ctx {
            Some(prev) => prev.episode.next(start),
            None => EpisodeBuilder::new()
                .with_length(self.config.episode_length())
                .with_start(start)
                .build()?,
        };
        let ctx = self.open(episode, opts)?;

        info!(
            episode_id = %episode.id().0,
            start_time = %episode.start(),
            end_time = %episode.end(),
            "Episode Starting"
        );
        self.ctx = Some(ctx);
        Ok(ctx)
    }

    fn open(&self, episode: Episode, opts: &ResetOptions) -> MicrogridResult<EpisodeContext> {
        let sample = self.data.sample(episode.start())?;
        let grid_import = opts.grid_import.unwrap_or(0.0);
        let state = State::from_parts(
            &sample,
            opts.battery_storage.unwrap_or(0.0),
            opts.hydrogen_storage.unwrap_or(0.0),
            grid_import,
            grid_import,
        );

        Ok(EpisodeContext {
            episode,
            time: episode.start(),
            state: self.observation_space.clip(&state),
            cumulative_reward: Reward(0.0),
            steps: 0,
        })
    }

    fn checked_start(&self, start: DateTime<Utc>) -> MicrogridResult<DateTime<Utc>> {
        let start = hour_floor(start)?;
        let (earliest, latest) = self.admissible_start_range();
        if start < earliest || start > latest {
            return Err(EnvError::StartOutOfRange {
                start,
                earliest,
                latest,
            }
            .into());
        }
        Ok(start)
    }

    fn random_start(&mut self) -> DateTime<Utc> {
        let (earliest, latest) = self.admissible_start_range();
        let hours = (latest - earliest).num_hours();
        earliest + TimeDelta::hours(self.rng.random_range(0..=hours))
    }

    fn check_step_status(&self) -> MicrogridResult<()> {
        use EnvStatus::*;
        match self.env_status {
            Running => Ok(()),
            Ready => Err(EnvError::InvalidState(
                "Environment is not started. Call `reset()` before stepping.".to_string(),
            )
            .into()),
            EpisodeDone => Err(EnvError::InvalidState(
                "Episode is done. Call `reset()` before stepping.".to_string(),
            )
            .into()),
        }
    }

    /// Marks the episode done on a terminal step and, with `auto_reset`, rolls
    /// over to the next one. A failed roll-over leaves the status at
    /// [`EnvStatus::EpisodeDone`] so the terminal step is still returned.
    fn update_env_status(&mut self, outcome: StepOutcome) {
        if !outcome.is_terminal() {
            return;
        }

        let ctx = self.ctx.as_ref().map(|c| (c.episode.id().0, c.cumulative_reward.0));
        if let Some((episode_id, cumulative_reward)) = ctx {
            info!(episode_id, cumulative_reward, "Episode Done");
        }

        self.env_status = EnvStatus::EpisodeDone;
        if !self.config.auto_reset() {
            return;
        }
        match self.restart(&ResetOptions::default()) {
            Ok(_) => self.env_status = EnvStatus::Running,
            Err(error) => warn!(
                %error,
                "Auto-reset failed; call `reset()` to start the next episode"
            ),
        }
    }
}

// ================================================================================================
// Building
// ================================================================================================
impl<S: TimeSeriesSource + ?Sized> Environment<S> {
    /// Validates `config` and checks that `data` covers at least one episode.
    pub fn new(data: Arc<S>, config: EnvConfig) -> MicrogridResult<Self> {
        config.validate()?;

        let (first, last) = (data.first_timestamp(), data.last_timestamp());
        if last - first < config.episode_length() {
            return Err(EnvError::InvalidConfig(format!(
                "episode length {} exceeds the data span [{first}, {last}]",
                config.episode_length()
            ))
            .into());
        }

        let observation_space = ObservationSpace::microgrid(&data.signal_bounds());
        let rng = match config.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            data,
            dynamics: Dynamics::new(&config, observation_space.storage()),
            config,
            action_space: ActionSpace::microgrid(),
            observation_space,
            rng,
            ctx: None,
            env_status: EnvStatus::Ready,
        })
    }
}
