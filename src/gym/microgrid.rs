use crate::{
    error::MicrogridResult,
    gym::{
        Reward, StepOutcome,
        microgrid::{context::ResetOptions, context::StepInfo, state::Observation},
    },
};

pub mod action;
pub mod config;
pub mod context;
pub mod dynamics;
pub mod env;
pub mod render;
pub mod space;
pub mod state;

pub trait Env {
    fn reset(&mut self, opts: ResetOptions) -> MicrogridResult<(Observation, Reward, StepOutcome)>;
    fn step(
        &mut self,
        action: &[f64],
    ) -> MicrogridResult<(Observation, Reward, StepOutcome, StepInfo)>;
}
