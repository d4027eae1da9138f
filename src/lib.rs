//! Discrete-time microgrid energy-balance simulator with a Gym-like `reset`/`step` API.
//!
//! A battery and a hydrogen store are charged or discharged once per hour against
//! measured consumption, wind and photovoltaic production. Every step costs the
//! spot price plus a flat tariff on the energy imported from the external grid;
//! the episode's highest hourly import is charged once at the end.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use microgrid_gym::prelude::*;
//!
//! # fn main() -> MicrogridResult<()> {
//! let data = Arc::new(MeasuredSeries::from_csv("data/microgrid.csv")?);
//! let mut env = Environment::new(data, EnvConfig::default().with_seed(42))?;
//!
//! let (mut obs, _, mut outcome) = env.reset(ResetOptions::default())?;
//! while !outcome.is_terminal() {
//!     let action = [0.0, 0.0];
//!     let (next, _, next_outcome, _) = env.step(&action)?;
//!     obs = next;
//!     outcome = next_outcome;
//! }
//! # let _ = obs;
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod data;
pub mod error;
pub mod gym;
pub mod macros;
pub mod prelude;
pub mod report;
