use std::{env, path::Path, sync::Arc, time::Instant};

use anyhow::{Context, Result};
use chrono::{TimeDelta, TimeZone, Utc};
use microgrid_gym::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Runs one episode with uniformly sampled actions and writes its journal.
///
/// Usage: `cargo run --example evaluate [path/to/data.csv]`. Without a path a
/// synthetic 60-day series is used.
fn main() -> Result<()> {
    init_tracing();

    let data = match env::args().nth(1) {
        Some(path) => MeasuredSeries::from_csv(path)?,
        None => synthetic_series()?,
    };

    let cfg = EnvConfig::default().with_seed(42);
    let mut env = Environment::new(Arc::new(data), cfg)?;
    let mut agent = RandomAgent {
        space: env.action_space(),
        rng: StdRng::seed_from_u64(7),
    };

    let start = Instant::now();
    let journal = env.evaluate_agent(&mut agent, ResetOptions::default())?;
    let elapsed = start.elapsed();

    println!("{}", env.render("human")?);
    println!("Steps:             {}", journal.len());
    println!("Cumulative reward: {:.2} NOK", journal.cumulative_reward().0);
    println!("Run time:          {elapsed:?}");

    journal.to_csv(Path::new("demos/reports"))?;
    Ok(())
}

// ================================================================================================
// Agent
// ================================================================================================

struct RandomAgent {
    space: ActionSpace,
    rng: StdRng,
}

impl Agent for RandomAgent {
    fn act(&mut self, _obs: &Observation) -> MicrogridResult<Vec<f64>> {
        Ok(self.space.sample(&mut self.rng).to_vector().to_vec())
    }

    fn identifier(&self) -> AgentIdentifier {
        AgentIdentifier::Named(Arc::new("random".to_string()))
    }
}

// ================================================================================================
// Tracing Configuration
// ================================================================================================

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
    info!("Logging to stdout");
}

// ================================================================================================
// Helper Functions
// ================================================================================================

/// Daily load and solar cycles with a steady wind baseline.
fn synthetic_series() -> Result<MeasuredSeries> {
    let start = Utc
        .with_ymd_and_hms(2020, 10, 1, 0, 0, 0)
        .single()
        .context("Invalid synthetic start time")?;
    let rows = (0..24 * 60).map(|h| {
        let hour_of_day = (h % 24) as f64;
        let phase = (hour_of_day - 6.0) / 24.0 * std::f64::consts::TAU;
        (
            start + TimeDelta::hours(h),
            Sample {
                consumption: 60.0 + 25.0 * phase.sin().max(0.0),
                wind_production: 20.0 + 10.0 * ((h / 24) % 3) as f64,
                photovoltaic_production: 45.0 * phase.sin().max(0.0),
                spot_market_price: 0.4 + 0.3 * phase.sin(),
            },
        )
    });
    Ok(MeasuredSeries::new(rows)?)
}
