use crate::{
    data::Sample,
    gym::{
        Reward,
        microgrid::{action::Action, config::EnvConfig, space::StorageBounds, state::State},
    },
};

/// Storage levels after one step together with the action that was actually delivered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorageUpdate {
    pub battery_storage: f64,
    pub hydrogen_storage: f64,
    pub realized: Action,
    /// At least one storage hit a capacity bound.
    pub saturated: bool,
}

/// Physics and tariff model of the microgrid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dynamics {
    battery_charge_loss: f64,
    hydrogen_charge_loss: f64,
    grid_tariff: f64,
    peak_grid_tariff: f64,
    storage: StorageBounds,
}

impl Dynamics {
    pub fn new(cfg: &EnvConfig, storage: StorageBounds) -> Self {
        Self {
            battery_charge_loss: cfg.battery_charge_loss(),
            hydrogen_charge_loss: cfg.hydrogen_charge_loss(),
            grid_tariff: cfg.grid_tariff(),
            peak_grid_tariff: cfg.peak_grid_tariff(),
            storage,
        }
    }

    /// Power that reaches each storage.
    ///
    /// Charging loses a fraction of the requested power, discharging does not.
    /// Each storage is guarded by the sign of its own request.
    pub fn stored_power(&self, requested: &Action) -> Action {
        let lossy = |rate: f64, loss: f64| if rate > 0.0 { rate * loss } else { rate };
        Action {
            charge_battery: lossy(requested.charge_battery, self.battery_charge_loss),
            charge_hydrogen: lossy(requested.charge_hydrogen, self.hydrogen_charge_loss),
        }
    }

    /// Applies `requested` (already inside the action space) to the storages of `state`.
    ///
    /// Levels are clamped to capacity. A discharge that would drain a storage
    /// below its floor is realized only down to the floor; a charge that hits
    /// the ceiling is still reported as requested.
    pub fn charge(&self, state: &State, requested: &Action) -> StorageUpdate {
        let stored = self.stored_power(requested);

        let battery_candidate = state.battery_storage + stored.charge_battery;
        let hydrogen_candidate = state.hydrogen_storage + stored.charge_hydrogen;
        let battery_storage = clamp(battery_candidate, self.storage.battery);
        let hydrogen_storage = clamp(hydrogen_candidate, self.storage.hydrogen);

        // Only a discharge held at the floor is back-adjusted.
        let realize = |requested: f64, old: f64, level: f64, candidate: f64| {
            if requested < 0.0 && level != candidate {
                (level - old).max(requested)
            } else {
                requested
            }
        };
        let realized = Action {
            charge_battery: realize(
                requested.charge_battery,
                state.battery_storage,
                battery_storage,
                battery_candidate,
            ),
            charge_hydrogen: realize(
                requested.charge_hydrogen,
                state.hydrogen_storage,
                hydrogen_storage,
                hydrogen_candidate,
            ),
        };

        StorageUpdate {
            battery_storage,
            hydrogen_storage,
            realized,
            saturated: battery_storage != battery_candidate
                || hydrogen_storage != hydrogen_candidate,
        }
    }

    /// Shortfall drawn from the external grid. Surplus export is not modeled.
    pub fn grid_import(&self, sample: &Sample, realized: &Action) -> f64 {
        let net_power = sample.wind_production + sample.photovoltaic_production
            - realized.charge_hydrogen
            - realized.charge_battery;
        (sample.consumption - net_power).max(0.0)
    }

    /// Energy cost of this step, plus the peak-demand charge on the terminal step.
    pub fn reward(&self, state: &State, terminal: bool) -> Reward {
        let energy = (state.spot_market_price + self.grid_tariff) * state.grid_import;
        let peak = if terminal {
            self.peak_grid_tariff * state.grid_import_peak
        } else {
            0.0
        };
        Reward(energy + peak)
    }
}

fn clamp(v: f64, (low, high): (f64, f64)) -> f64 {
    v.max(low).min(high)
}
