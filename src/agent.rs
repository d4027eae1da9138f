use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{error::MicrogridResult, gym::microgrid::state::Observation};

/// Identifies an agent in logs and reports.
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    Default,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentIdentifier {
    /// A custom user-defined agent.
    #[strum(to_string = "{0}")]
    Named(Arc<String>),

    #[default]
    Unnamed,
}

pub trait Agent {
    /// Decides on a raw `[charge_battery, charge_hydrogen]` action for `obs`.
    ///
    /// The action does not have to lie inside the action space; the
    /// environment saturates it.
    fn act(&mut self, obs: &Observation) -> MicrogridResult<Vec<f64>>;

    /// Optional agent name for logging/debugging.
    fn identifier(&self) -> AgentIdentifier {
        AgentIdentifier::Unnamed
    }

    /// Reset internal state before an episode. Default is no-op.
    fn reset(&mut self) {}
}

impl Agent for Box<dyn Agent> {
    fn act(&mut self, obs: &Observation) -> MicrogridResult<Vec<f64>> {
        (**self).act(obs)
    }

    fn identifier(&self) -> AgentIdentifier {
        (**self).identifier()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Idle;

    impl Agent for Idle {
        fn act(&mut self, _obs: &Observation) -> MicrogridResult<Vec<f64>> {
            Ok(vec![0.0, 0.0])
        }
    }

    #[test]
    fn default_identifier_is_unnamed() {
        assert_eq!(Idle.identifier(), AgentIdentifier::Unnamed);
        assert_eq!(AgentIdentifier::Unnamed.to_string(), "UNNAMED");
    }

    #[test]
    fn named_identifier_displays_its_name() {
        let id = AgentIdentifier::Named(Arc::new("peak-shaver".to_string()));
        assert_eq!(id.to_string(), "peak-shaver");
    }

    #[test]
    fn boxed_agent_delegates() {
        let mut agent: Box<dyn Agent> = Box::new(Idle);
        assert_eq!(agent.act(&[0.0; 8]).unwrap(), vec![0.0, 0.0]);
        assert_eq!(agent.identifier(), AgentIdentifier::Unnamed);
    }
}
