use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
    error::{EnvError, MicrogridResult},
    gym::microgrid::context::EpisodeContext,
};

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
    EnumIter,
    Display,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum RenderMode {
    /// One line of plain text.
    Human,
}

impl RenderMode {
    pub fn parse(mode: &str) -> MicrogridResult<Self> {
        Self::from_str(mode).map_err(|_| EnvError::UnsupportedRenderMode(mode.to_string()).into())
    }

    pub fn render(&self, ctx: &EpisodeContext) -> String {
        match self {
            RenderMode::Human => format!(
                "Time: {} (episode ends {}) | {}",
                ctx.time().format("%Y-%m-%d %H:%M"),
                ctx.episode().end().format("%Y-%m-%d %H:%M"),
                ctx.state()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MicrogridError;

    #[test]
    fn parses_human_mode() {
        assert_eq!(RenderMode::parse("human").unwrap(), RenderMode::Human);
        assert_eq!(RenderMode::Human.to_string(), "human");
    }

    #[test]
    fn other_modes_are_unsupported() {
        for mode in ["rgb_array", "ansi", ""] {
            let err = RenderMode::parse(mode).unwrap_err();
            assert!(matches!(
                err,
                MicrogridError::Env(EnvError::UnsupportedRenderMode(ref m)) if m == mode
            ));
        }
    }
}
