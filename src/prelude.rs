// 1. Traits
pub use crate::agent::Agent;
pub use crate::data::TimeSeriesSource;
pub use crate::gym::microgrid::Env;
pub use crate::gym::microgrid::space::Clip;
pub use crate::report::io::{Report, ReportName, ToCsv, ToSchema};

// 2. The Core "Loop" Types
pub use crate::gym::microgrid::{
    action::{Action, ActionVector},
    config::EnvConfig,
    context::{EpisodeContext, ResetOptions, StepInfo, Transition},
    env::Environment,
    render::RenderMode,
    space::{ActionSpace, Bounds, ObservationSpace},
    state::{Observation, State},
};
pub use crate::gym::{EnvStatus, Reward, StepOutcome};

// 3. Data
pub use crate::data::episode::{Episode, EpisodeId};
pub use crate::data::series::MeasuredSeries;
pub use crate::data::{Sample, SignalBounds};

// 4. Reports
pub use crate::agent::AgentIdentifier;
pub use crate::report::journal::{Journal, JournalCol};

// 5. Errors
pub use crate::error::{
    DataError, EnvError, IoError, MicrogridError, MicrogridResult, SystemError,
};
