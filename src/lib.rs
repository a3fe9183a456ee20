#![cfg_attr(docsrs, feature(doc_cfg))]
//! Pursuit engine for an antagonist that ambushes the player near the screen
//! edges.
//!
//! Each pursuer is a [`PursuitStateMachine`] bound to one edge of the visible
//! area. It waits Hidden until the target strays within its trigger distance
//! of that edge, rises beside the target, chases it for a bounded time and
//! then either catches it or retreats. A [`PursuitCoordinator`] owns every
//! pursuer of a session; it caps concurrent pursuits, spaces triggers with a
//! global cooldown and turns a catch into a delayed game-over notification.
//!
//! The core in [`pursuit`] is engine-agnostic. [`pursuit_sync`] mirrors it
//! into a Bevy app through [`PursuitPlugin`].
pub mod config;
pub mod constants;
pub mod geometry;
pub mod logging;
pub mod motion;
pub mod pursuit;
pub mod pursuit_sync;
pub mod scenario;

pub use config::{ConfigError, ContactMode, CoordinatorConfig, PursuerConfig, SimulationConfig};
pub use geometry::{BoundaryDirection, VisibleArea};
pub use logging::init as init_logging;
pub use pursuit::{
    Collaborators, ContactDetector, ContactPolicy, PursuerId, PursuitCoordinator, PursuitError,
    PursuitEvent, PursuitListener, PursuitState, PursuitStateMachine, PursuitTarget, TargetId,
};
pub use pursuit_sync::PursuitPlugin;
pub use scenario::{Simulation, SimulationReport};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use catcher::prelude::*;
    //! ```

    pub use crate::config::{CoordinatorConfig, PursuerConfig};
    pub use crate::geometry::{BoundaryDirection, VisibleArea};
    pub use crate::pursuit::{
        Collaborators, PursuerId, PursuitCoordinator, PursuitListener, PursuitState,
        PursuitStateMachine, PursuitTarget, SilentListener, TargetId,
    };
    pub use crate::pursuit_sync::{ContactReport, Pursuer, PursuitCamera, PursuitPlugin, Quarry};
}
