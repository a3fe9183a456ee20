//! Pure pursuit core: per-pursuer state machines and their coordinator.
//!
//! Nothing here depends on Bevy. The [`crate::pursuit_sync`] module mirrors
//! this core into the ECS; the headless simulator drives it directly.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod collaborators;
pub mod contact;
pub mod coordinator;
pub mod error;
pub mod machine;
pub mod state;

pub use collaborators::{
    Collaborators, PursuitListener, PursuitTarget, SilentListener, TargetView, ViewportSource,
};
pub use contact::{ContactDetector, ContactEvent, ContactPolicy, TargetId};
pub use coordinator::PursuitCoordinator;
pub use error::{MissingReference, PursuitError};
pub use machine::{Frame, PursuerSnapshot, PursuitStateMachine};
pub use state::{ContactChannel, PursuitEvent, PursuitState, RetreatReason};

/// Identity assigned to a pursuer when it is registered with a coordinator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct PursuerId(pub u32);

impl fmt::Display for PursuerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
