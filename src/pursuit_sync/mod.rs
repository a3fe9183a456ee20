//! Synchronisation between Bevy ECS and the pursuit coordinator.
//!
//! [`PursuitPlugin`] owns a [`PursuitSession`] resource. Each frame it
//! registers newly spawned [`Pursuer`] entities, refreshes the visible area
//! from the [`PursuitCamera`], feeds buffered [`ContactReport`]s and the
//! [`Quarry`] snapshot to the coordinator, and writes positions and
//! [`PursuitStatus`] back. Coordinator notifications come out as
//! [`PursuitSignal`] and [`PursuitGameOver`] observer events.

mod components;
mod contact_inbox;
mod plugin;
mod session;
mod systems;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use components::{CaughtBy, Pursuer, PursuerHandle, PursuitCamera, PursuitStatus, Quarry};
pub use contact_inbox::{ContactInbox, ContactPhase, ContactReport};
pub use plugin::{PursuitGameOver, PursuitPlugin, PursuitSignal, PursuitSignalKind, ResetPursuit};
pub use session::{PursuerQueries, PursuitSession, PursuitViewport};
pub use systems::{
    apply_pursuit_outputs_system, register_pursuers_system, step_pursuit_system, target_id,
    update_viewport_system,
};
