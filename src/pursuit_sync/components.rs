//! ECS components mirroring the pursuit core.
//! Spawn descriptors, the pursued marker, camera geometry, and the read-only
//! status written back every frame.

use bevy::prelude::*;
use serde::Serialize;

use crate::config::PursuerConfig;
use crate::pursuit::{PursuerId, PursuitState};

/// Spawns a pursuer. The plugin registers it with the coordinator on the
/// frame it appears and removes it when the component goes away.
#[derive(Component, Debug, Clone, Default)]
#[require(Transform, PursuitStatus)]
pub struct Pursuer {
    /// Tuning handed to the state machine at registration.
    pub config: PursuerConfig,
}

impl Pursuer {
    /// Creates a spawn descriptor from `config`.
    #[must_use]
    pub const fn new(config: PursuerConfig) -> Self {
        Self { config }
    }
}

/// Coordinator identity assigned to a registered pursuer entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PursuerHandle(pub PursuerId);

/// Marks the entity being pursued. At most one should exist.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[require(Transform)]
pub struct Quarry {
    /// Dead quarry cannot trigger pursuers and ends any chase in progress.
    pub alive: bool,
}

impl Default for Quarry {
    fn default() -> Self {
        Self { alive: true }
    }
}

/// Camera whose view bounds the pursuit boundaries.
///
/// The visible area is the rectangle of `half_extents` around the camera's
/// translation.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize)]
#[require(Transform)]
pub struct PursuitCamera {
    /// Half the visible width and height in world units.
    pub half_extents: Vec2,
}

/// Per-frame mirror of a pursuer's machine.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PursuitStatus {
    /// Current phase.
    pub state: PursuitState,
    /// Seconds on the chase clock.
    pub chase_timer: f32,
    /// Seconds of dormancy remaining.
    pub cooldown_timer: f32,
}

/// Inserted on the quarry by the pursuer entity that caught it.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaughtBy(pub Entity);
