//! Resources holding the coordinator and its entity mapping.

use bevy::ecs::system::SystemParam;
use bevy::prelude::{Added, Entity, Query, RemovedComponents, Resource, Transform};
use hashbrown::HashMap;

use crate::config::CoordinatorConfig;
use crate::geometry::VisibleArea;
use crate::pursuit::{PursuerId, PursuitCoordinator};

use super::components::Pursuer;

/// Resource owning the pursuit coordinator for the running app.
#[derive(Resource, Debug)]
pub struct PursuitSession {
    pub(crate) coordinator: PursuitCoordinator,
    /// Pursuer entity for each coordinator identity.
    pub(crate) entities: HashMap<PursuerId, Entity>,
    /// Coordinator identity for each pursuer entity.
    pub(crate) ids: HashMap<Entity, PursuerId>,
    /// Set while virtual time is paused by a catch.
    pub(crate) time_paused: bool,
}

impl PursuitSession {
    /// Creates a session with no pursuers.
    #[must_use]
    pub fn new(config: CoordinatorConfig) -> Self {
        Self {
            coordinator: PursuitCoordinator::new(config),
            entities: HashMap::new(),
            ids: HashMap::new(),
            time_paused: false,
        }
    }

    /// Read access to the coordinator.
    #[must_use]
    pub const fn coordinator(&self) -> &PursuitCoordinator {
        &self.coordinator
    }

    /// Pursuer entity registered under `id`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use catcher::config::CoordinatorConfig;
    /// use catcher::pursuit::PursuerId;
    /// use catcher::pursuit_sync::PursuitSession;
    /// let session = PursuitSession::new(CoordinatorConfig::default());
    /// assert!(session.entity_for(PursuerId(3)).is_none());
    /// ```
    #[must_use]
    pub fn entity_for(&self, id: PursuerId) -> Option<Entity> {
        self.entities.get(&id).copied()
    }

    /// Coordinator identity of a pursuer entity.
    #[must_use]
    pub fn id_for(&self, entity: Entity) -> Option<PursuerId> {
        self.ids.get(&entity).copied()
    }

    /// Whether a catch has paused virtual time.
    #[must_use]
    pub const fn is_time_paused(&self) -> bool {
        self.time_paused
    }

    pub(crate) fn bind(&mut self, entity: Entity, id: PursuerId) {
        self.entities.insert(id, entity);
        self.ids.insert(entity, id);
    }

    pub(crate) fn unbind(&mut self, entity: Entity) -> Option<PursuerId> {
        let id = self.ids.remove(&entity)?;
        self.entities.remove(&id);
        Some(id)
    }
}

impl Default for PursuitSession {
    fn default() -> Self {
        Self::new(CoordinatorConfig::default())
    }
}

/// Visible area used for boundary checks.
///
/// Refreshed from the [`super::PursuitCamera`] each frame when one exists;
/// otherwise hosts may write it directly. `None` keeps every pursuer inert.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PursuitViewport(pub Option<VisibleArea>);

/// Queries tracking pursuer spawns and despawns.
#[derive(SystemParam)]
pub struct PursuerQueries<'w, 's> {
    /// Pursuers spawned this frame.
    pub added: Query<'w, 's, (Entity, &'static Pursuer, &'static Transform), Added<Pursuer>>,
    /// Entities that lost their [`Pursuer`] component.
    pub removed: RemovedComponents<'w, 's, Pursuer>,
}
