//! Systems bridging Bevy ECS with the pursuit coordinator.

use bevy::prelude::*;
use log::{debug, warn};

use crate::geometry::VisibleArea;
use crate::pursuit::{
    Collaborators, ContactChannel, PursuerId, PursuitListener, PursuitStateMachine,
    PursuitTarget, RetreatReason, TargetId,
};

use super::components::{CaughtBy, PursuerHandle, PursuitCamera, PursuitStatus, Quarry};
use super::contact_inbox::{ContactInbox, ContactPhase};
use super::plugin::{PursuitGameOver, PursuitSignal, PursuitSignalKind};
use super::session::{PursuerQueries, PursuitSession, PursuitViewport};

/// Identity under which an entity appears in sensor reports.
#[must_use]
pub const fn target_id(entity: Entity) -> TargetId {
    TargetId(entity.to_bits())
}

/// Registers new pursuer entities and drops despawned ones.
pub fn register_pursuers_system(
    mut commands: Commands,
    mut session: ResMut<PursuitSession>,
    mut queries: PursuerQueries,
) {
    for entity in queries.removed.read() {
        let Some(id) = session.unbind(entity) else {
            continue;
        };
        if let Err(error) = session.coordinator.deregister(id) {
            warn!("failed to deregister pursuer entity {entity:?}: {error}");
        }
    }

    for (entity, pursuer, transform) in &queries.added {
        let machine = PursuitStateMachine::new(pursuer.config.clone())
            .with_position(transform.translation.truncate());
        let id = session.coordinator.register(machine);
        session.bind(entity, id);
        commands.entity(entity).try_insert(PursuerHandle(id));
        debug!("pursuer entity {entity:?} registered as {id}");
    }
}

/// Refreshes [`PursuitViewport`] from the first [`PursuitCamera`].
///
/// Leaves the resource untouched when no camera exists, so hosts without a
/// camera entity can write it themselves.
pub fn update_viewport_system(
    cameras: Query<(&PursuitCamera, &Transform)>,
    mut viewport: ResMut<PursuitViewport>,
) {
    let Some((camera, transform)) = cameras.iter().next() else {
        return;
    };
    let area = VisibleArea::from_center(transform.translation.truncate(), camera.half_extents);
    if viewport.0 != Some(area) {
        viewport.0 = Some(area);
    }
}

/// Routes buffered contacts and advances the coordinator by the frame delta.
///
/// Notifications become [`PursuitSignal`] and [`PursuitGameOver`] triggers;
/// a catch inserts [`CaughtBy`] on the quarry. With `freeze_on_catch` set, a
/// catch also pauses [`Time<Virtual>`]; the game-over delay then runs on
/// [`Time<Real>`].
pub fn step_pursuit_system(
    mut commands: Commands,
    mut virtual_time: ResMut<Time<Virtual>>,
    real_time: Res<Time<Real>>,
    mut session: ResMut<PursuitSession>,
    mut inbox: ResMut<ContactInbox>,
    viewport: Res<PursuitViewport>,
    quarries: Query<(Entity, &Transform, &Quarry)>,
) {
    let mut quarry = quarries
        .iter()
        .next()
        .map(|(entity, transform, marker)| QuarryPort {
            entity,
            position: transform.translation.truncate(),
            alive: marker.alive,
            caught_by: None,
        });
    let mut signals = SignalBuffer::default();
    let state = session.as_mut();

    {
        let mut collaborators = Collaborators::new(
            quarry.as_mut().map(|port| port as &mut dyn PursuitTarget),
            &viewport.0,
            &mut signals,
        );
        route_contacts(state, inbox.as_mut(), &mut collaborators);
        let frozen =
            state.coordinator.is_session_over() && state.coordinator.config().freeze_on_catch;
        let dt = if frozen {
            real_time.delta_secs()
        } else {
            virtual_time.delta_secs()
        };
        state.coordinator.tick(dt, &mut collaborators);
    }

    let coordinator = &state.coordinator;
    if coordinator.is_session_over()
        && coordinator.config().freeze_on_catch
        && !virtual_time.is_paused()
    {
        virtual_time.pause();
        state.time_paused = true;
        debug!("virtual time paused by catch");
    }

    if let Some(port) = quarry {
        if let Some(pursuer) = port.caught_by.and_then(|id| state.entity_for(id)) {
            commands.entity(port.entity).try_insert(CaughtBy(pursuer));
        }
    }
    signals.emit(&mut commands, state);
}

/// Writes machine positions and status back onto pursuer entities.
pub fn apply_pursuit_outputs_system(
    session: Res<PursuitSession>,
    mut pursuers: Query<(&PursuerHandle, &mut Transform, &mut PursuitStatus)>,
) {
    for (handle, mut transform, mut status) in &mut pursuers {
        let Some(machine) = session.coordinator.pursuer(handle.0) else {
            continue;
        };
        let position = machine.position();
        transform.translation.x = position.x;
        transform.translation.y = position.y;
        let next = PursuitStatus {
            state: machine.state(),
            chase_timer: machine.chase_timer(),
            cooldown_timer: machine.cooldown_timer(),
        };
        if *status != next {
            *status = next;
        }
    }
}

fn route_contacts(
    session: &mut PursuitSession,
    inbox: &mut ContactInbox,
    collaborators: &mut Collaborators<'_>,
) {
    for report in inbox.drain() {
        let Some(id) = session.id_for(report.pursuer) else {
            warn!("contact report for unregistered pursuer entity {:?}", report.pursuer);
            continue;
        };
        let other = target_id(report.other);
        let routed = match report.phase {
            ContactPhase::Enter => session
                .coordinator
                .report_contact_enter(id, other, collaborators)
                .map(|_event| ()),
            ContactPhase::Exit => session
                .coordinator
                .report_contact_exit(id, other)
                .map(|_cleared| ()),
        };
        if let Err(error) = routed {
            warn!("dropped contact report: {error}");
        }
    }
}

/// ECS view of the quarry handed to the coordinator for one step.
struct QuarryPort {
    entity: Entity,
    position: Vec2,
    alive: bool,
    caught_by: Option<PursuerId>,
}

impl PursuitTarget for QuarryPort {
    fn id(&self) -> TargetId {
        target_id(self.entity)
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn notify_caught(&mut self, by: PursuerId) {
        self.caught_by = Some(by);
    }
}

/// Collects coordinator notifications until the step finishes.
#[derive(Default)]
struct SignalBuffer {
    signals: Vec<(PursuerId, PursuitSignalKind)>,
    game_over: bool,
}

impl SignalBuffer {
    fn emit(self, commands: &mut Commands, session: &PursuitSession) {
        for (id, kind) in self.signals {
            let Some(pursuer) = session.entity_for(id) else {
                continue;
            };
            commands.trigger(PursuitSignal { pursuer, kind });
        }
        if self.game_over {
            commands.trigger(PursuitGameOver);
        }
    }
}

impl PursuitListener for SignalBuffer {
    fn on_triggered(&mut self, pursuer: PursuerId, active_position: Vec2) {
        self.signals
            .push((pursuer, PursuitSignalKind::Triggered { active_position }));
    }

    fn on_chasing(&mut self, pursuer: PursuerId) {
        self.signals.push((pursuer, PursuitSignalKind::Chasing));
    }

    fn on_retreating(&mut self, pursuer: PursuerId, reason: RetreatReason) {
        self.signals
            .push((pursuer, PursuitSignalKind::Retreating { reason }));
    }

    fn on_hidden(&mut self, pursuer: PursuerId) {
        self.signals.push((pursuer, PursuitSignalKind::Hidden));
    }

    fn on_escaped(&mut self, pursuer: PursuerId) {
        self.signals.push((pursuer, PursuitSignalKind::Escaped));
    }

    fn on_caught(&mut self, pursuer: PursuerId, channel: ContactChannel) {
        self.signals
            .push((pursuer, PursuitSignalKind::Caught { channel }));
    }

    fn on_game_over(&mut self) {
        self.game_over = true;
    }
}
