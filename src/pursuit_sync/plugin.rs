//! Bevy plugin wiring the pursuit coordinator into the schedule.

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use log::info;

use crate::config::CoordinatorConfig;
use crate::pursuit::{ContactChannel, RetreatReason};

use super::components::CaughtBy;
use super::contact_inbox::{buffer_contact_report, ContactInbox};
use super::session::{PursuitSession, PursuitViewport};
use super::systems::{
    apply_pursuit_outputs_system, register_pursuers_system, step_pursuit_system,
    update_viewport_system,
};

/// What happened to a pursuer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PursuitSignalKind {
    /// Left Hidden and is emerging towards `active_position`.
    Triggered {
        /// Emergence destination.
        active_position: Vec2,
    },
    /// Finished emerging and is chasing.
    Chasing,
    /// Gave up and is heading home.
    Retreating {
        /// What ended the chase.
        reason: RetreatReason,
    },
    /// Back at its hidden anchor.
    Hidden,
    /// Completed a cycle without a catch.
    Escaped,
    /// Caught the quarry.
    Caught {
        /// Channel that detected the contact.
        channel: ContactChannel,
    },
}

/// Notification re-emitted for presentation and game-flow observers.
///
/// Raised through Events V2 after each pursuit step, in the order the
/// coordinator produced them.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PursuitSignal {
    /// Pursuer entity the signal concerns.
    pub pursuer: Entity,
    /// What happened.
    pub kind: PursuitSignalKind,
}

/// Raised once, after the post-catch delay has elapsed.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PursuitGameOver;

/// Trigger to return every pursuer to Hidden and reopen the session.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResetPursuit;

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_pursuit_signal(event: On<PursuitSignal>) {
    let PursuitSignal { pursuer, kind } = event.event();
    info!("pursuer entity {pursuer:?}: {kind:?}");
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_game_over(_event: On<PursuitGameOver>) {
    info!("pursuit game over");
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn reset_session(
    _event: On<ResetPursuit>,
    mut commands: Commands,
    mut session: ResMut<PursuitSession>,
    caught: Query<Entity, With<CaughtBy>>,
    mut inbox: ResMut<ContactInbox>,
    mut virtual_time: ResMut<Time<Virtual>>,
) {
    session.coordinator.reset_all();
    if session.time_paused {
        virtual_time.unpause();
        session.time_paused = false;
    }
    inbox.drain().for_each(drop);
    for entity in &caught {
        commands.entity(entity).remove::<CaughtBy>();
    }
}

/// Bevy plugin driving pursuers from ECS state.
///
/// Inserts [`PursuitSession`], [`ContactInbox`] and [`PursuitViewport`], and
/// chains registration, viewport refresh, the pursuit step, and write-back in
/// `Update`. When the coordinator freezes on a catch, virtual time is paused
/// until [`ResetPursuit`].
#[derive(Debug, Clone, Default)]
pub struct PursuitPlugin {
    /// Policy for the session's coordinator.
    pub coordinator: CoordinatorConfig,
}

impl PursuitPlugin {
    /// Plugin running a coordinator with `coordinator` policy.
    #[must_use]
    pub const fn new(coordinator: CoordinatorConfig) -> Self {
        Self { coordinator }
    }
}

impl Plugin for PursuitPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(PursuitSession::new(self.coordinator.clone()));
        app.init_resource::<ContactInbox>();
        app.init_resource::<PursuitViewport>();

        app.add_observer(buffer_contact_report);
        app.add_observer(log_pursuit_signal);
        app.add_observer(log_game_over);
        app.add_observer(reset_session);

        app.add_systems(
            Update,
            (
                register_pursuers_system,
                update_viewport_system,
                step_pursuit_system,
                apply_pursuit_outputs_system,
            )
                .chain(),
        );
    }
}
