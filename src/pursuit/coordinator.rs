//! Session-wide authority over every registered pursuer.
//!
//! The coordinator is the sole writer of the active count and the session
//! flag. Each tick it snapshots the target and the visible area once, then
//! advances every machine in registration order. The trigger gate is
//! re-evaluated immediately before each machine runs, so a trigger earlier
//! in the tick is already visible to later siblings. Notifications are
//! handled synchronously before the next machine is advanced.

use log::{debug, info, warn};

use crate::config::{CoordinatorConfig, PursuerConfig};
use crate::geometry::VisibleArea;

use super::collaborators::Collaborators;
use super::contact::TargetId;
use super::error::PursuitError;
use super::machine::{Frame, PursuerSnapshot, PursuitStateMachine};
use super::state::{PursuitEvent, PursuitState};
use super::PursuerId;

/// Owns the pursuers of one game session.
#[derive(Debug, Clone, Default)]
pub struct PursuitCoordinator {
    config: CoordinatorConfig,
    pursuers: Vec<PursuitStateMachine>,
    next_id: u32,
    active_count: usize,
    clock: f64,
    last_global_trigger: Option<f64>,
    session_over: bool,
    game_over_in: Option<f32>,
    game_over_sent: bool,
}

impl PursuitCoordinator {
    /// Creates an empty coordinator. The configuration is sanitised first.
    #[must_use]
    pub fn new(config: CoordinatorConfig) -> Self {
        Self {
            config: config.sanitized(),
            ..Self::default()
        }
    }

    /// Takes ownership of `machine` and assigns it a fresh identity.
    pub fn register(&mut self, mut machine: PursuitStateMachine) -> PursuerId {
        let id = PursuerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        machine.assign_id(id);
        if machine.state().is_active() {
            self.active_count = self.active_count.saturating_add(1);
        }
        debug!("registered pursuer {id} on {:?} edge", machine.boundary());
        self.pursuers.push(machine);
        id
    }

    /// Builds a Hidden pursuer from `config` and registers it.
    pub fn register_config(&mut self, config: PursuerConfig) -> PursuerId {
        self.register(PursuitStateMachine::new(config))
    }

    /// Removes a pursuer and hands it back.
    ///
    /// # Errors
    /// Returns [`PursuitError::UnknownPursuer`] if `id` is not registered.
    pub fn deregister(&mut self, id: PursuerId) -> Result<PursuitStateMachine, PursuitError> {
        let index = self.index_of(id)?;
        let machine = self.pursuers.remove(index);
        if machine.state().is_active() {
            self.release_slot();
        }
        debug!("deregistered pursuer {id}");
        Ok(machine)
    }

    /// Whether a Hidden pursuer may trigger right now.
    ///
    /// False once the session is over, while the concurrency cap is reached
    /// with multi-pursuer mode off, or within `cooldown_between_pursuers` of
    /// the previous trigger by any pursuer.
    #[must_use]
    pub fn can_trigger_new_pursuer(&self) -> bool {
        if self.session_over {
            return false;
        }
        if !self.config.allow_multiple_pursuers
            && self.active_count >= self.config.max_active_pursuers
        {
            return false;
        }
        self.last_global_trigger
            .is_none_or(|at| self.clock - at >= f64::from(self.config.cooldown_between_pursuers))
    }

    /// Advances the session by `dt` seconds.
    pub fn tick(&mut self, dt: f32, collaborators: &mut Collaborators<'_>) {
        let step = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.clock += f64::from(step);
        self.count_down_game_over(step, collaborators);

        let target = collaborators.target_view();
        let area = collaborators.viewport.visible_area();

        for index in 0..self.pursuers.len() {
            if self.is_frozen() {
                break;
            }
            let frame = Frame {
                dt: step,
                target,
                area,
                may_trigger: self.can_trigger_new_pursuer(),
            };
            let Some(machine) = self.pursuers.get_mut(index) else {
                break;
            };
            let id = machine.id();
            if let Some(event) = machine.update(&frame) {
                self.dispatch(id, event, area, collaborators);
            }
        }
    }

    /// Routes a sensor `enter` report to pursuer `id`.
    ///
    /// # Errors
    /// Returns [`PursuitError::UnknownPursuer`] if `id` is not registered.
    pub fn report_contact_enter(
        &mut self,
        id: PursuerId,
        other: TargetId,
        collaborators: &mut Collaborators<'_>,
    ) -> Result<Option<PursuitEvent>, PursuitError> {
        let index = self.index_of(id)?;
        if self.is_frozen() {
            debug!("pursuer {id}: contact after the session ended ignored");
            return Ok(None);
        }
        let target = collaborators.target_view();
        let event = self
            .pursuers
            .get_mut(index)
            .and_then(|machine| machine.contact_enter(other, target));
        if let Some(caught) = event {
            let area = collaborators.viewport.visible_area();
            self.dispatch(id, caught, area, collaborators);
        }
        Ok(event)
    }

    /// Routes a sensor `exit` report to pursuer `id`.
    ///
    /// # Errors
    /// Returns [`PursuitError::UnknownPursuer`] if `id` is not registered.
    pub fn report_contact_exit(
        &mut self,
        id: PursuerId,
        other: TargetId,
    ) -> Result<bool, PursuitError> {
        let index = self.index_of(id)?;
        Ok(self
            .pursuers
            .get_mut(index)
            .is_some_and(|machine| machine.contact_exit(other)))
    }

    /// Orders pursuer `id` to retreat. Returns whether the order was honoured.
    ///
    /// # Errors
    /// Returns [`PursuitError::UnknownPursuer`] if `id` is not registered.
    pub fn force_retreat(
        &mut self,
        id: PursuerId,
        collaborators: &mut Collaborators<'_>,
    ) -> Result<bool, PursuitError> {
        let index = self.index_of(id)?;
        let area = collaborators.viewport.visible_area();
        let event = self
            .pursuers
            .get_mut(index)
            .and_then(|machine| machine.force_retreat(area));
        Ok(event.is_some_and(|retreat| {
            self.dispatch(id, retreat, area, collaborators);
            true
        }))
    }

    /// Sends pursuer `id` straight back to Hidden. Returns whether the order
    /// was honoured.
    ///
    /// # Errors
    /// Returns [`PursuitError::UnknownPursuer`] if `id` is not registered.
    pub fn force_hide(
        &mut self,
        id: PursuerId,
        collaborators: &mut Collaborators<'_>,
    ) -> Result<bool, PursuitError> {
        let index = self.index_of(id)?;
        let area = collaborators.viewport.visible_area();
        let event = self
            .pursuers
            .get_mut(index)
            .and_then(|machine| machine.force_hide(area));
        Ok(event.is_some_and(|hidden| {
            self.dispatch(id, hidden, area, collaborators);
            true
        }))
    }

    /// Returns every pursuer to a pristine Hidden state and reopens the
    /// session. Calling it twice is the same as calling it once.
    pub fn reset_all(&mut self) {
        for machine in &mut self.pursuers {
            machine.reset();
        }
        if self.session_over || self.active_count > 0 {
            info!("pursuit session reset");
        }
        self.active_count = 0;
        self.clock = 0.0;
        self.last_global_trigger = None;
        self.session_over = false;
        self.game_over_in = None;
        self.game_over_sent = false;
    }

    /// Number of pursuers mid-cycle, as tracked from their notifications.
    #[must_use]
    pub const fn active_count(&self) -> usize {
        self.active_count
    }

    /// Whether a pursuer has caught the target.
    #[must_use]
    pub const fn is_session_over(&self) -> bool {
        self.session_over
    }

    /// Seconds until the game-over notification, while one is pending.
    #[must_use]
    pub const fn game_over_pending(&self) -> Option<f32> {
        self.game_over_in
    }

    /// Whether the game-over notification has been delivered.
    #[must_use]
    pub const fn game_over_sent(&self) -> bool {
        self.game_over_sent
    }

    /// Seconds of session time since construction or the last reset.
    #[must_use]
    pub const fn clock(&self) -> f64 {
        self.clock
    }

    /// The sanitised coordinator policy.
    #[must_use]
    pub const fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Looks up a pursuer by identity.
    #[must_use]
    pub fn pursuer(&self, id: PursuerId) -> Option<&PursuitStateMachine> {
        self.pursuers.iter().find(|machine| machine.id() == id)
    }

    /// Every registered pursuer, in registration order.
    pub fn pursuers(&self) -> impl Iterator<Item = &PursuitStateMachine> {
        self.pursuers.iter()
    }

    /// Number of registered pursuers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pursuers.len()
    }

    /// Whether no pursuer is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pursuers.is_empty()
    }

    /// Serialisable views of every pursuer, in registration order.
    #[must_use]
    pub fn snapshots(&self) -> Vec<PursuerSnapshot> {
        self.pursuers
            .iter()
            .map(PursuitStateMachine::snapshot)
            .collect()
    }

    /// Number of pursuers currently in `state`.
    #[must_use]
    pub fn count_in(&self, state: PursuitState) -> usize {
        self.pursuers
            .iter()
            .filter(|machine| machine.state() == state)
            .count()
    }

    fn index_of(&self, id: PursuerId) -> Result<usize, PursuitError> {
        self.pursuers
            .iter()
            .position(|machine| machine.id() == id)
            .ok_or(PursuitError::UnknownPursuer(id))
    }

    const fn is_frozen(&self) -> bool {
        self.session_over && self.config.freeze_on_catch
    }

    const fn release_slot(&mut self) {
        self.active_count = self.active_count.saturating_sub(1);
    }

    fn dispatch(
        &mut self,
        id: PursuerId,
        event: PursuitEvent,
        area: Option<VisibleArea>,
        collaborators: &mut Collaborators<'_>,
    ) {
        match event {
            PursuitEvent::Triggered { active_position } => {
                self.active_count = self.active_count.saturating_add(1);
                self.last_global_trigger = Some(self.clock);
                collaborators.listener.on_triggered(id, active_position);
                if !self.config.allow_multiple_pursuers {
                    self.exclude_siblings(id, area, collaborators);
                }
            }
            PursuitEvent::Chasing => collaborators.listener.on_chasing(id),
            PursuitEvent::Retreating { reason, .. } => {
                collaborators.listener.on_retreating(id, reason);
            }
            PursuitEvent::Escaped => {
                self.release_slot();
                collaborators.listener.on_hidden(id);
                collaborators.listener.on_escaped(id);
            }
            PursuitEvent::ForcedHidden => {
                self.release_slot();
                collaborators.listener.on_hidden(id);
            }
            PursuitEvent::Caught { channel, distance } => {
                info!("pursuer {id} caught the target via {channel:?} at distance {distance:.2}");
                self.session_over = true;
                if let Some(target) = collaborators.target.as_deref_mut() {
                    target.notify_caught(id);
                } else {
                    warn!("pursuer {id}: catch reported with no target to notify");
                }
                collaborators.listener.on_caught(id, channel);
                self.schedule_game_over(collaborators);
            }
        }
    }

    fn exclude_siblings(
        &mut self,
        winner: PursuerId,
        area: Option<VisibleArea>,
        collaborators: &mut Collaborators<'_>,
    ) {
        let mut hidden = Vec::new();
        for machine in &mut self.pursuers {
            if machine.id() == winner {
                continue;
            }
            if machine.force_hide(area).is_some() {
                hidden.push(machine.id());
            }
        }
        for sibling in hidden {
            debug!("pursuer {sibling} hidden: pursuer {winner} holds the session");
            self.release_slot();
            collaborators.listener.on_hidden(sibling);
        }
    }

    fn schedule_game_over(&mut self, collaborators: &mut Collaborators<'_>) {
        if self.game_over_sent || self.game_over_in.is_some() {
            return;
        }
        self.game_over_in = Some(self.config.game_over_delay);
        self.count_down_game_over(0.0, collaborators);
    }

    fn count_down_game_over(&mut self, dt: f32, collaborators: &mut Collaborators<'_>) {
        let Some(remaining) = self.game_over_in else {
            return;
        };
        let left = remaining - dt;
        if left > 0.0 {
            self.game_over_in = Some(left);
            return;
        }
        self.game_over_in = None;
        self.game_over_sent = true;
        info!("pursuit session over");
        collaborators.listener.on_game_over();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoundaryDirection;
    use crate::pursuit::collaborators::{
        MockPursuitListener, MockPursuitTarget, PursuitListener, SilentListener,
    };
    use crate::pursuit::ContactChannel;
    use glam::Vec2;
    use rstest::{fixture, rstest};

    const PLAYER: TargetId = TargetId(1);

    fn area() -> VisibleArea {
        VisibleArea::new(Vec2::new(-10.0, -5.0), Vec2::new(10.0, 5.0))
    }

    fn player_at(position: Vec2) -> MockPursuitTarget {
        let mut target = MockPursuitTarget::new();
        target.expect_id().return_const(PLAYER);
        target.expect_position().return_const(position);
        target.expect_is_alive().return_const(true);
        target
    }

    fn pursuer(boundary: BoundaryDirection) -> PursuerConfig {
        PursuerConfig {
            trigger_distance: 1.0,
            ..PursuerConfig::for_boundary(boundary)
        }
    }

    #[fixture]
    fn coordinator() -> PursuitCoordinator {
        let mut coordinator = PursuitCoordinator::new(CoordinatorConfig {
            cooldown_between_pursuers: 0.0,
            game_over_delay: 1.0,
            ..CoordinatorConfig::default()
        });
        coordinator.register_config(pursuer(BoundaryDirection::Left));
        coordinator.register_config(pursuer(BoundaryDirection::Top));
        coordinator
    }

    fn tick(
        coordinator: &mut PursuitCoordinator,
        dt: f32,
        target: &mut MockPursuitTarget,
        listener: &mut dyn PursuitListener,
    ) {
        let viewport = area();
        let mut collaborators = Collaborators::new(Some(target), &viewport, listener);
        coordinator.tick(dt, &mut collaborators);
    }

    #[rstest]
    fn ids_follow_registration_order(coordinator: PursuitCoordinator) {
        let ids: Vec<_> = coordinator.pursuers().map(PursuitStateMachine::id).collect();
        assert_eq!(ids, vec![PursuerId(0), PursuerId(1)]);
    }

    #[rstest]
    fn trigger_notifies_listener_and_counts(mut coordinator: PursuitCoordinator) {
        let mut target = player_at(Vec2::new(-9.5, 0.0));
        let mut listener = MockPursuitListener::new();
        listener
            .expect_on_triggered()
            .withf(|id, _| *id == PursuerId(0))
            .times(1)
            .return_const(());
        tick(&mut coordinator, 0.016, &mut target, &mut listener);
        assert_eq!(coordinator.active_count(), 1);
        assert!(!coordinator.can_trigger_new_pursuer());
    }

    #[rstest]
    fn trigger_in_corner_hides_the_sibling_in_same_tick() {
        let mut coordinator = PursuitCoordinator::new(CoordinatorConfig {
            max_active_pursuers: 2,
            cooldown_between_pursuers: 0.0,
            ..CoordinatorConfig::default()
        });
        let left = coordinator.register_config(pursuer(BoundaryDirection::Left));
        let top = coordinator.register_config(pursuer(BoundaryDirection::Top));
        let mut target = player_at(Vec2::new(-9.5, 4.5));
        tick(&mut coordinator, 0.016, &mut target, &mut SilentListener);

        let states = [left, top].map(|id| coordinator.pursuer(id).map(PursuitStateMachine::state));
        assert_eq!(
            states,
            [Some(PursuitState::Hidden), Some(PursuitState::Rising)],
            "the later trigger wins and hides the earlier one"
        );
        assert_eq!(coordinator.active_count(), 1);
    }

    #[rstest]
    fn global_cooldown_spaces_triggers() {
        let mut coordinator = PursuitCoordinator::new(CoordinatorConfig {
            allow_multiple_pursuers: true,
            cooldown_between_pursuers: 1.0,
            ..CoordinatorConfig::default()
        });
        coordinator.register_config(pursuer(BoundaryDirection::Left));
        coordinator.register_config(pursuer(BoundaryDirection::Top));
        let mut target = player_at(Vec2::new(-9.5, 4.5));
        tick(&mut coordinator, 0.016, &mut target, &mut SilentListener);
        assert_eq!(coordinator.count_in(PursuitState::Rising), 1);
        assert!(!coordinator.can_trigger_new_pursuer());
    }

    #[rstest]
    fn global_cooldown_reopens_in_a_long_session(mut coordinator: PursuitCoordinator) {
        coordinator.config.cooldown_between_pursuers = 2.0;
        coordinator.clock = 1.0e7;
        coordinator.last_global_trigger = Some(coordinator.clock);
        let viewport = area();
        let mut listener = SilentListener;
        let frame = 1.0 / 60.0;
        for _ in 0..119 {
            let mut collaborators = Collaborators::new(None, &viewport, &mut listener);
            coordinator.tick(frame, &mut collaborators);
        }
        assert!(coordinator.clock() > 1.0e7);
        assert!(!coordinator.can_trigger_new_pursuer());
        for _ in 0..2 {
            let mut collaborators = Collaborators::new(None, &viewport, &mut listener);
            coordinator.tick(frame, &mut collaborators);
        }
        assert!(coordinator.can_trigger_new_pursuer());
    }

    #[rstest]
    fn contact_for_unknown_pursuer_is_an_error(mut coordinator: PursuitCoordinator) {
        let mut target = player_at(Vec2::ZERO);
        let viewport = area();
        let mut listener = SilentListener;
        let mut collaborators = Collaborators::new(Some(&mut target), &viewport, &mut listener);
        let result = coordinator.report_contact_enter(PursuerId(42), PLAYER, &mut collaborators);
        assert_eq!(result, Err(PursuitError::UnknownPursuer(PursuerId(42))));
        assert_eq!(
            coordinator.report_contact_exit(PursuerId(42), PLAYER),
            Err(PursuitError::UnknownPursuer(PursuerId(42)))
        );
    }

    #[rstest]
    fn catch_notifies_target_once_and_game_over_after_delay(mut coordinator: PursuitCoordinator) {
        let mut target = player_at(Vec2::new(-9.5, 0.0));
        target
            .expect_notify_caught()
            .withf(|by| *by == PursuerId(0))
            .times(1)
            .return_const(());
        let mut listener = MockPursuitListener::new();
        listener.expect_on_triggered().return_const(());
        listener.expect_on_chasing().return_const(());
        listener
            .expect_on_caught()
            .withf(|_, channel| *channel == ContactChannel::Sensor)
            .times(1)
            .return_const(());
        listener.expect_on_game_over().times(1).return_const(());

        for _ in 0..40 {
            tick(&mut coordinator, 0.05, &mut target, &mut listener);
        }
        let chasing = coordinator.pursuer(PursuerId(0)).map(PursuitStateMachine::state);
        assert_eq!(chasing, Some(PursuitState::Chasing));

        {
            let viewport = area();
            let mut collaborators =
                Collaborators::new(Some(&mut target), &viewport, &mut listener);
            let event = coordinator.report_contact_enter(PursuerId(0), PLAYER, &mut collaborators);
            assert!(matches!(event, Ok(Some(PursuitEvent::Caught { .. }))));
        }
        assert!(coordinator.is_session_over());
        assert!(!coordinator.can_trigger_new_pursuer());

        for _ in 0..19 {
            tick(&mut coordinator, 0.05, &mut target, &mut listener);
        }
        assert!(!coordinator.game_over_sent());
        for _ in 0..30 {
            tick(&mut coordinator, 0.05, &mut target, &mut listener);
        }
        assert!(coordinator.game_over_sent());
    }

    #[rstest]
    fn reset_all_is_idempotent(mut coordinator: PursuitCoordinator) {
        let mut target = player_at(Vec2::new(-9.5, 0.0));
        for _ in 0..10 {
            tick(&mut coordinator, 0.05, &mut target, &mut SilentListener);
        }
        coordinator.reset_all();
        let once = coordinator.snapshots();
        coordinator.reset_all();
        assert_eq!(coordinator.snapshots(), once);
        assert_eq!(coordinator.active_count(), 0);
        assert!(!coordinator.is_session_over());
        assert!(once
            .iter()
            .all(|snapshot| snapshot.state == PursuitState::Hidden
                && snapshot.cooldown_timer == 0.0
                && snapshot.chase_timer == 0.0));
    }

    #[rstest]
    fn deregistering_an_active_pursuer_frees_its_slot(mut coordinator: PursuitCoordinator) {
        let mut target = player_at(Vec2::new(-9.5, 0.0));
        tick(&mut coordinator, 0.016, &mut target, &mut SilentListener);
        assert_eq!(coordinator.active_count(), 1);
        let removed = coordinator.deregister(PursuerId(0));
        assert!(removed.is_ok_and(|machine| machine.state() == PursuitState::Rising));
        assert_eq!(coordinator.active_count(), 0);
        assert_eq!(coordinator.len(), 1);
    }

    #[rstest]
    fn missing_target_keeps_everyone_hidden(mut coordinator: PursuitCoordinator) {
        let viewport = area();
        let mut listener = SilentListener;
        let mut collaborators = Collaborators::new(None, &viewport, &mut listener);
        coordinator.tick(0.1, &mut collaborators);
        assert_eq!(coordinator.count_in(PursuitState::Hidden), 2);
    }
}
