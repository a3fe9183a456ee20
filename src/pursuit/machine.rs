//! The per-pursuer state machine.
//!
//! A [`PursuitStateMachine`] cycles Hidden -> Rising -> Chasing ->
//! {Retreating -> Hidden | Success}. It is advanced once per tick with a
//! [`Frame`] describing the shared world, and reports at most one
//! [`PursuitEvent`] per call. Guard evaluation and the entry action of the
//! resulting state happen inside the same call, so a machine is never
//! observed half-way through a transition.
//!
//! Every unbounded phase carries a timeout:
//!
//! - Rising ends on arrival at the active anchor or after `rise_timeout`.
//! - Chasing ends on contact or once `chase_timer` reaches `chase_timeout`.
//! - Retreating ends on arrival at the hidden anchor or after
//!   `retreat_timeout`, whichever comes first.

use glam::Vec2;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::PursuerConfig;
use crate::geometry::{active_anchor, BoundaryDirection, VisibleArea};
use crate::motion::{has_arrived, step_towards};

use super::collaborators::TargetView;
use super::contact::{ContactEvent, ContactPolicy, TargetId};
use super::error::MissingReference;
use super::state::{ContactChannel, PursuitEvent, PursuitState, RetreatReason};
use super::PursuerId;

/// Shared world inputs for one update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Seconds elapsed since the previous update.
    pub dt: f32,
    /// Snapshot of the target, if one exists.
    pub target: Option<TargetView>,
    /// Visible area, if camera geometry is available.
    pub area: Option<VisibleArea>,
    /// Whether the coordinator currently admits a new trigger.
    pub may_trigger: bool,
}

/// Serialisable view of a pursuer for presentation and debugging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PursuerSnapshot {
    /// Pursuer identity.
    pub id: PursuerId,
    /// Edge the pursuer is bound to.
    pub boundary: BoundaryDirection,
    /// Current phase.
    pub state: PursuitState,
    /// Current position.
    pub position: Vec2,
    /// Seconds on the chase clock.
    pub chase_timer: f32,
    /// Seconds of dormancy remaining.
    pub cooldown_timer: f32,
    /// Sensor contacts received.
    pub contact_count: u64,
}

/// Finite state machine driving one pursuer.
#[derive(Debug, Clone, PartialEq)]
pub struct PursuitStateMachine {
    id: PursuerId,
    config: PursuerConfig,
    state: PursuitState,
    position: Vec2,
    hidden_position: Vec2,
    active_position: Vec2,
    chase_timer: f32,
    state_elapsed: f32,
    cooldown_timer: f32,
    contact: ContactPolicy,
    inert: Option<MissingReference>,
}

impl PursuitStateMachine {
    /// Creates a Hidden pursuer. The configuration is sanitised first.
    #[must_use]
    pub fn new(config: PursuerConfig) -> Self {
        let clean = config.sanitized();
        let contact = ContactPolicy::from_config(&clean);
        Self {
            id: PursuerId::default(),
            config: clean,
            state: PursuitState::Hidden,
            position: Vec2::ZERO,
            hidden_position: Vec2::ZERO,
            active_position: Vec2::ZERO,
            chase_timer: 0.0,
            state_elapsed: 0.0,
            cooldown_timer: 0.0,
            contact,
            inert: None,
        }
    }

    /// Places the pursuer at `position` until the first update re-anchors it.
    #[must_use]
    pub const fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self.hidden_position = position;
        self
    }

    pub(crate) const fn assign_id(&mut self, id: PursuerId) {
        self.id = id;
    }

    /// Identity assigned at registration.
    #[must_use]
    pub const fn id(&self) -> PursuerId {
        self.id
    }

    /// Current phase.
    #[must_use]
    pub const fn state(&self) -> PursuitState {
        self.state
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Anchor just beyond the bound edge.
    #[must_use]
    pub const fn hidden_position(&self) -> Vec2 {
        self.hidden_position
    }

    /// Anchor beside the target, snapshotted at trigger time.
    #[must_use]
    pub const fn active_position(&self) -> Vec2 {
        self.active_position
    }

    /// Seconds on the chase clock.
    #[must_use]
    pub const fn chase_timer(&self) -> f32 {
        self.chase_timer
    }

    /// Seconds spent in the current state.
    #[must_use]
    pub const fn state_elapsed(&self) -> f32 {
        self.state_elapsed
    }

    /// Seconds of dormancy remaining.
    #[must_use]
    pub const fn cooldown_timer(&self) -> f32 {
        self.cooldown_timer
    }

    /// The sanitised configuration.
    #[must_use]
    pub const fn config(&self) -> &PursuerConfig {
        &self.config
    }

    /// Edge this pursuer is bound to.
    #[must_use]
    pub const fn boundary(&self) -> BoundaryDirection {
        self.config.boundary
    }

    /// Contact strategy chosen at construction.
    #[must_use]
    pub const fn contact_policy(&self) -> &ContactPolicy {
        &self.contact
    }

    /// Reference whose absence currently keeps the pursuer inert, if any.
    #[must_use]
    pub const fn missing_reference(&self) -> Option<MissingReference> {
        self.inert
    }

    /// Serialisable view of the current state.
    #[must_use]
    pub fn snapshot(&self) -> PursuerSnapshot {
        PursuerSnapshot {
            id: self.id,
            boundary: self.config.boundary,
            state: self.state,
            position: self.position,
            chase_timer: self.chase_timer,
            cooldown_timer: self.cooldown_timer,
            contact_count: self
                .contact
                .detector()
                .map_or(0, super::contact::ContactDetector::contact_count),
        }
    }

    /// Advances the machine by one tick.
    pub fn update(&mut self, frame: &Frame) -> Option<PursuitEvent> {
        let dt = if frame.dt.is_finite() { frame.dt.max(0.0) } else { 0.0 };
        match self.state {
            PursuitState::Hidden => self.update_hidden(dt, frame),
            PursuitState::Rising => self.update_rising(dt),
            PursuitState::Chasing => self.update_chasing(dt, frame),
            PursuitState::Retreating => self.update_retreating(dt),
            PursuitState::Success => None,
        }
    }

    /// Feeds a sensor `enter` report into the machine.
    ///
    /// The detector always records the contact. It only ends the chase when
    /// the machine is Chasing and `other` is the live target.
    pub fn contact_enter(
        &mut self,
        other: TargetId,
        target: Option<TargetView>,
    ) -> Option<PursuitEvent> {
        let Some(detector) = self.contact.detector_mut() else {
            debug!("pursuer {}: sensor report ignored, no sensor fitted", self.id);
            return None;
        };
        detector.enter(other);

        let distance = target
            .filter(|view| view.id == other)
            .map_or(f32::INFINITY, |view| self.position.distance(view.position));
        let event = ContactEvent {
            source: self.id,
            target: other,
            distance,
        };
        self.on_contact(&event, target)
    }

    /// Feeds a sensor `exit` report into the machine.
    pub fn contact_exit(&mut self, other: TargetId) -> bool {
        self.contact
            .detector_mut()
            .is_some_and(|detector| detector.exit(other))
    }

    /// Orders a retreat. Only honoured while Rising or Chasing.
    pub fn force_retreat(&mut self, area: Option<VisibleArea>) -> Option<PursuitEvent> {
        match self.state {
            PursuitState::Rising | PursuitState::Chasing => {
                Some(self.begin_retreat(area, RetreatReason::Forced))
            }
            PursuitState::Hidden | PursuitState::Retreating | PursuitState::Success => None,
        }
    }

    /// Sends the pursuer straight back to Hidden and starts its cooldown.
    ///
    /// Only honoured while Rising, Chasing or Retreating; Success stays
    /// terminal until [`Self::reset`].
    pub fn force_hide(&mut self, area: Option<VisibleArea>) -> Option<PursuitEvent> {
        if !self.state.is_moving() {
            return None;
        }
        self.refresh_hidden_anchor(area, self.position);
        self.position = self.hidden_position;
        self.cooldown_timer = self.config.trigger_cooldown;
        self.enter(PursuitState::Hidden, "forced");
        Some(PursuitEvent::ForcedHidden)
    }

    /// Returns to a pristine Hidden state with every timer cleared.
    pub fn reset(&mut self) {
        if self.state != PursuitState::Hidden {
            self.enter(PursuitState::Hidden, "reset");
        }
        self.position = self.hidden_position;
        self.chase_timer = 0.0;
        self.state_elapsed = 0.0;
        self.cooldown_timer = 0.0;
        self.inert = None;
        if let Some(detector) = self.contact.detector_mut() {
            detector.clear();
        }
    }

    fn update_hidden(&mut self, dt: f32, frame: &Frame) -> Option<PursuitEvent> {
        self.cooldown_timer = (self.cooldown_timer - dt).max(0.0);

        let Some(area) = frame.area.filter(VisibleArea::is_finite) else {
            self.mark_inert(MissingReference::Viewport);
            return None;
        };
        let Some(target) = frame.target.filter(|view| view.position.is_finite()) else {
            self.mark_inert(MissingReference::Target);
            return None;
        };
        self.clear_inert();

        let boundary = self.config.boundary;
        self.hidden_position =
            area.hidden_anchor(boundary, boundary.along(target.position), self.config.hidden_offset);
        self.position = self.hidden_position;

        if self.cooldown_timer > 0.0 || !frame.may_trigger || !target.alive {
            return None;
        }
        if area.distance_to_edge(boundary, target.position) > self.config.trigger_distance {
            return None;
        }

        self.active_position = active_anchor(boundary, target.position, self.config.approach_offset);
        self.enter(PursuitState::Rising, "target near edge");
        Some(PursuitEvent::Triggered {
            active_position: self.active_position,
        })
    }

    fn update_rising(&mut self, dt: f32) -> Option<PursuitEvent> {
        self.advance_clocks(dt);
        self.position = step_towards(self.position, self.active_position, self.config.rise_speed, dt);

        let arrived = has_arrived(self.position, self.active_position, self.config.arrival_epsilon);
        if !arrived && self.state_elapsed <= self.config.rise_timeout {
            return None;
        }
        self.enter(PursuitState::Chasing, if arrived { "emerged" } else { "rise timeout" });
        Some(PursuitEvent::Chasing)
    }

    fn update_chasing(&mut self, dt: f32, frame: &Frame) -> Option<PursuitEvent> {
        self.advance_clocks(dt);

        let Some(target) = frame.target.filter(TargetView::is_pursuable) else {
            return Some(self.begin_retreat(frame.area, RetreatReason::TargetLost));
        };

        self.position = step_towards(self.position, target.position, self.config.chase_speed, dt);

        if let Some(caught) = self.detect_contact(&target) {
            return Some(caught);
        }
        if self.chase_timer >= self.config.chase_timeout {
            return Some(self.begin_retreat(frame.area, RetreatReason::Timeout));
        }
        None
    }

    fn update_retreating(&mut self, dt: f32) -> Option<PursuitEvent> {
        self.advance_clocks(dt);
        self.position =
            step_towards(self.position, self.hidden_position, self.config.retreat_speed, dt);

        let arrived = has_arrived(self.position, self.hidden_position, self.config.retreat_epsilon);
        if !arrived && self.state_elapsed <= self.config.retreat_timeout {
            return None;
        }
        self.position = self.hidden_position;
        self.cooldown_timer = self.config.trigger_cooldown;
        self.enter(PursuitState::Hidden, if arrived { "home" } else { "retreat timeout" });
        Some(PursuitEvent::Escaped)
    }

    // Continuous channel: runs every Chasing update.
    fn detect_contact(&mut self, target: &TargetView) -> Option<PursuitEvent> {
        let distance = self.position.distance(target.position);
        let channel = match &self.contact {
            ContactPolicy::Precise(detector) => {
                detector.is_touching_target(target.id).then_some(ContactChannel::Sensor)
            }
            ContactPolicy::DistanceFallback { radius } => {
                (distance <= *radius).then_some(ContactChannel::Distance)
            }
        }?;
        Some(self.catch(channel, distance))
    }

    // Push channel: runs when the sensor reports an enter.
    fn on_contact(&mut self, event: &ContactEvent, target: Option<TargetView>) -> Option<PursuitEvent> {
        if self.state != PursuitState::Chasing {
            debug!(
                "pursuer {}: contact with {:?} ignored while {:?}",
                self.id, event.target, self.state
            );
            return None;
        }
        let is_target = target.is_some_and(|view| view.id == event.target && view.is_pursuable());
        if !is_target {
            return None;
        }
        Some(self.catch(ContactChannel::Sensor, event.distance))
    }

    fn catch(&mut self, channel: ContactChannel, distance: f32) -> PursuitEvent {
        self.enter(PursuitState::Success, "caught target");
        PursuitEvent::Caught { channel, distance }
    }

    fn begin_retreat(&mut self, area: Option<VisibleArea>, reason: RetreatReason) -> PursuitEvent {
        self.refresh_hidden_anchor(area, self.position);
        self.enter(PursuitState::Retreating, retreat_label(reason));
        PursuitEvent::Retreating {
            hidden_position: self.hidden_position,
            reason,
        }
    }

    // Keeps the previous anchor when no geometry is available; the retreat
    // timeout still brings the pursuer home.
    fn refresh_hidden_anchor(&mut self, area: Option<VisibleArea>, level_with: Vec2) {
        if let Some(visible) = area.filter(VisibleArea::is_finite) {
            let boundary = self.config.boundary;
            self.hidden_position =
                visible.hidden_anchor(boundary, boundary.along(level_with), self.config.hidden_offset);
        }
    }

    fn advance_clocks(&mut self, dt: f32) {
        self.chase_timer += dt;
        self.state_elapsed += dt;
    }

    fn enter(&mut self, next: PursuitState, why: &str) {
        info!("pursuer {}: {:?} -> {:?} ({why})", self.id, self.state, next);
        self.state = next;
        self.state_elapsed = 0.0;
        if matches!(next, PursuitState::Rising | PursuitState::Chasing | PursuitState::Hidden) {
            self.chase_timer = 0.0;
        }
    }

    fn mark_inert(&mut self, reason: MissingReference) {
        if self.inert != Some(reason) {
            warn!("pursuer {} inert: {reason}", self.id);
            self.inert = Some(reason);
        }
    }

    fn clear_inert(&mut self) {
        if let Some(reason) = self.inert.take() {
            info!("pursuer {} active again ({reason} resolved)", self.id);
        }
    }
}

const fn retreat_label(reason: RetreatReason) -> &'static str {
    match reason {
        RetreatReason::Timeout => "chase timeout",
        RetreatReason::TargetLost => "target lost",
        RetreatReason::Forced => "forced",
    }
}
