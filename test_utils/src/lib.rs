//! Shared fixtures for pursuit tests.
//!
//! Pure-core helpers live at the crate root; Bevy app builders live in
//! [`app`].

pub mod app;

use catcher::geometry::VisibleArea;
use catcher::pursuit::{
    Collaborators, ContactChannel, PursuerId, PursuitCoordinator, PursuitListener, PursuitTarget,
    RetreatReason, TargetId,
};
use glam::Vec2;

/// Identity used by [`StubTarget`].
pub const PLAYER: TargetId = TargetId(100);

/// Visible area spanning `(-10, -5)` to `(10, 5)`.
#[must_use]
pub fn standard_area() -> VisibleArea {
    VisibleArea::new(Vec2::new(-10.0, -5.0), Vec2::new(10.0, 5.0))
}

/// Target whose state tests set directly.
#[derive(Debug, Clone, PartialEq)]
pub struct StubTarget {
    /// Identity reported to pursuers.
    pub id: TargetId,
    /// Current position.
    pub position: Vec2,
    /// Whether the target may be pursued.
    pub alive: bool,
    /// Every pursuer that reported a catch, in order.
    pub caught_by: Vec<PursuerId>,
}

impl StubTarget {
    /// A live target at `position`.
    #[must_use]
    pub const fn at(position: Vec2) -> Self {
        Self {
            id: PLAYER,
            position,
            alive: true,
            caught_by: Vec::new(),
        }
    }
}

impl PursuitTarget for StubTarget {
    fn id(&self) -> TargetId {
        self.id
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn notify_caught(&mut self, by: PursuerId) {
        self.caught_by.push(by);
    }
}

/// One notification received by a [`RecordingListener`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notification {
    /// `on_triggered`.
    Triggered(PursuerId),
    /// `on_chasing`.
    Chasing(PursuerId),
    /// `on_retreating`.
    Retreating(PursuerId, RetreatReason),
    /// `on_hidden`.
    Hidden(PursuerId),
    /// `on_escaped`.
    Escaped(PursuerId),
    /// `on_caught`.
    Caught(PursuerId, ContactChannel),
    /// `on_game_over`.
    GameOver,
}

/// Listener that records every notification in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingListener {
    /// Notifications received so far.
    pub log: Vec<Notification>,
}

impl RecordingListener {
    /// Number of recorded notifications matching `predicate`.
    #[must_use]
    pub fn count(&self, predicate: impl Fn(&Notification) -> bool) -> usize {
        self.log.iter().filter(|entry| predicate(entry)).count()
    }
}

impl PursuitListener for RecordingListener {
    fn on_triggered(&mut self, pursuer: PursuerId, _active_position: Vec2) {
        self.log.push(Notification::Triggered(pursuer));
    }

    fn on_chasing(&mut self, pursuer: PursuerId) {
        self.log.push(Notification::Chasing(pursuer));
    }

    fn on_retreating(&mut self, pursuer: PursuerId, reason: RetreatReason) {
        self.log.push(Notification::Retreating(pursuer, reason));
    }

    fn on_hidden(&mut self, pursuer: PursuerId) {
        self.log.push(Notification::Hidden(pursuer));
    }

    fn on_escaped(&mut self, pursuer: PursuerId) {
        self.log.push(Notification::Escaped(pursuer));
    }

    fn on_caught(&mut self, pursuer: PursuerId, channel: ContactChannel) {
        self.log.push(Notification::Caught(pursuer, channel));
    }

    fn on_game_over(&mut self) {
        self.log.push(Notification::GameOver);
    }
}

/// A coordinator together with the collaborators it is ticked against.
#[derive(Debug)]
pub struct Harness {
    /// The coordinator under test.
    pub coordinator: PursuitCoordinator,
    /// The pursued target.
    pub target: StubTarget,
    /// Camera geometry; `None` simulates a missing camera.
    pub area: Option<VisibleArea>,
    /// Recorded notifications.
    pub listener: RecordingListener,
}

impl Harness {
    /// Wraps `coordinator` with a target at `target` and the standard area.
    #[must_use]
    pub fn new(coordinator: PursuitCoordinator, target: Vec2) -> Self {
        Self {
            coordinator,
            target: StubTarget::at(target),
            area: Some(standard_area()),
            listener: RecordingListener::default(),
        }
    }

    /// Runs one coordinator tick.
    pub fn tick(&mut self, dt: f32) {
        let mut collaborators =
            Collaborators::new(Some(&mut self.target), &self.area, &mut self.listener);
        self.coordinator.tick(dt, &mut collaborators);
    }

    /// Runs `count` ticks of `dt`.
    pub fn run(&mut self, count: usize, dt: f32) {
        for _ in 0..count {
            self.tick(dt);
        }
    }

    /// Ticks until `done` holds, giving up after `limit` ticks. Returns the
    /// number of ticks taken, or `None` on timeout.
    pub fn run_until(
        &mut self,
        limit: usize,
        dt: f32,
        done: impl Fn(&Self) -> bool,
    ) -> Option<usize> {
        for taken in 0..limit {
            if done(self) {
                return Some(taken);
            }
            self.tick(dt);
        }
        done(self).then_some(limit)
    }

    /// Feeds a sensor `enter` for the stub target into pursuer `id`.
    ///
    /// # Errors
    /// Propagates [`catcher::pursuit::PursuitError`] for unknown pursuers.
    pub fn contact(
        &mut self,
        id: PursuerId,
    ) -> Result<Option<catcher::pursuit::PursuitEvent>, catcher::pursuit::PursuitError> {
        let other = self.target.id;
        let mut collaborators =
            Collaborators::new(Some(&mut self.target), &self.area, &mut self.listener);
        self.coordinator
            .report_contact_enter(id, other, &mut collaborators)
    }
}
