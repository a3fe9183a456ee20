//! Interfaces to the systems a pursuit session talks to.
//!
//! Nothing in the pursuit core reaches for globals. The coordinator borrows a
//! [`Collaborators`] bundle for the duration of each call and reads the target
//! and the visible area through it; every outward notification goes through
//! the same bundle.

use glam::Vec2;

use crate::geometry::VisibleArea;

use super::contact::TargetId;
use super::state::{ContactChannel, RetreatReason};
use super::PursuerId;

/// The object being pursued (the player).
#[cfg_attr(test, mockall::automock)]
pub trait PursuitTarget {
    /// Stable identity, matched against sensor reports.
    fn id(&self) -> TargetId;

    /// Current world position.
    fn position(&self) -> Vec2;

    /// Whether the target can still be pursued.
    fn is_alive(&self) -> bool;

    /// One-way signal that `by` caught the target.
    fn notify_caught(&mut self, by: PursuerId);
}

/// Source of the world rectangle currently visible on screen.
pub trait ViewportSource {
    /// The visible area, or `None` when no camera geometry is available.
    fn visible_area(&self) -> Option<VisibleArea>;
}

impl ViewportSource for VisibleArea {
    fn visible_area(&self) -> Option<VisibleArea> {
        Some(*self)
    }
}

impl ViewportSource for Option<VisibleArea> {
    fn visible_area(&self) -> Option<VisibleArea> {
        *self
    }
}

/// Presentation and game-flow hooks. Every method defaults to a no-op.
#[cfg_attr(test, mockall::automock)]
pub trait PursuitListener {
    /// A pursuer left Hidden and is emerging towards `active_position`.
    fn on_triggered(&mut self, _pursuer: PursuerId, _active_position: Vec2) {}

    /// A pursuer finished emerging and is now chasing.
    fn on_chasing(&mut self, _pursuer: PursuerId) {}

    /// A pursuer gave up and is returning to its hidden anchor.
    fn on_retreating(&mut self, _pursuer: PursuerId, _reason: RetreatReason) {}

    /// A pursuer is back at its hidden anchor, either by retreat or by order.
    fn on_hidden(&mut self, _pursuer: PursuerId) {}

    /// A pursuer completed a cycle without catching the target.
    fn on_escaped(&mut self, _pursuer: PursuerId) {}

    /// A pursuer caught the target.
    fn on_caught(&mut self, _pursuer: PursuerId, _channel: ContactChannel) {}

    /// The post-catch delay elapsed; the session is formally over.
    fn on_game_over(&mut self) {}
}

/// Listener that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentListener;

impl PursuitListener for SilentListener {}

/// Read-only snapshot of the target taken once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetView {
    /// Target identity.
    pub id: TargetId,
    /// Target position.
    pub position: Vec2,
    /// Whether the target is alive.
    pub alive: bool,
}

impl TargetView {
    /// Captures the current state of `target`.
    #[must_use]
    pub fn capture(target: &dyn PursuitTarget) -> Self {
        Self {
            id: target.id(),
            position: target.position(),
            alive: target.is_alive(),
        }
    }

    /// Whether the target can be pursued this tick.
    #[must_use]
    pub fn is_pursuable(&self) -> bool {
        self.alive && self.position.is_finite()
    }
}

/// Collaborators borrowed by the coordinator for one call.
pub struct Collaborators<'a> {
    /// The pursued object, if one exists.
    pub target: Option<&'a mut dyn PursuitTarget>,
    /// Camera geometry.
    pub viewport: &'a dyn ViewportSource,
    /// Notification sink.
    pub listener: &'a mut dyn PursuitListener,
}

impl<'a> Collaborators<'a> {
    /// Bundles the three collaborators.
    pub fn new(
        target: Option<&'a mut dyn PursuitTarget>,
        viewport: &'a dyn ViewportSource,
        listener: &'a mut dyn PursuitListener,
    ) -> Self {
        Self {
            target,
            viewport,
            listener,
        }
    }

    /// Snapshot of the target, if present.
    #[must_use]
    pub fn target_view(&self) -> Option<TargetView> {
        self.target.as_deref().map(TargetView::capture)
    }
}
