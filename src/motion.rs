//! Overshoot-safe motion helpers.
//! Small helpers for moving a point towards a destination at bounded speed.
use glam::Vec2;

/// Advances `current` towards `destination` by at most `speed * dt`.
///
/// When the step would reach or pass the destination the result snaps to it
/// exactly, so repeated calls never oscillate across the destination. Non-
/// finite inputs and non-positive steps leave the point where it is.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use catcher::motion::step_towards;
///
/// let moved = step_towards(Vec2::ZERO, Vec2::new(10.0, 0.0), 2.0, 0.5);
/// assert!((moved.x - 1.0).abs() < f32::EPSILON);
///
/// // A large step snaps onto the destination instead of passing it.
/// let snapped = step_towards(Vec2::ZERO, Vec2::new(1.0, 0.0), 100.0, 1.0);
/// assert_eq!(snapped, Vec2::new(1.0, 0.0));
/// ```
#[must_use]
pub fn step_towards(current: Vec2, destination: Vec2, speed: f32, dt: f32) -> Vec2 {
    let max_step = speed * dt;
    if !max_step.is_finite() || max_step <= 0.0 || !destination.is_finite() {
        return current;
    }

    let offset = destination - current;
    let remaining = offset.length();
    if max_step >= remaining {
        return destination;
    }

    match offset.try_normalize() {
        Some(direction) => current + direction * max_step,
        None => destination,
    }
}

/// Returns `true` when `point` lies strictly within `epsilon` of `destination`.
#[must_use]
pub fn has_arrived(point: Vec2, destination: Vec2, epsilon: f32) -> bool {
    point.distance(destination) < epsilon
}
