//! Default tuning values for pursuers and the coordinator.
//!
//! Configuration structs fall back to these when a field is omitted, and the
//! `MIN_*` values are the floors applied when clamping invalid input.

/// Distance from the bound edge, in world units, at which a pursuer fires.
pub const DEFAULT_TRIGGER_DISTANCE: f32 = 1.0;
/// Speed used while emerging from the hidden anchor.
pub const DEFAULT_RISE_SPEED: f32 = 6.0;
/// Speed used while chasing the target.
pub const DEFAULT_CHASE_SPEED: f32 = 4.5;
/// Speed used while retreating to the hidden anchor.
pub const DEFAULT_RETREAT_SPEED: f32 = 8.0;
/// Radius of the distance-based contact fallback.
pub const DEFAULT_TOUCH_RADIUS: f32 = 0.5;
/// Seconds a chase may last before the pursuer gives up.
pub const DEFAULT_CHASE_TIMEOUT: f32 = 8.0;
/// Seconds a pursuer stays dormant after returning to its hidden anchor.
pub const DEFAULT_TRIGGER_COOLDOWN: f32 = 3.0;
/// Hard cap on the emergence phase.
pub const DEFAULT_RISE_TIMEOUT: f32 = 2.0;
/// Hard cap on the retreat phase.
pub const DEFAULT_RETREAT_TIMEOUT: f32 = 3.0;
/// Arrival tolerance at the active anchor.
pub const DEFAULT_ARRIVAL_EPSILON: f32 = 0.05;
/// Arrival tolerance at the hidden anchor.
pub const DEFAULT_RETREAT_EPSILON: f32 = 0.1;
/// How far beyond the visible edge the hidden anchor sits.
pub const DEFAULT_HIDDEN_OFFSET: f32 = 2.0;
/// How far from the target, towards the approach side, the active anchor sits.
pub const DEFAULT_APPROACH_OFFSET: f32 = 1.5;

/// Default number of simultaneously active pursuers.
pub const DEFAULT_MAX_ACTIVE_PURSUERS: usize = 1;
/// Default seconds between two global trigger events.
pub const DEFAULT_COOLDOWN_BETWEEN_PURSUERS: f32 = 2.0;
/// Default delay between a catch and the game-over notification.
pub const DEFAULT_GAME_OVER_DELAY: f32 = 1.5;

/// Slowest speed accepted by configuration clamping.
pub const MIN_SPEED: f32 = 0.01;
/// Smallest tolerance or radius accepted by configuration clamping.
pub const MIN_TOLERANCE: f32 = 1e-4;
/// Shortest rise/retreat timeout accepted by configuration clamping.
pub const MIN_PHASE_TIMEOUT: f32 = 0.01;
