//! Pursuit states and the transition events a machine emits.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Phase of a single pursuer's cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PursuitState {
    /// Parked beyond the screen edge, waiting for the target to stray close.
    #[default]
    Hidden,
    /// Emerging towards the active anchor beside the target.
    Rising,
    /// Pursuing the target.
    Chasing,
    /// Returning to the hidden anchor after giving up.
    Retreating,
    /// The target was caught; terminal until reset.
    Success,
}

impl PursuitState {
    /// Whether the pursuer is mid-cycle (anything other than Hidden).
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Hidden)
    }

    /// Whether the state moves the pursuer each update.
    #[must_use]
    pub const fn is_moving(self) -> bool {
        matches!(self, Self::Rising | Self::Chasing | Self::Retreating)
    }
}

/// Why a pursuer started retreating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetreatReason {
    /// The chase timeout elapsed without contact.
    Timeout,
    /// The target died or disappeared mid-chase.
    TargetLost,
    /// An external caller ordered the retreat.
    Forced,
}

/// Channel that reported the catching contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactChannel {
    /// The trigger-volume sensor.
    Sensor,
    /// The distance fallback.
    Distance,
}

/// Transition emitted by a [`super::PursuitStateMachine`].
///
/// A machine emits at most one event per update, always after the new state
/// and its entry action have been applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PursuitEvent {
    /// Hidden -> Rising. Carries the snapshotted active anchor.
    Triggered {
        /// Where the pursuer is emerging to.
        active_position: Vec2,
    },
    /// Rising -> Chasing.
    Chasing,
    /// Chasing (or Rising) -> Retreating.
    Retreating {
        /// Freshly computed hidden anchor.
        hidden_position: Vec2,
        /// What ended the chase.
        reason: RetreatReason,
    },
    /// Retreating -> Hidden after a completed cycle.
    Escaped,
    /// Chasing -> Success.
    Caught {
        /// Channel that detected the contact.
        channel: ContactChannel,
        /// Distance between pursuer and target when contact was registered.
        distance: f32,
    },
    /// Any active state -> Hidden by external order.
    ForcedHidden,
}

impl PursuitEvent {
    /// State the machine is in after this event.
    #[must_use]
    pub const fn resulting_state(&self) -> PursuitState {
        match self {
            Self::Triggered { .. } => PursuitState::Rising,
            Self::Chasing => PursuitState::Chasing,
            Self::Retreating { .. } => PursuitState::Retreating,
            Self::Escaped | Self::ForcedHidden => PursuitState::Hidden,
            Self::Caught { .. } => PursuitState::Success,
        }
    }
}
