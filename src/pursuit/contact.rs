//! Contact sensing between a pursuer and its target.
//!
//! [`ContactDetector`] is a pure relay with idempotent flags: it records what
//! the trigger volume reports and never decides whether the contact matters.
//! That decision belongs to the owning state machine, which consults the
//! [`ContactPolicy`] chosen at construction.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::config::{ContactMode, PursuerConfig};

use super::PursuerId;

/// Opaque identity of an object that can overlap a pursuer's sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u64);

/// A single reported contact, consumed once by the owning machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactEvent {
    /// Pursuer whose sensor fired.
    pub source: PursuerId,
    /// Object that entered the sensor.
    pub target: TargetId,
    /// Pursuer-to-object distance when the contact was reported.
    pub distance: f32,
}

/// Trigger-volume sensor state.
///
/// Tracks every object currently overlapping the sensor, so an unrelated body
/// entering and leaving never clears a contact that is still live.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDetector {
    touching: HashSet<TargetId>,
    contact_count: u64,
}

impl ContactDetector {
    /// Creates a detector with no contact recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `target` began overlapping the sensor.
    pub fn enter(&mut self, target: TargetId) {
        self.touching.insert(target);
        self.contact_count = self.contact_count.saturating_add(1);
    }

    /// Records that `target` stopped overlapping the sensor.
    ///
    /// Only `target` is released; other overlapping objects stay tracked.
    /// Returns whether `target` was being tracked.
    pub fn exit(&mut self, target: TargetId) -> bool {
        self.touching.remove(&target)
    }

    /// Whether anything is currently overlapping the sensor.
    #[must_use]
    pub fn is_touching(&self) -> bool {
        !self.touching.is_empty()
    }

    /// Whether `target` is currently overlapping the sensor.
    #[must_use]
    pub fn is_touching_target(&self, target: TargetId) -> bool {
        self.touching.contains(&target)
    }

    /// Number of objects currently overlapping the sensor.
    #[must_use]
    pub fn overlap_count(&self) -> usize {
        self.touching.len()
    }

    /// Number of `enter` reports received since construction or reset.
    #[must_use]
    pub const fn contact_count(&self) -> u64 {
        self.contact_count
    }

    /// Forgets every recorded contact.
    pub fn clear(&mut self) {
        self.touching.clear();
        self.contact_count = 0;
    }
}

/// Contact detection strategy, fixed for the lifetime of a pursuer.
#[derive(Debug, Clone, PartialEq)]
pub enum ContactPolicy {
    /// Catches on sensor reports only.
    Precise(ContactDetector),
    /// No sensor; catches when the target is within `radius`.
    DistanceFallback {
        /// Catch radius in world units.
        radius: f32,
    },
}

impl ContactPolicy {
    /// Builds the policy selected by `config`.
    #[must_use]
    pub fn from_config(config: &PursuerConfig) -> Self {
        match config.contact {
            ContactMode::Sensor => Self::Precise(ContactDetector::new()),
            ContactMode::Distance => Self::DistanceFallback {
                radius: config.touch_radius,
            },
        }
    }

    /// The sensor, when this policy has one.
    #[must_use]
    pub const fn detector(&self) -> Option<&ContactDetector> {
        match self {
            Self::Precise(detector) => Some(detector),
            Self::DistanceFallback { .. } => None,
        }
    }

    pub(crate) fn detector_mut(&mut self) -> Option<&mut ContactDetector> {
        match self {
            Self::Precise(detector) => Some(detector),
            Self::DistanceFallback { .. } => None,
        }
    }
}
