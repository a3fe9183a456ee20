//! Buffered sensor reports awaiting the next pursuit step.

use bevy::prelude::*;

/// Whether a sensor report starts or ends an overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactPhase {
    /// The overlap began.
    Enter,
    /// The overlap ended.
    Exit,
}

/// Overlap reported by a pursuer's trigger volume.
///
/// Hosts trigger this from their collision layer; the plugin buffers it and
/// hands it to the coordinator at the start of the next pursuit step.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactReport {
    /// Pursuer entity whose sensor fired.
    pub pursuer: Entity,
    /// Entity overlapping the sensor.
    pub other: Entity,
    /// Start or end of the overlap.
    pub phase: ContactPhase,
}

impl ContactReport {
    /// An `enter` report.
    #[must_use]
    pub const fn enter(pursuer: Entity, other: Entity) -> Self {
        Self {
            pursuer,
            other,
            phase: ContactPhase::Enter,
        }
    }

    /// An `exit` report.
    #[must_use]
    pub const fn exit(pursuer: Entity, other: Entity) -> Self {
        Self {
            pursuer,
            other,
            phase: ContactPhase::Exit,
        }
    }
}

/// Reports buffered between pursuit steps, in arrival order.
#[derive(Resource, Default, Debug)]
pub struct ContactInbox {
    reports: Vec<ContactReport>,
}

impl ContactInbox {
    /// Buffers one report.
    pub fn push(&mut self, report: ContactReport) {
        self.reports.push(report);
    }

    /// Buffers several reports.
    pub fn extend<I>(&mut self, reports: I)
    where
        I: IntoIterator<Item = ContactReport>,
    {
        self.reports.extend(reports);
    }

    /// Takes every buffered report.
    pub fn drain(&mut self) -> std::vec::Drain<'_, ContactReport> {
        self.reports.drain(..)
    }

    /// Whether nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Number of buffered reports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.len()
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
pub(super) fn buffer_contact_report(event: On<ContactReport>, mut inbox: ResMut<ContactInbox>) {
    inbox.push(*event.event());
}
