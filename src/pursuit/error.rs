//! Error types for the pursuit core.

use thiserror::Error;

use super::PursuerId;

/// Misuse of the coordinator API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PursuitError {
    /// A call named a pursuer that is not registered.
    #[error("no pursuer registered as {0}")]
    UnknownPursuer(PursuerId),
}

/// External reference whose absence keeps a pursuer inert.
///
/// Never returned from a tick; machines log it once when it appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MissingReference {
    /// No target, or a target with a non-finite position.
    #[error("no pursuable target")]
    Target,
    /// No visible area, or one with non-finite corners.
    #[error("no boundary geometry")]
    Viewport,
}
