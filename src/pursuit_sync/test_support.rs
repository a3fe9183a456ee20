//! Helpers for observing pursuit signals in tests.

use bevy::ecs::prelude::On;
use bevy::prelude::*;

use super::{PursuitGameOver, PursuitSignal};

/// Pursuit notifications captured during a test.
#[derive(Resource, Default, Debug)]
pub struct CapturedSignals {
    /// Every [`PursuitSignal`] in emission order.
    pub signals: Vec<PursuitSignal>,
    /// Number of [`PursuitGameOver`] events seen.
    pub game_overs: usize,
}

impl CapturedSignals {
    /// Forgets everything captured so far.
    pub fn clear(&mut self) {
        self.signals.clear();
        self.game_overs = 0;
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
fn record_signal(event: On<PursuitSignal>, mut captured: ResMut<CapturedSignals>) {
    captured.signals.push(*event.event());
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
fn record_game_over(_event: On<PursuitGameOver>, mut captured: ResMut<CapturedSignals>) {
    captured.game_overs += 1;
}

/// Installs the capturing observers and resource on the provided app.
pub fn install_signal_observers(app: &mut App) {
    app.insert_resource(CapturedSignals::default());
    app.add_observer(record_signal);
    app.add_observer(record_game_over);
}
