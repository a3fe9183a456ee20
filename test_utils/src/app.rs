//! Bevy app builders for plugin tests.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use catcher::config::CoordinatorConfig;
use catcher::pursuit_sync::test_support::install_signal_observers;
use catcher::pursuit_sync::PursuitPlugin;

/// Fixed frame length used by [`pursuit_app`].
pub const FRAME: Duration = Duration::from_millis(50);

/// Headless app running [`PursuitPlugin`] with fixed-length frames and the
/// signal-capturing observers installed.
#[must_use]
pub fn pursuit_app(coordinator: CoordinatorConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
    install_signal_observers(&mut app);
    app.add_plugins(PursuitPlugin::new(coordinator));
    app
}
