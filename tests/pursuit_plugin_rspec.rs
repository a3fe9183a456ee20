//! Behavioural test: `PursuitPlugin` runs a full pursuit cycle inside a Bevy
//! app, from trigger through catch, game over and reset.
//!
//! The steps share one app and run in order, so each `when` block advances
//! the world once in `before_all` and its `then` blocks only inspect it.

#[path = "support/thread_safe_app.rs"]
mod thread_safe_app;

#[path = "support/rspec_runner.rs"]
mod rspec_runner;

use std::sync::MutexGuard;

use bevy::prelude::*;
use catcher::config::{CoordinatorConfig, PursuerConfig};
use catcher::geometry::BoundaryDirection;
use catcher::pursuit::PursuitState;
use catcher::pursuit_sync::test_support::CapturedSignals;
use catcher::pursuit_sync::{
    CaughtBy, ContactReport, Pursuer, PursuitCamera, PursuitSession, PursuitSignalKind,
    PursuitStatus, Quarry, ResetPursuit,
};
use rspec::block::Context as Scenario;
use rspec_runner::run_serial;
use test_utils::app::pursuit_app;
use thread_safe_app::{lock_app, share, SharedApp, ThreadSafeApp};

/// One camera, one quarry near the left edge and one left-edge pursuer.
#[derive(Debug, Clone)]
struct PursuitFixture {
    app: SharedApp,
    pursuer: Entity,
    quarry: Entity,
}

impl PursuitFixture {
    fn bootstrap() -> Self {
        let mut app = pursuit_app(CoordinatorConfig {
            game_over_delay: 0.5,
            ..CoordinatorConfig::default()
        });
        let world = app.world_mut();
        world.spawn(PursuitCamera {
            half_extents: Vec2::new(10.0, 5.0),
        });
        let quarry = world
            .spawn((Quarry::default(), Transform::from_xyz(-9.5, 0.0, 0.0)))
            .id();
        let pursuer = world
            .spawn(Pursuer::new(PursuerConfig::for_boundary(
                BoundaryDirection::Left,
            )))
            .id();
        Self {
            app: share(app),
            pursuer,
            quarry,
        }
    }

    fn app_guard(&self) -> MutexGuard<'_, ThreadSafeApp> {
        lock_app(&self.app)
    }

    fn run(&self, frames: usize) {
        let mut app = self.app_guard();
        for _ in 0..frames {
            app.update();
        }
    }

    fn state(&self) -> Option<PursuitState> {
        let app = self.app_guard();
        app.world()
            .get::<PursuitStatus>(self.pursuer)
            .map(|status| status.state)
    }

    fn signal_kinds(&self) -> Vec<PursuitSignalKind> {
        let app = self.app_guard();
        app.world()
            .resource::<CapturedSignals>()
            .signals
            .iter()
            .filter(|signal| signal.pursuer == self.pursuer)
            .map(|signal| signal.kind)
            .collect()
    }

    fn game_overs(&self) -> usize {
        let app = self.app_guard();
        app.world().resource::<CapturedSignals>().game_overs
    }

    fn caught_by(&self) -> Option<CaughtBy> {
        let app = self.app_guard();
        app.world().get::<CaughtBy>(self.quarry).copied()
    }

    fn session_over(&self) -> bool {
        let app = self.app_guard();
        app.world()
            .resource::<PursuitSession>()
            .coordinator()
            .is_session_over()
    }

    fn virtual_time_paused(&self) -> bool {
        let app = self.app_guard();
        app.world().resource::<Time<Virtual>>().is_paused()
    }

    fn touch(&self) {
        let mut app = self.app_guard();
        app.world_mut()
            .trigger(ContactReport::enter(self.pursuer, self.quarry));
        app.update();
    }

    fn reset_with_quarry_at_centre(&self) {
        let mut app = self.app_guard();
        let world = app.world_mut();
        if let Some(mut transform) = world.get_mut::<Transform>(self.quarry) {
            transform.translation = Vec3::ZERO;
        }
        world.trigger(ResetPursuit);
        app.update();
    }
}

#[test]
fn pursuit_plugin_runs_a_full_cycle() {
    let fixture = PursuitFixture::bootstrap();

    run_serial(&rspec::given(
        "a left-edge pursuer and a quarry near the left edge",
        fixture,
        |scenario: &mut Scenario<PursuitFixture>| {
            scenario.when("one second of frames passes", |ctx| {
                ctx.before_all(|state| state.run(20));

                ctx.then("the pursuer is chasing", |state| {
                    assert_eq!(state.state(), Some(PursuitState::Chasing));
                });

                ctx.then("trigger and chase signals were raised in order", |state| {
                    let kinds = state.signal_kinds();
                    assert!(matches!(
                        kinds.as_slice(),
                        [
                            PursuitSignalKind::Triggered { .. },
                            PursuitSignalKind::Chasing
                        ]
                    ));
                });
            });

            scenario.when("the pursuer's sensor touches the quarry", |ctx| {
                ctx.before_all(|state| state.touch());

                ctx.then("the quarry records who caught it", |state| {
                    assert_eq!(state.caught_by(), Some(CaughtBy(state.pursuer)));
                });

                ctx.then("the pursuer holds Success and the session is over", |state| {
                    assert_eq!(state.state(), Some(PursuitState::Success));
                    assert!(state.session_over());
                });

                ctx.then("game over has not fired yet", |state| {
                    assert_eq!(state.game_overs(), 0);
                });

                ctx.then("virtual time is paused", |state| {
                    assert!(state.virtual_time_paused());
                });
            });

            scenario.when("the game-over delay elapses in real time", |ctx| {
                ctx.before_all(|state| state.run(30));

                ctx.then("game over fires exactly once", |state| {
                    assert_eq!(state.game_overs(), 1);
                });
            });

            scenario.when("a reset is requested", |ctx| {
                ctx.before_all(|state| state.reset_with_quarry_at_centre());

                ctx.then("the pursuer is hidden again", |state| {
                    assert_eq!(state.state(), Some(PursuitState::Hidden));
                });

                ctx.then("the session reopens and the catch marker is gone", |state| {
                    assert!(!state.session_over());
                    assert_eq!(state.caught_by(), None);
                });

                ctx.then("virtual time runs again", |state| {
                    assert!(!state.virtual_time_paused());
                });
            });
        },
    ));
}
