//! Headless pursuit scenario.
//!
//! A [`ScriptedTarget`] drifts across a fixed [`VisibleArea`], bouncing off
//! its edges, while a [`PursuitCoordinator`] runs the configured pursuers.
//! There is no physics layer, so [`Simulation`] emulates one: it reports a
//! sensor `enter` when a pursuer comes within its touch radius of the target
//! and an `exit` when it leaves.

use glam::Vec2;
use hashbrown::HashSet;
use log::info;
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::geometry::VisibleArea;
use crate::pursuit::{
    Collaborators, ContactChannel, PursuerId, PursuitCoordinator, PursuitListener, PursuitTarget,
    RetreatReason, TargetId,
};

/// Identity of the scripted target.
pub const SCRIPTED_TARGET: TargetId = TargetId(1);

/// Target motion and camera geometry for the headless run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Centre of the visible area.
    pub view_center: Vec2,
    /// Half the visible width and height.
    pub view_half_extents: Vec2,
    /// Where the target starts.
    pub target_start: Vec2,
    /// Target velocity in world units per second.
    pub target_velocity: Vec2,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            view_center: Vec2::ZERO,
            view_half_extents: Vec2::new(10.0, 5.0),
            target_start: Vec2::ZERO,
            target_velocity: Vec2::new(-2.0, 0.5),
        }
    }
}

impl ScenarioConfig {
    /// The fixed visible area.
    #[must_use]
    pub fn visible_area(&self) -> VisibleArea {
        VisibleArea::from_center(self.view_center, self.view_half_extents)
    }
}

/// Target moving at constant velocity, reflected at the visible edges.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedTarget {
    position: Vec2,
    velocity: Vec2,
    alive: bool,
    caught_by: Option<PursuerId>,
}

impl ScriptedTarget {
    /// A live target at `position`.
    #[must_use]
    pub const fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            alive: true,
            caught_by: None,
        }
    }

    /// Moves the target by `dt`, bouncing off the edges of `area`.
    ///
    /// A caught target stands still.
    pub fn advance(&mut self, dt: f32, area: &VisibleArea) {
        if self.caught_by.is_some() || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let moved = self.position + self.velocity * dt;
        let (min, max) = (area.min(), area.max());
        if moved.x < min.x || moved.x > max.x {
            self.velocity.x = -self.velocity.x;
        }
        if moved.y < min.y || moved.y > max.y {
            self.velocity.y = -self.velocity.y;
        }
        self.position = moved.clamp(min, max);
    }

    /// Marks the target dead or alive.
    pub const fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
    }

    /// Pursuer that caught the target, if any.
    #[must_use]
    pub const fn caught_by(&self) -> Option<PursuerId> {
        self.caught_by
    }
}

impl PursuitTarget for ScriptedTarget {
    fn id(&self) -> TargetId {
        SCRIPTED_TARGET
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn notify_caught(&mut self, by: PursuerId) {
        self.caught_by = Some(by);
    }
}

/// Summary of a headless run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Ticks executed.
    pub ticks: u32,
    /// Simulated seconds.
    pub elapsed: f32,
    /// Pursuit cycles started.
    pub triggers: u32,
    /// Cycles that ended without a catch.
    pub escapes: u32,
    /// Pursuers sent home by mutual exclusion.
    pub forced_hides: u32,
    /// Who caught the target, if anyone.
    pub caught_by: Option<PursuerId>,
    /// Whether the delayed game-over fired.
    pub game_over: bool,
}

/// Listener that logs every notification and tallies it into a report.
#[derive(Debug, Default)]
struct Tally {
    report: SimulationReport,
}

impl PursuitListener for Tally {
    fn on_triggered(&mut self, pursuer: PursuerId, active_position: Vec2) {
        info!("pursuer {pursuer} triggered towards {active_position}");
        self.report.triggers += 1;
    }

    fn on_chasing(&mut self, pursuer: PursuerId) {
        info!("pursuer {pursuer} chasing");
    }

    fn on_retreating(&mut self, pursuer: PursuerId, reason: RetreatReason) {
        info!("pursuer {pursuer} retreating ({reason:?})");
    }

    fn on_hidden(&mut self, pursuer: PursuerId) {
        info!("pursuer {pursuer} hidden");
        self.report.forced_hides += 1;
    }

    // A completed cycle reports `on_hidden` first; take it back off the
    // forced count.
    fn on_escaped(&mut self, pursuer: PursuerId) {
        info!("pursuer {pursuer}: target escaped");
        self.report.forced_hides = self.report.forced_hides.saturating_sub(1);
        self.report.escapes += 1;
    }

    fn on_caught(&mut self, pursuer: PursuerId, channel: ContactChannel) {
        info!("pursuer {pursuer} caught the target ({channel:?})");
        self.report.caught_by = Some(pursuer);
    }

    fn on_game_over(&mut self) {
        info!("game over");
        self.report.game_over = true;
    }
}

/// A coordinator, its target and the emulated sensor layer.
#[derive(Debug)]
pub struct Simulation {
    coordinator: PursuitCoordinator,
    target: ScriptedTarget,
    area: VisibleArea,
    touching: HashSet<PursuerId>,
    tally: Tally,
}

impl Simulation {
    /// Builds a simulation from `config`, registering pursuers in order.
    #[must_use]
    pub fn new(config: &SimulationConfig) -> Self {
        let mut coordinator = PursuitCoordinator::new(config.coordinator.clone());
        for pursuer in &config.pursuers {
            coordinator.register_config(pursuer.clone());
        }
        let scenario = &config.scenario;
        Self {
            coordinator,
            target: ScriptedTarget::new(scenario.target_start, scenario.target_velocity),
            area: scenario.visible_area(),
            touching: HashSet::new(),
            tally: Tally::default(),
        }
    }

    /// Advances the world by one tick.
    pub fn step(&mut self, dt: f32) {
        self.target.advance(dt, &self.area);
        self.sense_contacts();
        let mut collaborators =
            Collaborators::new(Some(&mut self.target), &self.area, &mut self.tally);
        self.coordinator.tick(dt, &mut collaborators);
        self.tally.report.ticks += 1;
        self.tally.report.elapsed += dt;
    }

    /// Runs up to `ticks` steps, stopping early once the game is over.
    pub fn run(&mut self, ticks: u32, dt: f32) -> &SimulationReport {
        for _ in 0..ticks {
            if self.tally.report.game_over {
                break;
            }
            self.step(dt);
        }
        &self.tally.report
    }

    /// The coordinator under test.
    #[must_use]
    pub const fn coordinator(&self) -> &PursuitCoordinator {
        &self.coordinator
    }

    /// The scripted target.
    #[must_use]
    pub const fn target(&self) -> &ScriptedTarget {
        &self.target
    }

    /// Mutable access to the scripted target.
    pub const fn target_mut(&mut self) -> &mut ScriptedTarget {
        &mut self.target
    }

    /// Tallies so far.
    #[must_use]
    pub const fn report(&self) -> &SimulationReport {
        &self.tally.report
    }

    // Stands in for a physics trigger volume around each sensor-equipped
    // pursuer.
    fn sense_contacts(&mut self) {
        let overlaps: Vec<(PursuerId, bool)> = self
            .coordinator
            .pursuers()
            .filter(|machine| machine.contact_policy().detector().is_some())
            .map(|machine| {
                let reach = machine.config().touch_radius;
                let inside = machine.position().distance(self.target.position()) <= reach;
                (machine.id(), inside)
            })
            .collect();

        for (id, inside) in overlaps {
            let was_inside = self.touching.contains(&id);
            if inside == was_inside {
                continue;
            }
            let routed = if inside {
                self.touching.insert(id);
                let mut collaborators =
                    Collaborators::new(Some(&mut self.target), &self.area, &mut self.tally);
                self.coordinator
                    .report_contact_enter(id, SCRIPTED_TARGET, &mut collaborators)
                    .map(|_event| ())
            } else {
                self.touching.remove(&id);
                self.coordinator
                    .report_contact_exit(id, SCRIPTED_TARGET)
                    .map(|_cleared| ())
            };
            if let Err(error) = routed {
                log::warn!("emulated sensor: {error}");
            }
        }
    }
}
