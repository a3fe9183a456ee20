//! Pursuer and coordinator configuration.
//!
//! Both structs deserialise from JSON with every field optional; omitted
//! fields take the values in [`crate::constants`]. Invalid values are never
//! rejected: [`PursuerConfig::sanitized`] and [`CoordinatorConfig::sanitized`]
//! clamp them to safe minimums and log a warning per clamped field.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_APPROACH_OFFSET, DEFAULT_ARRIVAL_EPSILON, DEFAULT_CHASE_SPEED, DEFAULT_CHASE_TIMEOUT,
    DEFAULT_COOLDOWN_BETWEEN_PURSUERS, DEFAULT_GAME_OVER_DELAY, DEFAULT_HIDDEN_OFFSET,
    DEFAULT_MAX_ACTIVE_PURSUERS, DEFAULT_RETREAT_EPSILON, DEFAULT_RETREAT_SPEED,
    DEFAULT_RETREAT_TIMEOUT, DEFAULT_RISE_SPEED, DEFAULT_RISE_TIMEOUT, DEFAULT_TOUCH_RADIUS,
    DEFAULT_TRIGGER_COOLDOWN, DEFAULT_TRIGGER_DISTANCE, MIN_PHASE_TIMEOUT, MIN_SPEED,
    MIN_TOLERANCE,
};
use crate::geometry::BoundaryDirection;
use crate::scenario::ScenarioConfig;

/// How a pursuer detects contact with its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactMode {
    /// A trigger-volume sensor reports enter/exit events.
    #[default]
    Sensor,
    /// No sensor is wired; contact is approximated by `touch_radius`.
    Distance,
}

/// Per-pursuer tuning, fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuerConfig {
    /// Edge that activates this pursuer.
    pub boundary: BoundaryDirection,
    /// Proximity to the edge, in world units, that fires the trigger.
    pub trigger_distance: f32,
    /// Speed while emerging.
    pub rise_speed: f32,
    /// Speed while chasing.
    pub chase_speed: f32,
    /// Speed while retreating.
    pub retreat_speed: f32,
    /// Radius used by the distance contact channel.
    pub touch_radius: f32,
    /// Seconds before an unsuccessful chase is abandoned.
    pub chase_timeout: f32,
    /// Seconds of dormancy after each return to the hidden anchor.
    pub trigger_cooldown: f32,
    /// Hard cap on the emergence phase.
    pub rise_timeout: f32,
    /// Hard cap on the retreat phase.
    pub retreat_timeout: f32,
    /// Arrival tolerance at the active anchor.
    pub arrival_epsilon: f32,
    /// Arrival tolerance at the hidden anchor.
    pub retreat_epsilon: f32,
    /// Distance of the hidden anchor beyond the visible edge.
    pub hidden_offset: f32,
    /// Distance of the active anchor from the target, towards the edge.
    pub approach_offset: f32,
    /// Contact detection channel.
    pub contact: ContactMode,
}

impl Default for PursuerConfig {
    fn default() -> Self {
        Self {
            boundary: BoundaryDirection::default(),
            trigger_distance: DEFAULT_TRIGGER_DISTANCE,
            rise_speed: DEFAULT_RISE_SPEED,
            chase_speed: DEFAULT_CHASE_SPEED,
            retreat_speed: DEFAULT_RETREAT_SPEED,
            touch_radius: DEFAULT_TOUCH_RADIUS,
            chase_timeout: DEFAULT_CHASE_TIMEOUT,
            trigger_cooldown: DEFAULT_TRIGGER_COOLDOWN,
            rise_timeout: DEFAULT_RISE_TIMEOUT,
            retreat_timeout: DEFAULT_RETREAT_TIMEOUT,
            arrival_epsilon: DEFAULT_ARRIVAL_EPSILON,
            retreat_epsilon: DEFAULT_RETREAT_EPSILON,
            hidden_offset: DEFAULT_HIDDEN_OFFSET,
            approach_offset: DEFAULT_APPROACH_OFFSET,
            contact: ContactMode::default(),
        }
    }
}

impl PursuerConfig {
    /// Default configuration bound to `boundary`.
    #[must_use]
    pub fn for_boundary(boundary: BoundaryDirection) -> Self {
        Self {
            boundary,
            ..Self::default()
        }
    }

    /// Returns a copy with every field clamped into its valid range.
    ///
    /// ```
    /// use catcher::config::PursuerConfig;
    /// let config = PursuerConfig { chase_speed: 0.0, trigger_cooldown: -4.0, ..Default::default() };
    /// let clean = config.sanitized();
    /// assert!(clean.chase_speed > 0.0);
    /// assert_eq!(clean.trigger_cooldown, 0.0);
    /// ```
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            boundary: self.boundary,
            trigger_distance: at_least("trigger_distance", self.trigger_distance, 0.0),
            rise_speed: at_least("rise_speed", self.rise_speed, MIN_SPEED),
            chase_speed: at_least("chase_speed", self.chase_speed, MIN_SPEED),
            retreat_speed: at_least("retreat_speed", self.retreat_speed, MIN_SPEED),
            touch_radius: at_least("touch_radius", self.touch_radius, MIN_TOLERANCE),
            chase_timeout: at_least("chase_timeout", self.chase_timeout, 0.0),
            trigger_cooldown: at_least("trigger_cooldown", self.trigger_cooldown, 0.0),
            rise_timeout: at_least("rise_timeout", self.rise_timeout, MIN_PHASE_TIMEOUT),
            retreat_timeout: at_least("retreat_timeout", self.retreat_timeout, MIN_PHASE_TIMEOUT),
            arrival_epsilon: at_least("arrival_epsilon", self.arrival_epsilon, MIN_TOLERANCE),
            retreat_epsilon: at_least("retreat_epsilon", self.retreat_epsilon, MIN_TOLERANCE),
            hidden_offset: at_least("hidden_offset", self.hidden_offset, 0.0),
            approach_offset: at_least("approach_offset", self.approach_offset, 0.0),
            contact: self.contact,
        }
    }
}

/// Session-wide pursuit policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Cap on simultaneously active pursuers when multi-pursuer mode is off.
    pub max_active_pursuers: usize,
    /// Lets several pursuers run their cycles at once.
    pub allow_multiple_pursuers: bool,
    /// Minimum seconds between two trigger events across all pursuers.
    pub cooldown_between_pursuers: f32,
    /// Seconds between a catch and the game-over notification.
    pub game_over_delay: f32,
    /// Stops advancing pursuers once the session is over.
    pub freeze_on_catch: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            max_active_pursuers: DEFAULT_MAX_ACTIVE_PURSUERS,
            allow_multiple_pursuers: false,
            cooldown_between_pursuers: DEFAULT_COOLDOWN_BETWEEN_PURSUERS,
            game_over_delay: DEFAULT_GAME_OVER_DELAY,
            freeze_on_catch: true,
        }
    }
}

impl CoordinatorConfig {
    /// Returns a copy with durations clamped to be non-negative.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            cooldown_between_pursuers: at_least(
                "cooldown_between_pursuers",
                self.cooldown_between_pursuers,
                0.0,
            ),
            game_over_delay: at_least("game_over_delay", self.game_over_delay, 0.0),
            ..self
        }
    }
}

/// Everything the headless simulation needs to build a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Coordinator policy.
    pub coordinator: CoordinatorConfig,
    /// One entry per pursuer, registered in order.
    pub pursuers: Vec<PursuerConfig>,
    /// Target motion and camera geometry.
    pub scenario: ScenarioConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            coordinator: CoordinatorConfig::default(),
            pursuers: BoundaryDirection::ALL
                .into_iter()
                .map(PursuerConfig::for_boundary)
                .collect(),
            scenario: ScenarioConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] when the text is not valid JSON for this
    /// schema.
    ///
    /// # Examples
    /// ```
    /// use catcher::config::SimulationConfig;
    /// let config = SimulationConfig::from_json_str(
    ///     r#"{ "pursuers": [{ "boundary": "top", "chase_timeout": 5.0 }] }"#,
    /// ).expect("valid config");
    /// assert_eq!(config.pursuers.len(), 1);
    /// assert_eq!(config.pursuers[0].chase_timeout, 5.0);
    /// ```
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(ConfigError::Parse)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when its contents are invalid.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let text = fs::read_to_string(path_ref).map_err(|source| ConfigError::Read {
            path: path_ref.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}

/// Failure loading a [`SimulationConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration text was not valid.
    #[error("invalid config: {0}")]
    Parse(#[source] serde_json::Error),
}

fn at_least(field: &str, value: f32, floor: f32) -> f32 {
    if value.is_finite() && value >= floor {
        return value;
    }
    warn!("config field {field} = {value} is invalid; clamping to {floor}");
    floor
}
