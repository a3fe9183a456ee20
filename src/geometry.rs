//! Screen-edge geometry used to place and trigger pursuers.
//!
//! A [`VisibleArea`] is the world-space rectangle the camera currently shows.
//! Each pursuer is bound to one [`BoundaryDirection`]; the helpers here
//! measure how close the target is to that edge and derive the hidden anchor
//! (just outside the edge) and the active anchor (beside the target, on the
//! approach side).
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Screen edge a pursuer is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryDirection {
    /// The edge with the smallest x coordinate.
    #[default]
    Left,
    /// The edge with the largest x coordinate.
    Right,
    /// The edge with the largest y coordinate.
    Top,
    /// The edge with the smallest y coordinate.
    Bottom,
}

impl BoundaryDirection {
    /// Every direction, in declaration order.
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Top, Self::Bottom];

    /// Unit vector pointing out of the visible area through this edge.
    ///
    /// ```
    /// use catcher::geometry::BoundaryDirection;
    /// use glam::Vec2;
    /// assert_eq!(BoundaryDirection::Top.outward(), Vec2::Y);
    /// ```
    #[must_use]
    pub const fn outward(self) -> Vec2 {
        match self {
            Self::Left => Vec2::NEG_X,
            Self::Right => Vec2::X,
            Self::Top => Vec2::Y,
            Self::Bottom => Vec2::NEG_Y,
        }
    }

    /// The coordinate of `point` running parallel to this edge.
    #[must_use]
    pub const fn along(self, point: Vec2) -> f32 {
        match self {
            Self::Left | Self::Right => point.y,
            Self::Top | Self::Bottom => point.x,
        }
    }
}

/// Axis-aligned world rectangle currently visible to the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibleArea {
    min: Vec2,
    max: Vec2,
}

impl VisibleArea {
    /// Builds an area from two opposite corners in any order.
    #[must_use]
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Builds an area from a camera position and orthographic half extents.
    ///
    /// ```
    /// use catcher::geometry::VisibleArea;
    /// use glam::Vec2;
    /// let area = VisibleArea::from_center(Vec2::new(1.0, 1.0), Vec2::new(8.0, 4.5));
    /// assert_eq!(area.min(), Vec2::new(-7.0, -3.5));
    /// assert_eq!(area.max(), Vec2::new(9.0, 5.5));
    /// ```
    #[must_use]
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        let half = half_extents.abs();
        Self::new(center - half, center + half)
    }

    /// Lower-left corner.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Upper-right corner.
    #[must_use]
    pub const fn max(&self) -> Vec2 {
        self.max
    }

    /// Whether both corners are finite. Non-finite areas are treated as absent.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Signed distance from `point` to `edge`, positive while inside the area.
    ///
    /// ```
    /// use catcher::geometry::{BoundaryDirection, VisibleArea};
    /// use glam::Vec2;
    /// let area = VisibleArea::new(Vec2::new(-10.0, -5.0), Vec2::new(10.0, 5.0));
    /// let d = area.distance_to_edge(BoundaryDirection::Left, Vec2::new(-9.5, 0.0));
    /// assert!((d - 0.5).abs() < 1e-6);
    /// ```
    #[must_use]
    pub fn distance_to_edge(&self, edge: BoundaryDirection, point: Vec2) -> f32 {
        match edge {
            BoundaryDirection::Left => point.x - self.min.x,
            BoundaryDirection::Right => self.max.x - point.x,
            BoundaryDirection::Top => self.max.y - point.y,
            BoundaryDirection::Bottom => point.y - self.min.y,
        }
    }

    /// Point `offset` units outside `edge`, level with `along` clamped to the
    /// edge's span.
    #[must_use]
    pub fn hidden_anchor(&self, edge: BoundaryDirection, along: f32, offset: f32) -> Vec2 {
        let outset = offset.max(0.0);
        match edge {
            BoundaryDirection::Left => {
                Vec2::new(self.min.x - outset, clamp_span(along, self.min.y, self.max.y))
            }
            BoundaryDirection::Right => {
                Vec2::new(self.max.x + outset, clamp_span(along, self.min.y, self.max.y))
            }
            BoundaryDirection::Top => {
                Vec2::new(clamp_span(along, self.min.x, self.max.x), self.max.y + outset)
            }
            BoundaryDirection::Bottom => {
                Vec2::new(clamp_span(along, self.min.x, self.max.x), self.min.y - outset)
            }
        }
    }
}

/// Point beside `target`, `offset` units towards the side the pursuer enters from.
#[must_use]
pub fn active_anchor(edge: BoundaryDirection, target: Vec2, offset: f32) -> Vec2 {
    target + edge.outward() * offset.max(0.0)
}

// `f32::clamp` asserts on inverted bounds; the area constructor already orders
// them, so this only has to tolerate NaN input.
fn clamp_span(value: f32, lo: f32, hi: f32) -> f32 {
    if value.is_nan() {
        return lo + (hi - lo) * 0.5;
    }
    value.max(lo).min(hi)
}
