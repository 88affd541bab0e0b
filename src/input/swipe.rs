//! Completed gesture values delivered to observers

use serde::Serialize;
use std::f64::consts::{FRAC_PI_4, PI, TAU};

/// Angle reported for a click/tap/activate (no direction)
pub const CLICK_ANGLE: f64 = f64::INFINITY;

/// Coordinate reported when the gesture has no screen position
pub const UNKNOWN_POSITION: f64 = f64::INFINITY;

/// Cardinal direction of a swipe, in screen coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl SwipeDirection {
    /// Nearest cardinal direction for an angle in radians.
    /// Exact diagonals resolve toward the horizontal axis.
    pub fn from_angle(angle: f64) -> Option<Self> {
        if !angle.is_finite() {
            return None;
        }
        let a = if (-PI..=PI).contains(&angle) {
            angle
        } else {
            (angle + PI).rem_euclid(TAU) - PI
        };
        let abs = a.abs();
        Some(if abs <= FRAC_PI_4 {
            SwipeDirection::Right
        } else if abs >= 3.0 * FRAC_PI_4 {
            SwipeDirection::Left
        } else if a > 0.0 {
            SwipeDirection::Down
        } else {
            SwipeDirection::Up
        })
    }
}

/// One completed gesture
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SwipeData {
    /// Radians, `atan2(dy, dx)`; [`CLICK_ANGLE`] for clicks
    pub angle: f64,
    /// Milliseconds between press and release
    pub duration: u64,
    /// Release x, or [`UNKNOWN_POSITION`]
    pub x: f64,
    /// Release y, or [`UNKNOWN_POSITION`]
    pub y: f64,
}

impl SwipeData {
    pub fn is_click(&self) -> bool {
        self.angle == CLICK_ANGLE
    }

    pub fn direction_angle(&self) -> Option<f64> {
        if self.is_click() {
            None
        } else {
            Some(self.angle)
        }
    }

    pub fn direction(&self) -> Option<SwipeDirection> {
        SwipeDirection::from_angle(self.angle)
    }

    pub fn position(&self) -> Option<(f64, f64)> {
        if self.x.is_finite() && self.y.is_finite() {
            Some((self.x, self.y))
        } else {
            None
        }
    }
}

/// JSON-friendly form of [`SwipeData`]: sentinels become `null`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SwipeRecord {
    pub angle: Option<f64>,
    pub direction: Option<SwipeDirection>,
    pub duration: u64,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl From<SwipeData> for SwipeRecord {
    fn from(swipe: SwipeData) -> Self {
        let position = swipe.position();
        Self {
            angle: swipe.direction_angle(),
            direction: swipe.direction(),
            duration: swipe.duration,
            x: position.map(|p| p.0),
            y: position.map(|p| p.1),
        }
    }
}
