//! Two-dimensional real vector used as state, observation and action.
use serde::{Deserialize, Serialize};
use std::ops::Add;

/// An ordered pair of real numbers `(x, y)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// First coordinate.
    pub x: f64,

    /// Second coordinate.
    pub y: f64,
}

impl Vec2 {
    /// Constructs a vector.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin `(0, 0)`.
    pub const fn zeros() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Returns `true` if both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl From<[f64; 2]> for Vec2 {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<Vec2> for [f64; 2] {
    fn from(v: Vec2) -> Self {
        [v.x, v.y]
    }
}

/// Used to feed observations into neural networks.
impl From<Vec2> for Vec<f32> {
    fn from(v: Vec2) -> Self {
        vec![v.x as f32, v.y as f32]
    }
}

/// Used to turn network outputs into actions.
impl From<Vec<f32>> for Vec2 {
    fn from(v: Vec<f32>) -> Self {
        debug_assert_eq!(v.len(), 2);
        Self::new(v[0] as f64, v[1] as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_element_wise() {
        assert_eq!(Vec2::new(2.0, 3.0) + Vec2::new(-1.0, -1.0), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_non_finite() {
        assert!(Vec2::zeros().is_finite());
        assert!(!Vec2::new(f64::NAN, 0.0).is_finite());
        assert!(!Vec2::new(0.0, f64::INFINITY).is_finite());
    }
}
