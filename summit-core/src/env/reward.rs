use crate::Vec2;

/// Returns the score of a state.
///
/// `-[(x - 1)^2 + (y + 1)^2 - 0.1 sin(5x) 0.1 sin(5y)]`
///
/// The function is total over the plane and finite for finite inputs.
/// Its global maximum lies near `(1, -1)`, slightly perturbed by the
/// oscillatory term.
pub fn reward(s: &Vec2) -> f64 {
    let (x, y) = (s.x, s.y);
    -((x - 1.0).powi(2) + (y + 1.0).powi(2) - 0.1 * (5.0 * x).sin() * 0.1 * (5.0 * y).sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_at_origin() {
        assert_eq!(reward(&Vec2::zeros()), -2.0);
    }

    #[test]
    fn test_reward_near_optimum_beats_origin() {
        assert!(reward(&Vec2::new(1.0, -1.0)) > reward(&Vec2::zeros()));
    }

    #[test]
    fn test_reward_oscillatory_term() {
        let r = reward(&Vec2::new(1.0, -1.0));
        let expected = 0.01 * 5f64.sin() * (-5f64).sin();
        assert!((r - expected).abs() < 1e-12);
    }

    #[test]
    fn test_reward_is_finite_for_finite_inputs() {
        for &x in &[-1e6, -3.5, -1.0, 0.0, 0.25, 1.0, 7.0, 1e6] {
            for &y in &[-1e6, -2.0, -1.0, 0.0, 0.5, 4.0, 1e6] {
                assert!(reward(&Vec2::new(x, y)).is_finite(), "({}, {})", x, y);
            }
        }
    }
}
