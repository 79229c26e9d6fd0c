use rand::Rng;
use serde::Serialize;

use crate::constants::{INTENSITY_MAX, WOBBLE_MAX_OFFSET, WOBBLE_MAX_ROTATE};

/// Presentation offsets for the shaking mascot at a given intensity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Wobble {
    pub x: f64,
    pub y: f64,
    pub rotate: f64,
}

impl Wobble {
    pub const REST: Self = Self {
        x: 0.0,
        y: 0.0,
        rotate: 0.0,
    };

    /// Random jitter scaled by intensity. Zero intensity is the rest pose.
    pub fn sample(intensity: f64, rng: &mut impl Rng) -> Self {
        if intensity <= 0.0 {
            return Self::REST;
        }
        let scale = (intensity / INTENSITY_MAX).min(1.0);
        Self {
            x: symmetric(rng) * WOBBLE_MAX_OFFSET * scale,
            y: symmetric(rng) * WOBBLE_MAX_OFFSET * scale,
            rotate: symmetric(rng) * WOBBLE_MAX_ROTATE * scale,
        }
    }
}

/// Uniform in [-1, 1).
fn symmetric(rng: &mut impl Rng) -> f64 {
    (rng.random::<f64>() - 0.5) * 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_rest_pose_at_zero() {
        let mut rng = SmallRng::seed_from_u64(42);
        assert_eq!(Wobble::sample(0.0, &mut rng), Wobble::REST);
    }

    #[test]
    fn test_bounds_scale_with_intensity() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..500 {
            let w = Wobble::sample(100.0, &mut rng);
            assert!(w.x.abs() <= 10.0 && w.y.abs() <= 10.0);
            assert!(w.rotate.abs() <= 7.5);

            let half = Wobble::sample(50.0, &mut rng);
            assert!(half.x.abs() <= 5.0 && half.y.abs() <= 5.0);
            assert!(half.rotate.abs() <= 3.75);
        }
    }
}
