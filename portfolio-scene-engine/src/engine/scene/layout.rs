use constants::layout::{LAYOUT_HEIGHT, LAYOUT_JITTER, LAYOUT_RADIUS};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    pub radius: f32,
    pub height: f32,
    pub jitter: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            radius: LAYOUT_RADIUS,
            height: LAYOUT_HEIGHT,
            jitter: LAYOUT_JITTER,
        }
    }
}

/// Position of item `index` out of `count` on a jittered Fibonacci shell.
///
/// X/Z follow the spherical spiral, Y is drawn uniformly over the layout
/// height, so the cloud reads as a loose cylinder rather than a ball.
pub fn scatter_position<R: Rng + ?Sized>(
    index: usize,
    count: usize,
    params: &LayoutParams,
    rng: &mut R,
) -> bevy::math::Vec3 {
    let n = count.max(1) as f32;
    let phi = (-1.0 + 2.0 * index as f32 / n).clamp(-1.0, 1.0).acos();
    let theta = (n * PI).sqrt() * phi;

    let x = params.radius * theta.cos() * phi.sin() + symmetric(rng, params.jitter);
    let z = params.radius * theta.sin() * phi.sin() + symmetric(rng, params.jitter);
    let y = symmetric(rng, params.height * 0.5);

    bevy::math::Vec3::new(x, y, z)
}

fn symmetric<R: Rng + ?Sized>(rng: &mut R, half: f32) -> f32 {
    if half > 0.0 && half.is_finite() {
        rng.gen_range(-half..=half)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn mean_radius(count: usize, seed: u64) -> f32 {
        let mut rng = StdRng::seed_from_u64(seed);
        let params = LayoutParams::default();
        let total: f32 = (0..count)
            .map(|i| scatter_position(i, count, &params, &mut rng).length())
            .sum();
        total / count as f32
    }

    #[test]
    fn positions_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let params = LayoutParams::default();
        let reach = params.radius + params.jitter * 2.0_f32.sqrt();

        for i in 0..300 {
            let p = scatter_position(i, 300, &params, &mut rng);
            assert!(p.is_finite());
            assert!(p.y.abs() <= params.height * 0.5);
            assert!(bevy::math::Vec2::new(p.x, p.z).length() <= reach + 1e-3);
        }
    }

    #[test]
    fn mean_radius_tracks_layout_radius() {
        let r = LayoutParams::default().radius;
        let large = mean_radius(2000, 11);
        let medium = mean_radius(100, 11);

        assert!(large > 0.75 * r && large < 1.05 * r, "mean {large}");
        assert!((large - medium).abs() < 1.0, "{large} vs {medium}");
    }

    #[test]
    fn zero_jitter_is_deterministic() {
        let params = LayoutParams {
            jitter: 0.0,
            height: 0.0,
            ..Default::default()
        };
        let mut a = StdRng::seed_from_u64(1);
        let mut b = StdRng::seed_from_u64(2);
        for i in 0..20 {
            assert_eq!(
                scatter_position(i, 20, &params, &mut a),
                scatter_position(i, 20, &params, &mut b)
            );
        }
    }

    #[test]
    fn single_item_sits_on_axis() {
        let params = LayoutParams {
            jitter: 0.0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let p = scatter_position(0, 1, &params, &mut rng);
        assert!(bevy::math::Vec2::new(p.x, p.z).length() < 1e-3);
    }
}
