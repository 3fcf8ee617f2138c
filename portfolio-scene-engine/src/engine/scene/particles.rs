use bevy::color::Color;
use bevy::math::{Quat, Vec3};
use constants::animation::PARTICLE_FIELD_SPIN;
use rand::Rng;

/// Per-particle drift magnitude at 60 frames per second.
const DRIFT: f32 = 0.01;

/// Ambient dust cloud surrounding the items.
#[derive(Debug, Clone)]
pub struct ParticleField {
    pub positions: Vec<Vec3>,
    drift: Vec<Vec3>,
    pub colors: Vec<[f32; 4]>,
    pub bounds: Vec3,
    /// Whole-field spin around Y.
    pub rotation: Quat,
    pub opacity: f32,
}

impl ParticleField {
    pub fn scatter<R: Rng + ?Sized>(count: usize, bounds: Vec3, rng: &mut R) -> Self {
        let half = bounds * 0.5;
        let mut positions = Vec::with_capacity(count);
        let mut drift = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);

        for _ in 0..count {
            positions.push(Vec3::new(
                spread(rng, half.x),
                spread(rng, half.y),
                spread(rng, half.z),
            ));
            drift.push(Vec3::new(
                spread(rng, DRIFT),
                spread(rng, DRIFT),
                spread(rng, DRIFT),
            ));

            let hue = rng.gen_range(0.5..0.9) * 360.0;
            let c = Color::hsl(hue, 0.6, 0.3).to_srgba();
            colors.push([c.red, c.green, c.blue, 1.0]);
        }

        Self {
            positions,
            drift,
            colors,
            bounds,
            rotation: Quat::IDENTITY,
            opacity: constants::animation::PARTICLE_OPACITY,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Drift every particle, wrapping at the bounds, and spin the field.
    pub fn advance(&mut self, elapsed: f32, dt: f32, speed: f32, opacity: f32) {
        let step = speed * dt * 60.0;
        let half = self.bounds * 0.5;

        for (pos, drift) in self.positions.iter_mut().zip(&self.drift) {
            *pos += *drift * step;
            pos.x = wrap(pos.x, half.x);
            pos.y = wrap(pos.y, half.y);
            pos.z = wrap(pos.z, half.z);
        }

        self.rotation = Quat::from_rotation_y(elapsed * PARTICLE_FIELD_SPIN * speed);
        self.opacity = opacity;
    }
}

fn spread<R: Rng + ?Sized>(rng: &mut R, half: f32) -> f32 {
    if half > 0.0 {
        rng.gen_range(-half..=half)
    } else {
        0.0
    }
}

fn wrap(v: f32, half: f32) -> f32 {
    if half <= 0.0 {
        return 0.0;
    }
    (v + half).rem_euclid(half * 2.0) - half
}
