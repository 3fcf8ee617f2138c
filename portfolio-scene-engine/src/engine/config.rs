use crate::engine::camera::CameraSettings;
use crate::engine::error::SceneError;
use crate::engine::scene::layout::LayoutParams;
use bevy::math::Vec3;
use bevy::prelude::{Asset, Resource};
use bevy::reflect::TypePath;
use constants::animation::*;
use serde::{Deserialize, Serialize};

/// Tunables for the whole scene, loadable from a `*.scene.json` asset.
/// Every field falls back to the workspace constants when omitted.
#[derive(Asset, TypePath, Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub layout: LayoutParams,
    pub camera: CameraSettings,
    pub animation: AnimationSettings,
    pub particles: ParticleSettings,
    pub lighting: LightingSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    pub float_amplitude: f32,
    pub float_amplitude_focused: f32,
    pub spin_speed: f32,
    pub spin_speed_focused: f32,
    pub focus_scale_base: f32,
    pub focus_scale_pulse: f32,
    pub highlight_opacity_base: f32,
    pub highlight_opacity_pulse: f32,
    pub idle_wireframe_opacity: f32,
    pub selected_wireframe_opacity: f32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            float_amplitude: FLOAT_AMPLITUDE,
            float_amplitude_focused: FLOAT_AMPLITUDE_FOCUSED,
            spin_speed: SPIN_SPEED,
            spin_speed_focused: SPIN_SPEED_FOCUSED,
            focus_scale_base: FOCUS_SCALE_BASE,
            focus_scale_pulse: FOCUS_SCALE_PULSE,
            highlight_opacity_base: HIGHLIGHT_OPACITY_BASE,
            highlight_opacity_pulse: HIGHLIGHT_OPACITY_PULSE,
            idle_wireframe_opacity: IDLE_WIREFRAME_OPACITY,
            selected_wireframe_opacity: SELECTED_WIREFRAME_OPACITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSettings {
    pub count: usize,
    pub bounds: Vec3,
    pub speed: f32,
    pub speed_focused: f32,
    pub opacity: f32,
    pub opacity_focused: f32,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            count: PARTICLE_COUNT,
            bounds: Vec3::from(PARTICLE_BOUNDS),
            speed: PARTICLE_SPEED,
            speed_focused: PARTICLE_SPEED_FOCUSED,
            opacity: PARTICLE_OPACITY,
            opacity_focused: PARTICLE_OPACITY_FOCUSED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLightSettings {
    pub position: Vec3,
    pub color: u32,
    /// Luminous power in lumens.
    pub intensity: f32,
    pub range: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingSettings {
    pub ambient_color: u32,
    pub ambient_brightness: f32,
    pub directional_illuminance: f32,
    pub directional_position: Vec3,
    pub point_lights: Vec<PointLightSettings>,
    pub fog_color: u32,
    pub fog_start: f32,
    pub fog_end: f32,
}

impl Default for LightingSettings {
    fn default() -> Self {
        let point = |position: [f32; 3], color: u32, intensity: f32| PointLightSettings {
            position: Vec3::from(position),
            color,
            intensity,
            range: 50.0,
        };

        Self {
            ambient_color: 0x404040,
            ambient_brightness: 400.0,
            directional_illuminance: 4_000.0,
            directional_position: Vec3::new(20.0, 20.0, 10.0),
            point_lights: vec![
                point([-20.0, 10.0, 20.0], 0x64ffda, 400_000.0),
                point([20.0, -10.0, -20.0], 0xff6b6b, 300_000.0),
                point([0.0, 20.0, 0.0], 0x4ecdc4, 300_000.0),
                point([-10.0, -20.0, 10.0], 0x9d4edd, 200_000.0),
            ],
            fog_color: 0x000000,
            fog_start: 20.0,
            fog_end: 100.0,
        }
    }
}

impl SceneConfig {
    /// Reject settings that would make layout, motion or transitions
    /// meaningless.
    pub fn validate(&self) -> Result<(), SceneError> {
        let positive = [
            ("layout.radius", self.layout.radius),
            ("camera.fov_degrees", self.camera.fov_degrees),
            ("camera.standoff", self.camera.standoff),
            ("camera.enter_secs", self.camera.enter_secs),
            ("camera.exit_secs", self.camera.exit_secs),
            ("camera.fly_speed", self.camera.fly_speed),
            ("camera.boost", self.camera.boost),
            ("camera.look_sensitivity", self.camera.look_sensitivity),
            ("camera.pitch_limit_degrees", self.camera.pitch_limit_degrees),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SceneError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("layout.height", self.layout.height),
            ("layout.jitter", self.layout.jitter),
            ("particles.speed", self.particles.speed),
            ("particles.speed_focused", self.particles.speed_focused),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SceneError::InvalidConfig(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }

        if self.camera.fov_degrees >= 180.0 {
            return Err(SceneError::InvalidConfig(format!(
                "camera.fov_degrees must be below 180, got {}",
                self.camera.fov_degrees
            )));
        }
        if self.camera.pitch_limit_degrees > 90.0 {
            return Err(SceneError::InvalidConfig(format!(
                "camera.pitch_limit_degrees must be at most 90, got {}",
                self.camera.pitch_limit_degrees
            )));
        }
        if !self.particles.bounds.is_finite() || self.particles.bounds.min_element() < 0.0 {
            return Err(SceneError::InvalidConfig(
                "particles.bounds must be finite and non-negative".to_string(),
            ));
        }
        if self.lighting.fog_end < self.lighting.fog_start {
            return Err(SceneError::InvalidConfig(format!(
                "fog range {}..{} is inverted",
                self.lighting.fog_start, self.lighting.fog_end
            )));
        }

        Ok(())
    }
}
