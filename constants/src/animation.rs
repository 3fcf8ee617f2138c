// Idle float amplitude, free vs. while something is focused.
pub const FLOAT_AMPLITUDE: f32 = 0.5;
pub const FLOAT_AMPLITUDE_FOCUSED: f32 = 0.1;

// Primary shape spin speed, free vs. focused.
pub const SPIN_SPEED: f32 = 0.3;
pub const SPIN_SPEED_FOCUSED: f32 = 0.1;
pub const SPIN_WOBBLE_X: f32 = 0.05;
pub const SPIN_WOBBLE_Z: f32 = 0.02;

/// Focused object scale: `FOCUS_SCALE_BASE + sin(t * FOCUS_SCALE_RATE) * FOCUS_SCALE_PULSE`.
pub const FOCUS_SCALE_BASE: f32 = 1.2;
pub const FOCUS_SCALE_PULSE: f32 = 0.1;
pub const FOCUS_SCALE_RATE: f32 = 2.0;

/// Focused wireframe opacity: `HIGHLIGHT_OPACITY_BASE + sin(t * HIGHLIGHT_RATE) * HIGHLIGHT_OPACITY_PULSE`.
pub const HIGHLIGHT_OPACITY_BASE: f32 = 0.6;
pub const HIGHLIGHT_OPACITY_PULSE: f32 = 0.3;
pub const HIGHLIGHT_RATE: f32 = 4.0;

/// Wireframe opacity of objects that are neither focused nor selected.
pub const IDLE_WIREFRAME_OPACITY: f32 = 0.2;

/// Wireframe opacity of the selected (not focused) object.
pub const SELECTED_WIREFRAME_OPACITY: f32 = 0.45;

pub const PARTICLE_COUNT: usize = 800;
pub const PARTICLE_BOUNDS: [f32; 3] = [120.0, 80.0, 120.0];
pub const PARTICLE_SPEED: f32 = 0.5;
pub const PARTICLE_SPEED_FOCUSED: f32 = 0.1;
pub const PARTICLE_OPACITY: f32 = 0.5;
pub const PARTICLE_OPACITY_FOCUSED: f32 = 0.2;
pub const PARTICLE_FIELD_SPIN: f32 = 0.01;
