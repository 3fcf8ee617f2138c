/// Radial spread of the item shell in world units.
pub const LAYOUT_RADIUS: f32 = 15.0;

/// Total vertical spread; positions fall within ±`LAYOUT_HEIGHT / 2`.
pub const LAYOUT_HEIGHT: f32 = 20.0;

/// Half-width of the uniform jitter applied on the X and Z axes.
pub const LAYOUT_JITTER: f32 = 4.0;

// Base primitive dimensions before the size multiplier is applied.
pub const SPHERE_RADIUS: f32 = 1.2;
pub const BOX_SIZE: [f32; 3] = [1.8, 1.2, 0.3];
pub const PLANE_SIZE: [f32; 2] = [2.0, 1.5];
pub const CYLINDER_RADIUS: f32 = 0.8;
pub const CYLINDER_HEIGHT: f32 = 1.5;
pub const PROJECT_CUBE_SIZE: f32 = 1.6;
pub const SKILL_SPHERE_RADIUS: f32 = 0.7;

/// Size hint multipliers (small, medium, large).
pub const SIZE_SMALL: f32 = 0.8;
pub const SIZE_MEDIUM: f32 = 1.0;
pub const SIZE_LARGE: f32 = 1.4;

/// Idle float speed is drawn from `FLOAT_SPEED_MIN..FLOAT_SPEED_MIN + FLOAT_SPEED_RANGE`.
pub const FLOAT_SPEED_MIN: f32 = 0.3;
pub const FLOAT_SPEED_RANGE: f32 = 0.3;

// Material opacity per primitive family.
pub const OPACITY_ROUND: f32 = 0.8;
pub const OPACITY_BOX: f32 = 0.85;
pub const OPACITY_PLANE: f32 = 0.9;

/// Thickness given to flat planes when they are hit-tested as a slab.
pub const PLANE_PICK_THICKNESS: f32 = 0.02;
