/// Vertical field of view of the scene camera.
pub const FOV_DEGREES: f32 = 75.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 1000.0;

/// Camera position at scene start.
pub const START_POSITION: [f32; 3] = [0.0, 0.0, 20.0];

/// Distance at which the camera parks in front of a focused object.
pub const STANDOFF_DISTANCE: f32 = 8.0;

/// Duration of the fly-in transition towards a focused object.
pub const FOCUS_ENTER_SECS: f32 = 1.5;

/// Duration of the fly-back transition to the saved position.
pub const FOCUS_EXIT_SECS: f32 = 1.0;

/// Free-flight speed in world units per second.
pub const FLY_SPEED: f32 = 12.0;

/// Speed multiplier while the boost modifier is held.
pub const FLY_BOOST: f32 = 2.5;

/// Radians of yaw/pitch per pixel of pointer drag.
pub const LOOK_SENSITIVITY: f32 = 0.002;

/// Pitch clamp in degrees, both directions.
pub const PITCH_LIMIT_DEGREES: f32 = 90.0;

/// Pointer travel in pixels above which a press/release is a drag, not a click.
pub const CLICK_DRAG_TOLERANCE_PX: f32 = 5.0;

/// Largest frame delta fed into motion, in seconds.
pub const MAX_FRAME_DELTA: f32 = 0.1;
