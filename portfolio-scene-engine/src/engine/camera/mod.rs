//! Scene camera: projection math and the focus state machine.

/// Free flight and the animated focus transitions.
pub mod controller;

/// Viewport-dependent projection and screen-to-world rays.
pub mod projection;

pub use controller::{CameraController, CameraMode, CameraSettings, FocusTarget, Transition};
pub use projection::{CameraPose, Projection};
