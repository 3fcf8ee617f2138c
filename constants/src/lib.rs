//! Tuning constants and lookup tables shared across the workspace.

pub mod animation;
pub mod camera;
pub mod label;
pub mod layout;
pub mod palette;
