//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration and state transitions
//! for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the app, registers the scene plugin, and spawns the camera,
/// lights and fog once the scene configuration is known.
pub mod app_setup;

/// Application state machine from loading to running, failure or teardown.
pub mod app_state;

/// Platform-specific window configuration and surface checks.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
