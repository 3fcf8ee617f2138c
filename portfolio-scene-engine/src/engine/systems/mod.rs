//! Runtime systems connecting the scene state to Bevy.
//!
//! Input is gathered into scene events, the scene is advanced once per
//! frame, and the resulting poses and notifications are pushed out to
//! entities, UI and the host page.

/// FPS tracking and notification systems for performance monitoring.
///
/// Sends frame rate updates to the host page via RPC and updates the native overlay.
pub mod fps_tracking;

/// Native heads-up display: item counter, control hints and focus panel.
#[cfg(not(target_arch = "wasm32"))]
pub mod hud;

/// Translation of Bevy mouse, keyboard and window events into scene input.
pub mod input_bridge;

/// Screen-space item labels pinned above their objects.
pub mod labels;

/// Entity spawning on rebuild and per-frame pose, material and particle updates.
pub mod scene_sync;

/// Scene resource, frame tick and outbound event forwarding.
pub mod scene_tick;

/// Scene shutdown on request.
pub mod teardown;
