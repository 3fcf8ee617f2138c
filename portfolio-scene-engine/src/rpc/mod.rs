//! JSON-RPC 2.0 communication layer for host page integration.
//!
//! Implements bidirectional messaging between the scene and the page that
//! embeds it via iframe `postMessage`, supporting both request-response and
//! notification patterns. Natively the transport is a no-op.
//!
//! ## Message Flow
//!
//! ```text
//! Host page (parent)  <──postMessage──>  Scene (iframe)
//!        │                                     │
//!        ├─ Request (with ID) ───────────────> │
//!        │                                     ├─ Process request
//!        │ <────────────── Response (with ID) ─┤
//!        │                                     │
//!        │ <─────── Notification (no ID) ──────┤
//! ```
//!
//! Requests without an ID still run; they just get no response.
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32600`: Invalid request (unparseable message or wrong version)
//! - `-32601`: Method not found
//! - `-32602`: Invalid params (including unknown item ids)
//! - `-32603`: Internal error (scene not running)
//!
//! ## Methods
//!
//! - `set_items` `{items: [...]}`: replace the displayed items
//! - `focus_item` `{id}`: fly to an item as if it had been clicked
//! - `exit_focus`: return the camera from a focused item
//! - `get_status`: item count, camera mode, control hints, focus overlay
//! - `get_fps`: current frame rate
//! - `teardown`: stop the scene and release everything
//!
//! ## Notifications
//!
//! - `item_selected`: click result, `item` is `null` on a miss
//! - `focus_changed`: camera mode change with the focus item
//! - `scene_status`: sent after rebuilds, mode changes and teardown
//! - `fps_update`: every half second while running
//! - `scene_error`: initialisation failed

/// JSON-RPC 2.0 bidirectional communication system for the host page.
///
/// Handles request-response patterns, notifications, and WASM message listeners.
pub mod web_rpc;
