use crate::engine::camera::CameraMode;
use crate::engine::items::DisplayItem;
use bevy::prelude::Event;
use serde::Serialize;

/// Outbound notification produced by a frame update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneEvent {
    /// Result of a click: the picked item, or `None` on a miss.
    Selected { item: Option<DisplayItem> },
    /// The camera changed mode. `item` is the focus target, `None` once
    /// the camera is free again.
    FocusChanged {
        item: Option<DisplayItem>,
        state: CameraMode,
    },
}

impl SceneEvent {
    /// JSON-RPC notification method the host page listens for.
    pub fn rpc_method(&self) -> &'static str {
        match self {
            SceneEvent::Selected { .. } => "item_selected",
            SceneEvent::FocusChanged { .. } => "focus_changed",
        }
    }
}

/// A click resolved to an item, or to nothing.
#[derive(Event, Debug, Clone)]
pub struct ItemSelected(pub Option<DisplayItem>);

/// The camera changed mode.
#[derive(Event, Debug, Clone)]
pub struct FocusChanged {
    pub item: Option<DisplayItem>,
    pub state: CameraMode,
}

/// Replace the displayed items.
#[derive(Event, Debug, Clone)]
pub struct ItemsRefreshed(pub Vec<DisplayItem>);

/// Stop the scene and release everything it holds.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct TeardownRequest;
