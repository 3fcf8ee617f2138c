use crate::engine::error::SceneError;
use bevy::prelude::*;
use bevy::window::PresentMode;

/// Canvas the engine renders into when embedded in a page.
pub const CANVAS_SELECTOR: &str = "#bevy";

pub fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        Window {
            canvas: Some(CANVAS_SELECTOR.into()),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: false,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: "Portfolio".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}

/// Make sure there is something to draw into before building the app.
#[cfg(target_arch = "wasm32")]
pub fn check_surface() -> Result<(), SceneError> {
    use wasm_bindgen::JsValue;

    let window = web_sys::window()
        .ok_or_else(|| SceneError::SurfaceUnavailable("no browser window".to_string()))?;
    let document = window
        .document()
        .ok_or_else(|| SceneError::SurfaceUnavailable("no document".to_string()))?;

    if document.query_selector(CANVAS_SELECTOR).ok().flatten().is_none() {
        return Err(SceneError::SurfaceUnavailable(format!(
            "canvas {CANVAS_SELECTOR} not found"
        )));
    }

    let gpu = js_sys::Reflect::get(&window.navigator(), &JsValue::from_str("gpu"))
        .unwrap_or(JsValue::UNDEFINED);
    if gpu.is_undefined() || gpu.is_null() {
        return Err(SceneError::UnsupportedFeature("WebGPU".to_string()));
    }

    Ok(())
}

/// Native windows are created by winit; failures there abort inside Bevy.
#[cfg(not(target_arch = "wasm32"))]
pub fn check_surface() -> Result<(), SceneError> {
    Ok(())
}
