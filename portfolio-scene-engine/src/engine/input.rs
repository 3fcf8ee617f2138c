use crate::engine::camera::CameraMode;
use bevy::math::Vec2;
use constants::camera::CLICK_DRAG_TOLERANCE_PX;
use serde::{Deserialize, Serialize};

/// Keys the scene reacts to, already mapped from the platform layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
    Boost,
    Cancel,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code` style name.
    pub fn from_code(code: &str) -> Self {
        match code {
            "KeyW" | "ArrowUp" => Key::Forward,
            "KeyS" | "ArrowDown" => Key::Back,
            "KeyA" | "ArrowLeft" => Key::Left,
            "KeyD" | "ArrowRight" => Key::Right,
            "Space" | "KeyE" => Key::Up,
            "KeyQ" => Key::Down,
            "ShiftLeft" | "ShiftRight" => Key::Boost,
            "Escape" => Key::Cancel,
            _ => Key::Other,
        }
    }
}

/// Normalised input event fed into a frame update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerMove { x: f32, y: f32 },
    PointerDown,
    PointerUp,
    Click,
    KeyDown { key: Key },
    KeyUp { key: Key },
    Resize { width: f32, height: f32 },
    CloseOverlay,
}

/// Movement flags held between frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionKeys {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub boost: bool,
}

impl MotionKeys {
    fn set(&mut self, key: Key, down: bool) {
        match key {
            Key::Forward => self.forward = down,
            Key::Back => self.back = down,
            Key::Left => self.left = down,
            Key::Right => self.right = down,
            Key::Up => self.up = down,
            Key::Down => self.down = down,
            Key::Boost => self.boost = down,
            Key::Cancel | Key::Other => {}
        }
    }

    pub fn any_motion(&self) -> bool {
        self.forward || self.back || self.left || self.right || self.up || self.down
    }
}

/// What the scene should do in response to an input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Rotate the free camera by a pointer delta in pixels.
    Look(Vec2),
    /// Cast a pick ray through this NDC position.
    Pick(Vec2),
    ExitFocus,
    Resize { width: f32, height: f32 },
}

/// Turns raw pointer and key events into scene actions.
#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    /// Last pointer position, unknown until the first move.
    pointer_px: Option<Vec2>,
    ndc: Vec2,
    dragging: bool,
    drag_distance: f32,
    keys: MotionKeys,
}

impl InputRouter {
    pub fn ndc(&self) -> Vec2 {
        self.ndc
    }

    pub fn keys(&self) -> &MotionKeys {
        &self.keys
    }

    pub fn release_all(&mut self) {
        self.keys = MotionKeys::default();
        self.dragging = false;
        self.drag_distance = 0.0;
    }

    /// Route one event. `to_ndc` maps a pixel position using the current
    /// viewport.
    pub fn route(
        &mut self,
        event: InputEvent,
        mode: CameraMode,
        to_ndc: impl Fn(Vec2) -> Vec2,
    ) -> Vec<Action> {
        let mut actions = Vec::new();

        match event {
            InputEvent::PointerMove { x, y } => {
                let px = Vec2::new(x, y);
                if !px.is_finite() {
                    return actions;
                }
                let delta = self.pointer_px.map_or(Vec2::ZERO, |last| px - last);
                self.pointer_px = Some(px);
                self.ndc = to_ndc(px);

                if self.dragging {
                    self.drag_distance += delta.length();
                    if mode == CameraMode::Free && delta != Vec2::ZERO {
                        actions.push(Action::Look(delta));
                    }
                }
            }
            InputEvent::PointerDown => {
                self.dragging = true;
                self.drag_distance = 0.0;
            }
            InputEvent::PointerUp => {
                self.dragging = false;
            }
            InputEvent::Click => {
                if self.drag_distance <= CLICK_DRAG_TOLERANCE_PX {
                    actions.push(Action::Pick(self.ndc));
                }
                self.drag_distance = 0.0;
            }
            InputEvent::KeyDown { key: Key::Cancel } => {
                if mode == CameraMode::Focused {
                    actions.push(Action::ExitFocus);
                }
            }
            InputEvent::KeyDown { key } => self.keys.set(key, true),
            InputEvent::KeyUp { key } => self.keys.set(key, false),
            InputEvent::Resize { width, height } => {
                actions.push(Action::Resize { width, height });
            }
            InputEvent::CloseOverlay => {
                if mode == CameraMode::Focused {
                    actions.push(Action::ExitFocus);
                }
            }
        }

        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ndc(px: Vec2) -> Vec2 {
        Vec2::new(px.x / 400.0 - 1.0, 1.0 - px.y / 300.0)
    }

    fn route(router: &mut InputRouter, event: InputEvent, mode: CameraMode) -> Vec<Action> {
        router.route(event, mode, ndc)
    }

    #[test]
    fn click_without_drag_picks_at_pointer() {
        let mut router = InputRouter::default();
        route(&mut router, InputEvent::PointerMove { x: 400.0, y: 300.0 }, CameraMode::Free);
        route(&mut router, InputEvent::PointerDown, CameraMode::Free);
        route(&mut router, InputEvent::PointerUp, CameraMode::Free);
        let actions = route(&mut router, InputEvent::Click, CameraMode::Free);
        assert_eq!(actions, vec![Action::Pick(Vec2::ZERO)]);
    }

    #[test]
    fn drag_looks_and_suppresses_click() {
        let mut router = InputRouter::default();
        route(&mut router, InputEvent::PointerMove { x: 100.0, y: 100.0 }, CameraMode::Free);
        route(&mut router, InputEvent::PointerDown, CameraMode::Free);
        let look = route(&mut router, InputEvent::PointerMove { x: 130.0, y: 90.0 }, CameraMode::Free);
        assert_eq!(look, vec![Action::Look(Vec2::new(30.0, -10.0))]);

        route(&mut router, InputEvent::PointerUp, CameraMode::Free);
        assert!(route(&mut router, InputEvent::Click, CameraMode::Free).is_empty());
    }

    #[test]
    fn small_jitter_still_clicks() {
        let mut router = InputRouter::default();
        route(&mut router, InputEvent::PointerMove { x: 200.0, y: 200.0 }, CameraMode::Free);
        route(&mut router, InputEvent::PointerDown, CameraMode::Free);
        route(&mut router, InputEvent::PointerMove { x: 203.0, y: 204.0 }, CameraMode::Free);
        route(&mut router, InputEvent::PointerUp, CameraMode::Free);
        assert_eq!(route(&mut router, InputEvent::Click, CameraMode::Free).len(), 1);
    }

    #[test]
    fn first_move_while_held_is_not_a_drag() {
        let mut router = InputRouter::default();
        route(&mut router, InputEvent::PointerDown, CameraMode::Free);
        let actions = route(&mut router, InputEvent::PointerMove { x: 640.0, y: 360.0 }, CameraMode::Free);
        assert!(actions.is_empty());

        route(&mut router, InputEvent::PointerUp, CameraMode::Free);
        let actions = route(&mut router, InputEvent::Click, CameraMode::Free);
        assert_eq!(actions, vec![Action::Pick(ndc(Vec2::new(640.0, 360.0)))]);
    }

    #[test]
    fn no_look_while_focused() {
        let mut router = InputRouter::default();
        route(&mut router, InputEvent::PointerDown, CameraMode::Focused);
        let actions = route(&mut router, InputEvent::PointerMove { x: 50.0, y: 0.0 }, CameraMode::Focused);
        assert!(actions.is_empty());
        assert_eq!(router.ndc(), ndc(Vec2::new(50.0, 0.0)));
    }

    #[test]
    fn escape_exits_only_when_focused() {
        let mut router = InputRouter::default();
        let esc = InputEvent::KeyDown { key: Key::Cancel };
        assert!(route(&mut router, esc, CameraMode::Free).is_empty());
        assert!(route(&mut router, esc, CameraMode::EnteringFocus).is_empty());
        assert_eq!(route(&mut router, esc, CameraMode::Focused), vec![Action::ExitFocus]);
        assert_eq!(
            route(&mut router, InputEvent::CloseOverlay, CameraMode::Focused),
            vec![Action::ExitFocus]
        );
    }

    #[test]
    fn keys_toggle_motion_flags() {
        let mut router = InputRouter::default();
        route(&mut router, InputEvent::KeyDown { key: Key::from_code("KeyW") }, CameraMode::Free);
        route(&mut router, InputEvent::KeyDown { key: Key::from_code("ShiftLeft") }, CameraMode::Free);
        assert!(router.keys().forward && router.keys().boost);

        route(&mut router, InputEvent::KeyUp { key: Key::Forward }, CameraMode::Free);
        assert!(!router.keys().any_motion());
        assert_eq!(Key::from_code("Space"), Key::Up);
        assert_eq!(Key::from_code("KeyQ"), Key::Down);
    }

    #[test]
    fn resize_is_forwarded() {
        let mut router = InputRouter::default();
        let actions = route(
            &mut router,
            InputEvent::Resize { width: 1024.0, height: 768.0 },
            CameraMode::EnteringFocus,
        );
        assert_eq!(actions, vec![Action::Resize { width: 1024.0, height: 768.0 }]);
    }

    #[test]
    fn events_parse_from_host_json() {
        let event: InputEvent =
            serde_json::from_str(r#"{"type": "key_down", "key": "cancel"}"#).unwrap();
        assert_eq!(event, InputEvent::KeyDown { key: Key::Cancel });
    }
}
