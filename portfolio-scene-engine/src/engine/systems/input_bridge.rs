use crate::engine::input::{InputEvent, Key};
use crate::engine::systems::scene_tick::PendingInput;
use bevy::prelude::*;
use bevy::window::WindowResized;

fn key_for(code: KeyCode) -> Key {
    match code {
        KeyCode::KeyW | KeyCode::ArrowUp => Key::Forward,
        KeyCode::KeyS | KeyCode::ArrowDown => Key::Back,
        KeyCode::KeyA | KeyCode::ArrowLeft => Key::Left,
        KeyCode::KeyD | KeyCode::ArrowRight => Key::Right,
        KeyCode::Space | KeyCode::KeyE => Key::Up,
        KeyCode::KeyQ => Key::Down,
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Boost,
        KeyCode::Escape => Key::Cancel,
        _ => Key::Other,
    }
}

/// Gather this frame's window input, in the order the scene should see it.
/// A left-button release counts as a click; the router decides whether it
/// was a drag.
pub fn collect_input(
    mut pending: ResMut<PendingInput>,
    mut resized: EventReader<WindowResized>,
    mut cursor: EventReader<CursorMoved>,
    mouse: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
) {
    let events = &mut pending.0;

    if let Some(resize) = resized.read().last() {
        events.push(InputEvent::Resize {
            width: resize.width,
            height: resize.height,
        });
    }

    if mouse.just_pressed(MouseButton::Left) {
        events.push(InputEvent::PointerDown);
    }

    for moved in cursor.read() {
        events.push(InputEvent::PointerMove {
            x: moved.position.x,
            y: moved.position.y,
        });
    }

    for code in keys.get_just_pressed() {
        let key = key_for(*code);
        if key != Key::Other {
            events.push(InputEvent::KeyDown { key });
        }
    }
    for code in keys.get_just_released() {
        let key = key_for(*code);
        if key != Key::Other {
            events.push(InputEvent::KeyUp { key });
        }
    }

    if mouse.just_released(MouseButton::Left) {
        events.push(InputEvent::PointerUp);
        events.push(InputEvent::Click);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_match_dom_mapping() {
        for (code, name) in [
            (KeyCode::KeyW, "KeyW"),
            (KeyCode::ArrowDown, "ArrowDown"),
            (KeyCode::Space, "Space"),
            (KeyCode::KeyQ, "KeyQ"),
            (KeyCode::ShiftRight, "ShiftRight"),
            (KeyCode::Escape, "Escape"),
            (KeyCode::KeyZ, "KeyZ"),
        ] {
            assert_eq!(key_for(code), Key::from_code(name), "{name}");
        }
    }
}
