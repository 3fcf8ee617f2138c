use crate::engine::core::app_state::FpsText;
use crate::engine::items::FocusOverlay;
use crate::engine::systems::scene_tick::ActiveScene;
use bevy::prelude::*;

/// Text slots of the native overlay. The web build leaves these to the
/// host page, which gets the same data through RPC notifications.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudText {
    Counter,
    Hints,
    Overlay,
}

fn hud_text(text: &str, kind: HudText, node: Node) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.8)),
        node,
        kind,
    )
}

pub fn spawn_hud(mut commands: Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn(hud_text(
                "",
                HudText::Counter,
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
            ));
            parent.spawn(hud_text(
                "",
                HudText::Hints,
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
            ));
            parent.spawn((
                hud_text(
                    "",
                    HudText::Overlay,
                    Node {
                        position_type: PositionType::Absolute,
                        top: Val::Px(24.0),
                        right: Val::Px(24.0),
                        max_width: Val::Px(360.0),
                        padding: UiRect::all(Val::Px(16.0)),
                        ..default()
                    },
                ),
                BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.8)),
                Visibility::Hidden,
            ));
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

fn overlay_text(overlay: &FocusOverlay) -> String {
    let mut text = format!("{}\n[{}]", overlay.title, overlay.badge);
    if !overlay.body.is_empty() {
        text.push_str("\n\n");
        text.push_str(&overlay.body);
    }
    if let Some(author) = &overlay.attribution {
        text.push_str(&format!("\n- {author}"));
    }
    if let Some(link) = &overlay.link {
        text.push_str(&format!("\n\n{link}"));
    }
    text.push_str("\n\nEsc to close");
    text
}

pub fn update_hud(
    scene: Res<ActiveScene>,
    mut texts: Query<(&HudText, &mut Text, &mut Visibility)>,
) {
    let status = scene.0.status();
    let overlay = scene.0.overlay();

    for (kind, mut text, mut visibility) in &mut texts {
        let content = match kind {
            HudText::Counter => format!("{} items", status.item_count),
            HudText::Hints => status.hints.join("  |  "),
            HudText::Overlay => {
                let Some(overlay) = overlay.as_ref() else {
                    visibility.set_if_neq(Visibility::Hidden);
                    continue;
                };
                visibility.set_if_neq(Visibility::Inherited);
                overlay_text(overlay)
            }
        };
        if text.0 != content {
            text.0 = content;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::items::{Category, DisplayItem};

    #[test]
    fn quote_overlay_shows_attribution() {
        let mut item = DisplayItem::new("q", Category::Quote).with_label("On craft");
        item.body = "Make it work, then make it right.".to_string();
        item.author = Some("Kent Beck".to_string());

        let text = overlay_text(&FocusOverlay::from_item(&item));
        assert!(text.starts_with("On craft\n[Quote]"));
        assert!(text.contains("- Kent Beck"));
        assert!(text.ends_with("Esc to close"));
    }
}
