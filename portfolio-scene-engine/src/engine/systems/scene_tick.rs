use crate::engine::events::{FocusChanged, ItemSelected, ItemsRefreshed, SceneEvent};
use crate::engine::frame::{Frame, SceneState, update};
use crate::engine::input::InputEvent;
use crate::rpc::web_rpc::WebRpcInterface;
use bevy::prelude::*;

/// The running scene.
#[derive(Resource)]
pub struct ActiveScene(pub SceneState);

/// Input gathered since the last tick.
#[derive(Resource, Default)]
pub struct PendingInput(pub Vec<InputEvent>);

/// Most recent frame, read by the render sync and forwarding systems.
#[derive(Resource, Default)]
pub struct LatestFrame(pub Option<Frame>);

pub fn apply_item_refresh(
    mut refreshes: EventReader<ItemsRefreshed>,
    mut scene: ResMut<ActiveScene>,
    mut rpc: ResMut<WebRpcInterface>,
) {
    for ItemsRefreshed(items) in refreshes.read() {
        let report = scene.0.set_items(items);
        info!(
            "Items refreshed: {} objects, {} skipped",
            report.built,
            report.skipped.len()
        );
        send_status(&scene.0, &mut rpc);
    }
}

pub fn tick_scene(
    mut scene: ResMut<ActiveScene>,
    mut pending: ResMut<PendingInput>,
    mut latest: ResMut<LatestFrame>,
    time: Res<Time>,
) {
    let input = std::mem::take(&mut pending.0);
    latest.0 = Some(update(&mut scene.0, &input, time.delta_secs()));
}

/// Re-emit the frame's scene events as Bevy events and host notifications.
pub fn forward_scene_events(
    latest: Res<LatestFrame>,
    scene: Res<ActiveScene>,
    mut selected: EventWriter<ItemSelected>,
    mut focus_changed: EventWriter<FocusChanged>,
    mut rpc: ResMut<WebRpcInterface>,
) {
    let Some(frame) = latest.0.as_ref() else {
        return;
    };

    let mut mode_changed = false;
    for event in &frame.events {
        match serde_json::to_value(event) {
            Ok(params) => rpc.send_notification(event.rpc_method(), params),
            Err(e) => error!("Failed to serialise scene event: {}", e),
        }

        match event {
            SceneEvent::Selected { item } => {
                selected.write(ItemSelected(item.clone()));
            }
            SceneEvent::FocusChanged { item, state } => {
                mode_changed = true;
                focus_changed.write(FocusChanged {
                    item: item.clone(),
                    state: *state,
                });
            }
        }
    }

    if mode_changed {
        send_status(&scene.0, &mut rpc);
    }
}

pub(crate) fn send_status(scene: &SceneState, rpc: &mut WebRpcInterface) {
    let mut status = match serde_json::to_value(scene.status()) {
        Ok(status) => status,
        Err(e) => {
            error!("Failed to serialise scene status: {}", e);
            return;
        }
    };
    if let (Some(map), Some(overlay)) = (status.as_object_mut(), scene.overlay()) {
        map.insert(
            "overlay".to_string(),
            serde_json::to_value(overlay).unwrap_or_default(),
        );
    }
    rpc.send_notification("scene_status", status);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::SceneConfig;
    use crate::engine::frame::SurfaceInfo;
    use crate::engine::items::{Category, DisplayItem};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn app_with_scene() -> App {
        let scene = SceneState::with_rng(
            SceneConfig::default(),
            SurfaceInfo {
                width: 800.0,
                height: 600.0,
            },
            StdRng::seed_from_u64(1),
        )
        .unwrap();

        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<WebRpcInterface>()
            .init_resource::<PendingInput>()
            .init_resource::<LatestFrame>()
            .insert_resource(ActiveScene(scene))
            .add_event::<ItemsRefreshed>()
            .add_event::<ItemSelected>()
            .add_event::<FocusChanged>()
            .add_systems(
                Update,
                (apply_item_refresh, tick_scene, forward_scene_events).chain(),
            );
        app
    }

    #[test]
    fn refresh_event_rebuilds_scene() {
        let mut app = app_with_scene();
        app.world_mut().send_event(ItemsRefreshed(vec![
            DisplayItem::new("a", Category::Quote),
            DisplayItem::new("b", Category::Link),
        ]));
        app.update();

        let scene = app.world().resource::<ActiveScene>();
        assert_eq!(scene.0.registry().len(), 2);
        assert!(app.world().resource::<LatestFrame>().0.is_some());
    }

    #[test]
    fn focus_events_are_forwarded() {
        let mut app = app_with_scene();
        app.world_mut()
            .send_event(ItemsRefreshed(vec![DisplayItem::new("a", Category::Quote)]));
        app.update();

        let transition = app.world_mut().resource_mut::<ActiveScene>().0.focus_item("a");
        assert!(transition.is_some());
        app.update();

        let events = app.world().resource::<Events<FocusChanged>>();
        let mut reader = events.get_cursor();
        let changes: Vec<_> = reader.read(events).collect();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].item.as_ref().map(|i| i.id.as_str()), Some("a"));
    }
}
