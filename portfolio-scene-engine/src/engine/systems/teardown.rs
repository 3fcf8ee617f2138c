use crate::engine::core::app_setup::SceneEnvironment;
use crate::engine::core::app_state::AppState;
use crate::engine::events::TeardownRequest;
use crate::engine::systems::scene_sync::SceneHandles;
use crate::engine::systems::scene_tick::{ActiveScene, LatestFrame, PendingInput};
use crate::rpc::web_rpc::WebRpcInterface;
use bevy::prelude::*;

/// Stop the scene: despawn its entities, drop its asset handles and leave
/// the `Running` state for good. The web message listener is detached by
/// the RPC plugin on the same request.
pub fn teardown_scene(
    mut requests: EventReader<TeardownRequest>,
    mut commands: Commands,
    scene: Option<ResMut<ActiveScene>>,
    mut handles: ResMut<SceneHandles>,
    mut pending: ResMut<PendingInput>,
    mut latest: ResMut<LatestFrame>,
    environment: Query<Entity, With<SceneEnvironment>>,
    mut next_state: ResMut<NextState<AppState>>,
    mut rpc: ResMut<WebRpcInterface>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();

    let report = scene.map(|mut scene| scene.0.teardown()).unwrap_or_default();

    let mut despawned = 0;
    for entity in handles.take_entities().into_iter().chain(&environment) {
        commands.entity(entity).despawn();
        despawned += 1;
    }
    pending.0.clear();
    latest.0 = None;

    info!(
        "→ Scene torn down ({} entities despawned), transitioning to TornDown state",
        despawned
    );
    rpc.send_notification(
        "scene_status",
        serde_json::json!({
            "running": false,
            "objects_released": report.objects_released,
            "particles_released": report.particles_released,
        }),
    );
    next_state.set(AppState::TornDown);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::SceneConfig;
    use crate::engine::frame::{SceneState, SurfaceInfo};
    use crate::engine::items::{Category, DisplayItem};
    use bevy::state::app::StatesPlugin;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn teardown_request_stops_scene() {
        let mut scene = SceneState::with_rng(
            SceneConfig::default(),
            SurfaceInfo {
                width: 640.0,
                height: 480.0,
            },
            StdRng::seed_from_u64(3),
        )
        .unwrap();
        scene.set_items(&[DisplayItem::new("a", Category::Note)]);

        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .init_state::<AppState>()
            .init_resource::<SceneHandles>()
            .init_resource::<PendingInput>()
            .init_resource::<LatestFrame>()
            .init_resource::<WebRpcInterface>()
            .insert_resource(ActiveScene(scene))
            .add_event::<TeardownRequest>()
            .add_systems(Update, teardown_scene);

        let env = app.world_mut().spawn(SceneEnvironment).id();
        app.world_mut().send_event(TeardownRequest);
        app.update();
        app.update();

        assert!(!app.world().resource::<ActiveScene>().0.is_running());
        assert!(app.world().get_entity(env).is_err());
        assert_eq!(
            *app.world().resource::<State<AppState>>().get(),
            AppState::TornDown
        );
    }
}
