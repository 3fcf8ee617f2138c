use crate::engine::error::SceneError;
use crate::rpc::web_rpc::WebRpcInterface;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
    Failed,
    TornDown,
}

#[derive(Component)]
pub struct FpsText;

/// Why the scene could not start.
#[derive(Resource, Debug, Clone)]
pub struct SceneFailure(pub SceneError);

pub fn transition_to_running(next_state: &mut NextState<AppState>) {
    info!("→ Scene built, transitioning to Running state");
    next_state.set(AppState::Running);
}

pub fn transition_to_failed(
    commands: &mut Commands,
    next_state: &mut NextState<AppState>,
    error: SceneError,
) {
    info!("→ Scene failed to start, transitioning to Failed state");
    commands.insert_resource(SceneFailure(error));
    next_state.set(AppState::Failed);
}

/// Tell the host page why nothing is on screen.
pub fn report_failure(failure: Option<Res<SceneFailure>>, mut rpc: ResMut<WebRpcInterface>) {
    let Some(failure) = failure else {
        return;
    };

    error!("Scene initialisation failed: {}", failure.0);
    rpc.send_notification(
        "scene_error",
        serde_json::json!({
            "kind": failure.0.kind(),
            "message": failure.0.to_string(),
        }),
    );
}
