use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use serde::Deserialize;

use crate::engine::config::SceneConfig;
use crate::engine::core::app_setup::spawn_environment;
use crate::engine::core::app_state::{AppState, transition_to_failed, transition_to_running};
use crate::engine::error::SceneError;
use crate::engine::frame::{SceneState, SurfaceInfo};
use crate::engine::items::{DisplayItem, RepoRecord, SkillRecord, rank_repositories};
use crate::engine::systems::scene_sync::SceneCamera;
use crate::engine::systems::scene_tick::ActiveScene;
use crate::rpc::web_rpc::WebRpcInterface;

pub const ITEMS_PATH: &str = "portfolio.items.json";
pub const CONFIG_PATH: &str = "default.scene.json";

/// Content shown in the scene. Plain items plus raw repository and skill
/// records that are converted on load.
#[derive(Asset, TypePath, Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ItemsManifest {
    pub items: Vec<DisplayItem>,
    pub repos: Vec<RepoRecord>,
    pub skills: Vec<SkillRecord>,
}

impl ItemsManifest {
    /// Flatten into display order: items, featured repositories, skills.
    pub fn into_items(self) -> Vec<DisplayItem> {
        let mut items = self.items;
        items.extend(
            rank_repositories(self.repos)
                .into_iter()
                .map(RepoRecord::into_item),
        );
        items.extend(self.skills.into_iter().map(SkillRecord::into_item));
        items
    }
}

#[derive(Resource, Default)]
pub struct ItemsLoader {
    items: Option<Handle<ItemsManifest>>,
    config: Option<Handle<SceneConfig>>,
}

enum Pending<T> {
    Waiting,
    Ready(T),
    Failed,
}

fn poll<A: Asset + Clone>(
    handle: Option<&Handle<A>>,
    assets: &Assets<A>,
    asset_server: &AssetServer,
) -> Pending<A> {
    let Some(handle) = handle else {
        return Pending::Failed;
    };
    if let Some(asset) = assets.get(handle) {
        return Pending::Ready(asset.clone());
    }
    match asset_server.load_state(handle) {
        LoadState::Failed(_) => Pending::Failed,
        _ => Pending::Waiting,
    }
}

// Start the loading process
pub fn start_loading(mut loader: ResMut<ItemsLoader>, asset_server: Res<AssetServer>) {
    info!("Loading items from: {}", ITEMS_PATH);
    loader.items = Some(asset_server.load(ITEMS_PATH));
    loader.config = Some(asset_server.load(CONFIG_PATH));
}

/// Build the scene once both assets have settled.
pub fn load_scene_when_ready(
    mut commands: Commands,
    loader: Res<ItemsLoader>,
    asset_server: Res<AssetServer>,
    manifests: Res<Assets<ItemsManifest>>,
    configs: Res<Assets<SceneConfig>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut cameras: Query<(Entity, &mut Projection), With<SceneCamera>>,
    mut next_state: ResMut<NextState<AppState>>,
    mut rpc: ResMut<WebRpcInterface>,
) {
    let config = match poll(loader.config.as_ref(), &configs, &asset_server) {
        Pending::Waiting => return,
        Pending::Ready(config) => config,
        Pending::Failed => {
            warn!("No scene config at {}, using defaults", CONFIG_PATH);
            SceneConfig::default()
        }
    };
    let items = match poll(loader.items.as_ref(), &manifests, &asset_server) {
        Pending::Waiting => return,
        Pending::Ready(manifest) => manifest.into_items(),
        Pending::Failed => {
            warn!("Items manifest {} failed to load, starting empty", ITEMS_PATH);
            Vec::new()
        }
    };

    let Ok(window) = windows.single() else {
        transition_to_failed(
            &mut commands,
            &mut next_state,
            SceneError::SurfaceUnavailable("no primary window".to_string()),
        );
        return;
    };
    let surface = SurfaceInfo {
        width: window.width(),
        height: window.height(),
    };

    let mut scene = match SceneState::new(config.clone(), surface) {
        Ok(scene) => scene,
        Err(err) => {
            transition_to_failed(&mut commands, &mut next_state, err);
            return;
        }
    };
    let report = scene.set_items(&items);
    info!(
        "✓ Scene built: {} objects, {} items skipped",
        report.built,
        report.skipped.len()
    );

    let camera = match cameras.single_mut() {
        Ok((entity, mut projection)) => {
            if let Projection::Perspective(perspective) = projection.as_mut() {
                perspective.fov = config.camera.fov_degrees.to_radians();
            }
            Some(entity)
        }
        Err(_) => {
            warn!("Scene camera missing, fog not applied");
            None
        }
    };
    spawn_environment(&mut commands, &config.lighting, camera);

    rpc.send_notification(
        "scene_status",
        serde_json::to_value(scene.status()).unwrap_or_default(),
    );
    commands.insert_resource(config);
    commands.insert_resource(ActiveScene(scene));
    transition_to_running(&mut next_state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::items::Category;

    #[test]
    fn manifest_flattens_all_sources() {
        let manifest: ItemsManifest = serde_json::from_str(
            r##"{
                "items": [{"id": "q1", "type": "quote", "content": "Stay curious"}],
                "repos": [
                    {"name": "engine", "stargazers_count": 12, "size": 40, "updated_at": "2024-05-01T00:00:00Z"},
                    {"name": "me.github.io", "stargazers_count": 99, "size": 40, "updated_at": "2024-05-01T00:00:00Z"}
                ],
                "skills": [{"name": "Rust", "level": 92, "color": "#dea584"}]
            }"##,
        )
        .unwrap();

        let items = manifest.into_items();
        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["q1", "repo-engine", "skill-rust"]);
        assert_eq!(items[1].category, Category::Project);
        assert_eq!(items[2].category, Category::Skill);
    }

    #[test]
    fn empty_manifest_is_valid() {
        let manifest: ItemsManifest = serde_json::from_str("{}").unwrap();
        assert!(manifest.into_items().is_empty());
    }
}
