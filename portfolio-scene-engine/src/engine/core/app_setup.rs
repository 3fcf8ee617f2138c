use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::pbr::wireframe::{WireframeConfig, WireframePlugin};
use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
use constants::camera::{FAR_PLANE, FOV_DEGREES, NEAR_PLANE, START_POSITION};
// Crate engine modules
use crate::engine::config::{LightingSettings, SceneConfig};
use crate::engine::core::app_state::{AppState, report_failure};
use crate::engine::core::window_config::{check_surface, create_window_config};
use crate::engine::error::SceneError;
use crate::engine::events::{FocusChanged, ItemSelected, ItemsRefreshed, TeardownRequest};
use crate::engine::loading::items_loader::{
    ItemsLoader, ItemsManifest, load_scene_when_ready, start_loading,
};
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::engine::systems::input_bridge::collect_input;
use crate::engine::systems::labels::update_labels;
use crate::engine::systems::scene_sync::{
    SceneCamera, SceneHandles, apply_frame, sync_scene_entities,
};
use crate::engine::systems::scene_tick::{
    LatestFrame, PendingInput, apply_item_refresh, forward_scene_events, tick_scene,
};
use crate::engine::systems::teardown::teardown_scene;
// Web RPC
use crate::rpc::web_rpc::WebRpcPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::{
    fps_tracking::fps_text_update_system,
    hud::{spawn_hud, update_hud},
};

/// Build the application. Fails before any plugin is added when there is
/// no surface to render into.
pub fn create_app() -> Result<App, SceneError> {
    check_surface()?;

    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Item list and optional scene tuning, both as JSON assets.
        .add_plugins(JsonAssetPlugin::<ItemsManifest>::new(&["items.json"]))
        .add_plugins(JsonAssetPlugin::<SceneConfig>::new(&["scene.json"]))
        .add_plugins(WebRpcPlugin)
        .add_plugins(WireframePlugin::default())
        .insert_resource(WireframeConfig {
            global: false,
            default_color: Color::WHITE,
        })
        .insert_resource(ClearColor(Color::BLACK))
        .add_plugins(ScenePlugin);

    Ok(app)
}

/// Resources, events and the per-frame system chain of the portfolio scene.
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ItemsLoader>()
            .init_resource::<PendingInput>()
            .init_resource::<LatestFrame>()
            .init_resource::<SceneHandles>()
            .add_event::<ItemSelected>()
            .add_event::<FocusChanged>()
            .add_event::<ItemsRefreshed>()
            .add_event::<TeardownRequest>();

        app.add_systems(Startup, (setup, start_loading).chain())
            .add_systems(
                Update,
                load_scene_when_ready.run_if(in_state(AppState::Loading)),
            )
            .add_systems(OnEnter(AppState::Failed), report_failure);

        // Fixed order inside a frame: input, refresh, update, render sync, outbound events.
        app.add_systems(
            Update,
            (
                collect_input,
                apply_item_refresh,
                tick_scene,
                sync_scene_entities,
                apply_frame,
                update_labels,
                forward_scene_events,
                fps_notification_system,
            )
                .chain()
                .run_if(in_state(AppState::Running)),
        );

        app.add_systems(
            Update,
            teardown_scene
                .run_if(in_state(AppState::Running).or(in_state(AppState::Loading))),
        );

        #[cfg(not(target_arch = "wasm32"))]
        {
            app.add_systems(Startup, spawn_hud).add_systems(
                Update,
                (fps_text_update_system, update_hud).run_if(in_state(AppState::Running)),
            );
        }
    }
}

/// Marker for lights and other entities owned by the scene rather than the app.
#[derive(Component)]
pub struct SceneEnvironment;

fn setup(mut commands: Commands) {
    spawn_camera(&mut commands);
}

fn spawn_camera(commands: &mut Commands) {
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: FOV_DEGREES.to_radians(),
            near: NEAR_PLANE,
            far: FAR_PLANE,
            ..default()
        }),
        Transform::from_translation(Vec3::from(START_POSITION)),
        SceneCamera,
    ));
}

pub(crate) fn hex_color(rgb: u32) -> Color {
    Color::srgb_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

/// Ambient, directional and coloured point lights plus distance fog on the
/// scene camera.
pub(crate) fn spawn_environment(
    commands: &mut Commands,
    lighting: &LightingSettings,
    camera: Option<Entity>,
) {
    commands.insert_resource(AmbientLight {
        color: hex_color(lighting.ambient_color),
        brightness: lighting.ambient_brightness,
        ..default()
    });

    commands.spawn((
        DirectionalLight {
            illuminance: lighting.directional_illuminance,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_translation(lighting.directional_position).looking_at(Vec3::ZERO, Vec3::Y),
        SceneEnvironment,
    ));

    for light in &lighting.point_lights {
        commands.spawn((
            PointLight {
                color: hex_color(light.color),
                intensity: light.intensity,
                range: light.range,
                shadows_enabled: false,
                ..default()
            },
            Transform::from_translation(light.position),
            SceneEnvironment,
        ));
    }

    if let Some(camera) = camera {
        commands.entity(camera).insert(DistanceFog {
            color: hex_color(lighting.fog_color),
            falloff: FogFalloff::Linear {
                start: lighting.fog_start,
                end: lighting.fog_end,
            },
            ..default()
        });
    }
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
