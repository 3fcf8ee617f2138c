use crate::engine::systems::scene_sync::{SceneCamera, SceneLabel};
use crate::engine::systems::scene_tick::ActiveScene;
use bevy::prelude::*;

/// Keep each label centred on its object's label anchor, hidden while the
/// anchor is behind the camera or off screen.
pub fn update_labels(
    scene: Res<ActiveScene>,
    camera: Query<(&Camera, &GlobalTransform), With<SceneCamera>>,
    mut labels: Query<(&SceneLabel, &mut Node, &mut Visibility, &ComputedNode)>,
) {
    let Ok((camera, camera_transform)) = camera.single() else {
        return;
    };
    let registry = scene.0.registry();

    for (label, mut node, mut visibility, computed) in &mut labels {
        let screen = registry
            .get(label.object)
            .and_then(|obj| camera.world_to_viewport(camera_transform, obj.label_position()).ok());

        let Some(screen) = screen else {
            visibility.set_if_neq(Visibility::Hidden);
            continue;
        };

        let half = computed.size() * computed.inverse_scale_factor() * 0.5;
        node.left = Val::Px(screen.x - half.x);
        node.top = Val::Px(screen.y - half.y);
        visibility.set_if_neq(Visibility::Inherited);
    }
}
