use bevy::pbr::wireframe::{Wireframe, WireframeColor};
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::render_asset::RenderAssetUsages;
use constants::label::LABEL_FONT_SIZE;

use crate::engine::core::app_setup::hex_color;
use crate::engine::scene::particles::ParticleField;
use crate::engine::scene::{ObjectId, PartKind, SceneObject, Shape};
use crate::engine::systems::scene_tick::{ActiveScene, LatestFrame};

/// Marker for the camera driven by the scene.
#[derive(Component)]
pub struct SceneCamera;

/// Renderable piece of a scene object.
#[derive(Component, Debug, Clone, Copy)]
pub struct ScenePart {
    pub object: ObjectId,
    pub kind: PartKind,
}

/// UI text pinned above an object.
#[derive(Component, Debug, Clone, Copy)]
pub struct SceneLabel {
    pub object: ObjectId,
}

#[derive(Component)]
pub struct ParticleCloud;

struct ObjectEntities {
    primary: Entity,
    wireframe: Entity,
    label: Entity,
    material: Handle<StandardMaterial>,
    color: Color,
}

struct ParticleEntities {
    entity: Entity,
    mesh: Handle<Mesh>,
    material: Handle<StandardMaterial>,
}

/// Entities and asset handles spawned for the current scene generation.
/// Indexed by `ObjectId`.
#[derive(Resource, Default)]
pub struct SceneHandles {
    generation: Option<u64>,
    objects: Vec<ObjectEntities>,
    particles: Option<ParticleEntities>,
}

impl SceneHandles {
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.particles.is_none()
    }

    /// Forget every entity and handle, returning the entities to despawn.
    /// Dropping the handles releases the meshes and materials.
    pub fn take_entities(&mut self) -> Vec<Entity> {
        let mut entities: Vec<Entity> = self
            .objects
            .drain(..)
            .flat_map(|o| [o.primary, o.wireframe, o.label])
            .collect();
        entities.extend(self.particles.take().map(|p| p.entity));
        self.generation = None;
        entities
    }
}

fn shape_mesh(shape: &Shape) -> Mesh {
    match *shape {
        Shape::Sphere { radius } => Sphere::new(radius).mesh().uv(32, 16),
        Shape::Box { size } => Cuboid::from_size(size).into(),
        Shape::Plane { size } => Rectangle::new(size.x, size.y).into(),
        Shape::Cylinder { radius, height } => Cylinder::new(radius, height).into(),
    }
}

fn object_material(obj: &SceneObject, color: Color) -> StandardMaterial {
    let double_sided = matches!(obj.shape, Shape::Plane { .. });
    StandardMaterial {
        base_color: color.with_alpha(obj.opacity),
        emissive: color.to_linear() * 0.1,
        alpha_mode: AlphaMode::Blend,
        perceptual_roughness: 0.4,
        metallic: 0.1,
        double_sided,
        cull_mode: if double_sided {
            None
        } else {
            Some(bevy::render::render_resource::Face::Back)
        },
        ..default()
    }
}

fn particle_positions(field: &ParticleField) -> Vec<[f32; 3]> {
    field.positions.iter().map(|p| p.to_array()).collect()
}

fn particle_mesh(field: &ParticleField) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, particle_positions(field));
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, field.colors.clone());
    mesh
}

fn part_transform(obj: &SceneObject) -> Transform {
    Transform {
        translation: obj.pose.translation,
        rotation: obj.pose.rotation,
        scale: Vec3::splat(obj.pose.scale),
    }
}

/// Respawn everything when the scene was rebuilt since the last sync.
pub fn sync_scene_entities(
    mut commands: Commands,
    scene: Res<ActiveScene>,
    mut handles: ResMut<SceneHandles>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let generation = scene.0.generation();
    if handles.generation == Some(generation) {
        return;
    }

    for entity in handles.take_entities() {
        commands.entity(entity).despawn();
    }

    let registry = scene.0.registry();
    let wire_material = materials.add(StandardMaterial {
        base_color: Color::srgba(0.0, 0.0, 0.0, 0.0),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    for obj in registry.objects() {
        let item_id = registry
            .item_of(obj.id)
            .map(|item| item.id.as_str())
            .unwrap_or("item");
        let color = hex_color(obj.color);
        let mesh = meshes.add(shape_mesh(&obj.shape));
        let material = materials.add(object_material(obj, color));
        let transform = part_transform(obj);

        let primary = commands
            .spawn((
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material.clone()),
                transform,
                ScenePart {
                    object: obj.id,
                    kind: PartKind::Primary,
                },
                Name::new(format!("{item_id}_primary")),
            ))
            .id();

        let wireframe = commands
            .spawn((
                Mesh3d(mesh),
                MeshMaterial3d(wire_material.clone()),
                transform,
                Wireframe,
                WireframeColor {
                    color: Color::WHITE.with_alpha(obj.pose.wireframe_opacity),
                },
                ScenePart {
                    object: obj.id,
                    kind: PartKind::Wireframe,
                },
                Name::new(format!("{item_id}_wire")),
            ))
            .id();

        let [r, g, b, a] = obj.label.background;
        let panel = obj.label.screen_size();
        let label = commands
            .spawn((
                Node {
                    position_type: PositionType::Absolute,
                    width: Val::Px(panel.x),
                    height: Val::Px(panel.y),
                    padding: UiRect::axes(Val::Px(8.0), Val::Px(4.0)),
                    ..default()
                },
                BackgroundColor(Color::srgba(r, g, b, a)),
                Text::new(obj.label.text.clone()),
                TextLayout::new_with_justify(JustifyText::Center),
                TextFont {
                    font_size: LABEL_FONT_SIZE,
                    ..default()
                },
                TextColor(color),
                Visibility::Hidden,
                SceneLabel { object: obj.id },
                Name::new(format!("{item_id}_label")),
            ))
            .id();

        handles.objects.push(ObjectEntities {
            primary,
            wireframe,
            label,
            material,
            color,
        });
    }

    let field = scene.0.particles();
    if !field.is_empty() {
        let mesh = meshes.add(particle_mesh(field));
        let material = materials.add(StandardMaterial {
            base_color: Color::WHITE.with_alpha(field.opacity),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        });
        let entity = commands
            .spawn((
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material.clone()),
                Transform::from_rotation(field.rotation),
                ParticleCloud,
                Name::new("particles"),
            ))
            .id();
        handles.particles = Some(ParticleEntities {
            entity,
            mesh,
            material,
        });
    }

    handles.generation = Some(generation);
    debug!(
        "Spawned {} objects for scene generation {}",
        handles.objects.len(),
        generation
    );
}

/// Push the latest frame onto the camera, object parts and particles.
pub fn apply_frame(
    latest: Res<LatestFrame>,
    scene: Res<ActiveScene>,
    handles: Res<SceneHandles>,
    mut camera: Query<&mut Transform, With<SceneCamera>>,
    mut parts: Query<
        (&ScenePart, &mut Transform, Option<&mut WireframeColor>),
        Without<SceneCamera>,
    >,
    mut particles: Query<
        &mut Transform,
        (With<ParticleCloud>, Without<ScenePart>, Without<SceneCamera>),
    >,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(frame) = latest.0.as_ref() else {
        return;
    };

    if let Ok(mut transform) = camera.single_mut() {
        transform.translation = frame.camera.position;
        transform.rotation = frame.camera.rotation;
    }

    let registry = scene.0.registry();
    for (part, mut transform, wire_color) in &mut parts {
        let Some(obj) = registry.get(part.object) else {
            continue;
        };
        *transform = part_transform(obj);
        if let Some(mut wire_color) = wire_color {
            let target = Color::WHITE.with_alpha(obj.pose.wireframe_opacity);
            if wire_color.color != target {
                wire_color.color = target;
            }
        }
    }

    // Highlighted objects glow brighter. Only touch materials that change.
    for (index, entities) in handles.objects.iter().enumerate() {
        let Some(obj) = registry.get(ObjectId(index as u32)) else {
            continue;
        };
        let glow = if obj.pose.highlighted { 0.4 } else { 0.1 };
        let target = entities.color.to_linear() * glow;
        let stale = materials
            .get(&entities.material)
            .is_some_and(|m| m.emissive != target);
        if stale {
            if let Some(material) = materials.get_mut(&entities.material) {
                material.emissive = target;
            }
        }
    }

    let Some(cloud) = handles.particles.as_ref() else {
        return;
    };
    let field = scene.0.particles();
    if let Some(mesh) = meshes.get_mut(&cloud.mesh) {
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, particle_positions(field));
    }
    if let Ok(mut transform) = particles.single_mut() {
        transform.rotation = field.rotation;
    }
    let opacity_changed = materials
        .get(&cloud.material)
        .is_some_and(|m| m.base_color.alpha() != frame.particle_opacity);
    if opacity_changed {
        if let Some(material) = materials.get_mut(&cloud.material) {
            material.base_color.set_alpha(frame.particle_opacity);
        }
    }
}
