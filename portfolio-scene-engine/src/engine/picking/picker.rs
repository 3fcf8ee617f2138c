use super::ray::{
    Ray, object_matrix, ray_hits_billboard, ray_hits_cylinder, ray_hits_obb, ray_hits_sphere,
};
use crate::engine::camera::projection::{CameraPose, Projection};
use crate::engine::scene::{ObjectId, ObjectRegistry, PartId, SceneObject, Shape};
use bevy::math::{Vec2, Vec3};
use constants::layout::PLANE_PICK_THICKNESS;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub object: ObjectId,
    pub part: PartId,
    pub distance: f32,
    pub point: Vec3,
}

/// Pick through a normalised device coordinate of the viewport.
pub fn pick_at(
    ndc: Vec2,
    pose: &CameraPose,
    projection: &Projection,
    registry: &ObjectRegistry,
) -> Option<Hit> {
    let ray = projection.ray_from_ndc(ndc, pose)?;
    pick(&ray, registry, pose.position)
}

/// Nearest object part in front of the ray origin.
///
/// Label billboards are turned towards `eye`. Ties go to the lower object id.
pub fn pick(ray: &Ray, registry: &ObjectRegistry, eye: Vec3) -> Option<Hit> {
    let mut best: Option<(PartId, f32)> = None;

    for obj in registry.objects() {
        if obj.shape.is_degenerate() || !obj.pose.translation.is_finite() {
            continue;
        }

        let candidates = [
            hit_primary(ray, obj).map(|t| (obj.parts.primary, t)),
            hit_label(ray, obj, eye).map(|t| (obj.parts.label, t)),
        ];

        for (part, t) in candidates.into_iter().flatten() {
            if t > 0.0 && best.is_none_or(|(_, bt)| t < bt) {
                best = Some((part, t));
            }
        }
    }

    let (part, distance) = best?;
    let object = registry.owner_of(part)?;
    Some(Hit {
        object,
        part,
        distance,
        point: ray.at(distance),
    })
}

fn hit_primary(ray: &Ray, obj: &SceneObject) -> Option<f32> {
    let pose = &obj.pose;
    match obj.shape {
        Shape::Sphere { radius } => ray_hits_sphere(ray, pose.translation, radius * pose.scale),
        Shape::Box { size } => ray_hits_obb(
            ray,
            object_matrix(pose.translation, pose.rotation, pose.scale),
            size,
        ),
        Shape::Plane { size } => ray_hits_obb(
            ray,
            object_matrix(pose.translation, pose.rotation, pose.scale),
            size.extend(PLANE_PICK_THICKNESS),
        ),
        Shape::Cylinder { radius, height } => ray_hits_cylinder(
            ray,
            object_matrix(pose.translation, pose.rotation, pose.scale),
            radius,
            height,
        ),
    }
}

fn hit_label(ray: &Ray, obj: &SceneObject, eye: Vec3) -> Option<f32> {
    ray_hits_billboard(ray, obj.label_position(), obj.label.world_size, eye)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::items::{Category, DisplayItem};
    use crate::engine::scene::builder::build_scene;
    use crate::engine::scene::layout::LayoutParams;
    use bevy::math::Quat;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn flat_params() -> LayoutParams {
        LayoutParams {
            radius: 15.0,
            height: 0.0,
            jitter: 0.0,
        }
    }

    fn registry_with(categories: &[Category]) -> ObjectRegistry {
        let items: Vec<_> = categories
            .iter()
            .enumerate()
            .map(|(i, c)| DisplayItem::new(format!("i{i}"), *c))
            .collect();
        let mut rng = StdRng::seed_from_u64(0);
        build_scene(&items, &flat_params(), &mut rng).0
    }

    fn place(registry: &mut ObjectRegistry, index: usize, at: Vec3) {
        registry.objects_mut()[index].pose.translation = at;
    }

    fn toward_origin() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, 20.0), Vec3::NEG_Z).unwrap()
    }

    #[test]
    fn empty_registry_misses() {
        let registry = ObjectRegistry::default();
        assert_eq!(pick(&toward_origin(), &registry, Vec3::new(0.0, 0.0, 20.0)), None);
    }

    #[test]
    fn nearest_of_overlapping_objects_wins() {
        let mut registry = registry_with(&[Category::Quote, Category::Quote]);
        place(&mut registry, 0, Vec3::new(0.0, 0.0, -5.0));
        place(&mut registry, 1, Vec3::new(0.0, 0.0, 5.0));

        let hit = pick(&toward_origin(), &registry, Vec3::new(0.0, 0.0, 20.0)).unwrap();
        assert_eq!(hit.object, ObjectId(1));
        assert_eq!(hit.part, registry.objects()[1].parts.primary);
        assert!((hit.distance - (15.0 - 1.2)).abs() < 1e-4);
    }

    #[test]
    fn equal_distance_prefers_lower_id() {
        let mut registry = registry_with(&[Category::Quote, Category::Quote]);
        place(&mut registry, 0, Vec3::ZERO);
        place(&mut registry, 1, Vec3::ZERO);

        let hit = pick(&toward_origin(), &registry, Vec3::new(0.0, 0.0, 20.0)).unwrap();
        assert_eq!(hit.object, ObjectId(0));
    }

    #[test]
    fn label_hit_resolves_to_owner() {
        let mut registry = registry_with(&[Category::Link]);
        place(&mut registry, 0, Vec3::new(0.0, -2.0, 0.0));

        // Passes above the box, through its label.
        let hit = pick(&toward_origin(), &registry, Vec3::new(0.0, 0.0, 20.0)).unwrap();
        assert_eq!(hit.object, ObjectId(0));
        assert_eq!(hit.part, registry.objects()[0].parts.label);
    }

    #[test]
    fn every_shape_is_pickable() {
        for category in [Category::Quote, Category::Link, Category::Image, Category::Note] {
            let mut registry = registry_with(&[category]);
            place(&mut registry, 0, Vec3::ZERO);
            let hit = pick(&toward_origin(), &registry, Vec3::new(0.0, 0.0, 20.0));
            assert_eq!(hit.map(|h| h.object), Some(ObjectId(0)), "{category:?}");
        }
    }

    #[test]
    fn plane_seen_edge_on_is_thin() {
        let mut registry = registry_with(&[Category::Image]);
        place(&mut registry, 0, Vec3::ZERO);
        registry.objects_mut()[0].pose.rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);

        let grazing = Ray::new(Vec3::new(0.5, 0.0, 20.0), Vec3::NEG_Z).unwrap();
        assert_eq!(pick(&grazing, &registry, Vec3::new(0.0, 50.0, 0.0)), None);
    }

    #[test]
    fn degenerate_shapes_are_ignored() {
        let mut registry = registry_with(&[Category::Quote]);
        place(&mut registry, 0, Vec3::ZERO);
        registry.objects_mut()[0].shape = Shape::Sphere { radius: 0.0 };
        registry.objects_mut()[0].label.world_size = Vec2::ZERO;

        assert_eq!(pick(&toward_origin(), &registry, Vec3::new(0.0, 0.0, 20.0)), None);
    }

    #[test]
    fn pick_through_screen_centre() {
        let mut registry = registry_with(&[Category::Quote]);
        place(&mut registry, 0, Vec3::ZERO);

        let projection = Projection::new(800.0, 600.0, 75.0).unwrap();
        let pose = CameraPose {
            position: Vec3::new(0.0, 0.0, 20.0),
            rotation: Quat::IDENTITY,
        };
        let hit = pick_at(Vec2::ZERO, &pose, &projection, &registry).unwrap();
        assert_eq!(hit.object, ObjectId(0));

        assert_eq!(pick_at(Vec2::new(0.95, 0.95), &pose, &projection, &registry), None);
    }
}
