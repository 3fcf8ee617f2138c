use super::label::LabelSpec;
use super::layout::{LayoutParams, scatter_position};
use super::{ObjectParts, ObjectPose, ObjectRegistry, PartId, SceneObject, Shape};
use crate::engine::items::{Category, DisplayItem};
use bevy::log::{info, warn};
use bevy::math::{Quat, Vec2, Vec3};
use constants::animation::IDLE_WIREFRAME_OPACITY;
use constants::layout::*;
use rand::Rng;
use std::collections::HashSet;
use std::f32::consts::TAU;

/// Sub-parts allocated per object: primary, wireframe, label.
const PARTS_PER_OBJECT: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    EmptyId,
    DuplicateId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    pub index: usize,
    pub id: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub built: usize,
    pub skipped: Vec<SkippedItem>,
}

/// Primary shape and material opacity for an item kind.
pub fn shape_for(category: Category, size: f32) -> (Shape, f32) {
    match category {
        Category::Quote => (
            Shape::Sphere {
                radius: SPHERE_RADIUS * size,
            },
            OPACITY_ROUND,
        ),
        Category::Link => (
            Shape::Box {
                size: Vec3::from(BOX_SIZE) * size,
            },
            OPACITY_BOX,
        ),
        Category::Image => (
            Shape::Plane {
                size: Vec2::from(PLANE_SIZE) * size,
            },
            OPACITY_PLANE,
        ),
        Category::Project => (
            Shape::Box {
                size: Vec3::splat(PROJECT_CUBE_SIZE * size),
            },
            OPACITY_BOX,
        ),
        Category::Skill => (
            Shape::Sphere {
                radius: SKILL_SPHERE_RADIUS * size,
            },
            OPACITY_ROUND,
        ),
        Category::Note => (
            Shape::Cylinder {
                radius: CYLINDER_RADIUS * size,
                height: CYLINDER_HEIGHT * size,
            },
            OPACITY_ROUND,
        ),
    }
}

/// Build one object per acceptable item.
///
/// Items with an empty or repeated id are left out and listed in the report;
/// the layout is computed over the accepted items only.
pub fn build_scene<R: Rng + ?Sized>(
    items: &[DisplayItem],
    params: &LayoutParams,
    rng: &mut R,
) -> (ObjectRegistry, BuildReport) {
    let mut report = BuildReport::default();
    let mut seen = HashSet::new();
    let mut accepted = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let reason = if item.id.trim().is_empty() {
            Some(SkipReason::EmptyId)
        } else if !seen.insert(item.id.as_str()) {
            Some(SkipReason::DuplicateId)
        } else {
            None
        };

        match reason {
            Some(reason) => {
                warn!("Skipping item #{index} ({:?}): {:?}", item.id, reason);
                report.skipped.push(SkippedItem {
                    index,
                    id: item.id.clone(),
                    reason,
                });
            }
            None => accepted.push(item),
        }
    }

    let count = accepted.len();
    let mut registry = ObjectRegistry::default();

    for (i, item) in accepted.into_iter().enumerate() {
        let base_position = scatter_position(i, count, params, rng);
        let size = item.size_hint.multiplier();
        let (shape, opacity) = shape_for(item.category, size);
        let first_part = i as u32 * PARTS_PER_OBJECT;

        let object = SceneObject {
            id: super::ObjectId(0),
            item_index: 0,
            base_position,
            float_phase: rng.gen_range(0.0..TAU),
            float_speed: FLOAT_SPEED_MIN + rng.gen_range(0.0..FLOAT_SPEED_RANGE),
            shape,
            size,
            color: item.resolved_color(),
            opacity,
            label: LabelSpec::new(&item.display_title()),
            parts: ObjectParts {
                primary: PartId(first_part),
                wireframe: PartId(first_part + 1),
                label: PartId(first_part + 2),
            },
            pose: ObjectPose {
                translation: base_position,
                rotation: Quat::IDENTITY,
                scale: 1.0,
                wireframe_opacity: IDLE_WIREFRAME_OPACITY,
                highlighted: false,
            },
        };
        registry.push(item.clone(), object);
    }

    report.built = registry.len();
    info!(
        "Built scene with {} objects ({} skipped)",
        report.built,
        report.skipped.len()
    );

    (registry, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::items::SizeHint;
    use crate::engine::scene::{ObjectId, PartKind};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn items(n: usize) -> Vec<DisplayItem> {
        (0..n)
            .map(|i| DisplayItem::new(format!("item-{i}"), Category::Note))
            .collect()
    }

    #[test]
    fn one_object_per_item() {
        let mut rng = StdRng::seed_from_u64(42);
        let (registry, report) = build_scene(&items(25), &LayoutParams::default(), &mut rng);

        assert_eq!(registry.len(), 25);
        assert_eq!(report.built, 25);
        assert!(report.skipped.is_empty());

        let ids: HashSet<_> = registry.objects().iter().map(|o| o.id).collect();
        assert_eq!(ids.len(), 25);
        for (i, obj) in registry.objects().iter().enumerate() {
            assert_eq!(obj.id, ObjectId(i as u32));
            assert_eq!(registry.items()[obj.item_index].id, format!("item-{i}"));
        }
    }

    #[test]
    fn empty_input_gives_empty_registry() {
        let mut rng = StdRng::seed_from_u64(0);
        let (registry, report) = build_scene(&[], &LayoutParams::default(), &mut rng);
        assert!(registry.is_empty());
        assert_eq!(report, BuildReport::default());
    }

    #[test]
    fn malformed_items_are_skipped() {
        let mut list = items(3);
        list.push(DisplayItem::new("item-1", Category::Quote));
        list.push(DisplayItem::new("  ", Category::Link));

        let mut rng = StdRng::seed_from_u64(0);
        let (registry, report) = build_scene(&list, &LayoutParams::default(), &mut rng);

        assert_eq!(registry.len(), 3);
        assert_eq!(
            report
                .skipped
                .iter()
                .map(|s| (s.index, s.reason.clone()))
                .collect::<Vec<_>>(),
            vec![(3, SkipReason::DuplicateId), (4, SkipReason::EmptyId)]
        );
        // The first occurrence keeps its category.
        let kept = registry.find_by_item_id("item-1").unwrap();
        assert_eq!(registry.item_of(kept).unwrap().category, Category::Note);
    }

    #[test]
    fn category_selects_shape() {
        let list = vec![
            DisplayItem::new("q", Category::Quote),
            DisplayItem::new("l", Category::Link),
            DisplayItem::new("i", Category::Image),
            DisplayItem::new("n", Category::Note),
        ];
        let mut rng = StdRng::seed_from_u64(0);
        let (registry, _) = build_scene(&list, &LayoutParams::default(), &mut rng);

        let kinds: Vec<_> = registry
            .objects()
            .iter()
            .map(|o| o.shape.kind_name())
            .collect();
        assert_eq!(kinds, ["sphere", "box", "plane", "cylinder"]);

        let opacities: Vec<_> = registry.objects().iter().map(|o| o.opacity).collect();
        assert_eq!(opacities, [0.8, 0.85, 0.9, 0.8]);
    }

    #[test]
    fn size_hint_scales_dimensions() {
        let mut big = DisplayItem::new("big", Category::Quote);
        big.size_hint = SizeHint::Large;
        let (shape, _) = shape_for(big.category, big.size_hint.multiplier());
        assert_eq!(
            shape,
            Shape::Sphere {
                radius: SPHERE_RADIUS * SIZE_LARGE
            }
        );
    }

    #[test]
    fn every_part_resolves_to_its_owner() {
        let mut rng = StdRng::seed_from_u64(3);
        let (registry, _) = build_scene(&items(10), &LayoutParams::default(), &mut rng);

        for obj in registry.objects() {
            for (part, kind) in obj.parts.iter() {
                assert_eq!(registry.owner_of(part), Some(obj.id));
                assert_eq!(registry.part_kind(part), Some(kind));
            }
        }
        assert_eq!(registry.owner_of(PartId(10_000)), None);
        assert_eq!(
            registry.part_kind(registry.objects()[2].parts.label),
            Some(PartKind::Label)
        );
    }

    #[test]
    fn float_parameters_in_range() {
        let mut rng = StdRng::seed_from_u64(8);
        let (registry, _) = build_scene(&items(50), &LayoutParams::default(), &mut rng);
        for obj in registry.objects() {
            assert!((0.0..TAU).contains(&obj.float_phase));
            assert!(obj.float_speed >= FLOAT_SPEED_MIN);
            assert!(obj.float_speed < FLOAT_SPEED_MIN + FLOAT_SPEED_RANGE);
            assert_eq!(obj.pose.translation, obj.base_position());
        }
    }
}
