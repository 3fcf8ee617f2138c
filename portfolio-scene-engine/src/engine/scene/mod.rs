//! Scene content: objects built from display items and the lookup tables
//! the picker and animation loop work against.

pub mod builder;
pub mod label;
pub mod layout;
pub mod particles;

use crate::engine::items::DisplayItem;
use bevy::math::{Quat, Vec2, Vec3};
use label::LabelSpec;
use std::collections::HashMap;

/// Index of an object in its registry. Stable until the next rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub u32);

/// Identifier of a renderable sub-part (primary mesh, wireframe, label).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Primary,
    Wireframe,
    Label,
}

/// Primary geometry of an object, already scaled by the item's size hint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere { radius: f32 },
    Box { size: Vec3 },
    Plane { size: Vec2 },
    Cylinder { radius: f32, height: f32 },
}

impl Shape {
    /// A shape with a zero, negative or non-finite dimension cannot be hit.
    /// Planes have no thickness to check.
    pub fn is_degenerate(&self) -> bool {
        let bad = |v: f32| !v.is_finite() || v <= 0.0;
        match *self {
            Shape::Sphere { radius } => bad(radius),
            Shape::Box { size } => bad(size.x) || bad(size.y) || bad(size.z),
            Shape::Plane { size } => bad(size.x) || bad(size.y),
            Shape::Cylinder { radius, height } => bad(radius) || bad(height),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Sphere { .. } => "sphere",
            Shape::Box { .. } => "box",
            Shape::Plane { .. } => "plane",
            Shape::Cylinder { .. } => "cylinder",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectParts {
    pub primary: PartId,
    pub wireframe: PartId,
    pub label: PartId,
}

impl ObjectParts {
    pub fn iter(&self) -> impl Iterator<Item = (PartId, PartKind)> {
        [
            (self.primary, PartKind::Primary),
            (self.wireframe, PartKind::Wireframe),
            (self.label, PartKind::Label),
        ]
        .into_iter()
    }
}

/// Animated state written by the frame update and read by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectPose {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: f32,
    pub wireframe_opacity: f32,
    pub highlighted: bool,
}

#[derive(Debug, Clone)]
pub struct SceneObject {
    pub id: ObjectId,
    /// Index of the source item in the registry's item list.
    pub item_index: usize,
    base_position: Vec3,
    pub float_phase: f32,
    pub float_speed: f32,
    pub shape: Shape,
    pub size: f32,
    pub color: u32,
    pub opacity: f32,
    pub label: LabelSpec,
    pub parts: ObjectParts,
    pub pose: ObjectPose,
}

impl SceneObject {
    pub fn base_position(&self) -> Vec3 {
        self.base_position
    }

    /// World position of the label billboard at the current pose.
    pub fn label_position(&self) -> Vec3 {
        self.pose.translation + label::label_offset(self.size)
    }
}

/// Every object of the current scene plus the part-to-owner index.
///
/// Rebuilt as a whole whenever the item list changes.
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    items: Vec<DisplayItem>,
    objects: Vec<SceneObject>,
    by_item_id: HashMap<String, ObjectId>,
    part_owner: HashMap<PartId, (ObjectId, PartKind)>,
}

impl ObjectRegistry {
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut [SceneObject] {
        &mut self.objects
    }

    pub fn items(&self) -> &[DisplayItem] {
        &self.items
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0 as usize)
    }

    /// Item an object was built from.
    pub fn item_of(&self, id: ObjectId) -> Option<&DisplayItem> {
        self.get(id).and_then(|obj| self.items.get(obj.item_index))
    }

    pub fn find_by_item_id(&self, item_id: &str) -> Option<ObjectId> {
        self.by_item_id.get(item_id).copied()
    }

    /// Owning object of any sub-part.
    pub fn owner_of(&self, part: PartId) -> Option<ObjectId> {
        self.part_owner.get(&part).map(|(owner, _)| *owner)
    }

    pub fn part_kind(&self, part: PartId) -> Option<PartKind> {
        self.part_owner.get(&part).map(|(_, kind)| *kind)
    }

    pub(crate) fn push(&mut self, item: DisplayItem, mut object: SceneObject) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        object.id = id;
        object.item_index = self.items.len();

        for (part, kind) in object.parts.iter() {
            self.part_owner.insert(part, (id, kind));
        }
        self.by_item_id.insert(item.id.clone(), id);
        self.items.push(item);
        self.objects.push(object);
        id
    }
}
