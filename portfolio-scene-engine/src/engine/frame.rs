//! Per-frame scene update.
//!
//! [`SceneState`] owns everything the scene needs between frames. The host
//! (the Bevy front end, or a test) feeds it input events and a frame delta
//! through [`update`] and gets back a [`Frame`] describing what to draw and
//! which events to forward.

use crate::engine::camera::{CameraController, CameraMode, CameraPose, Projection, Transition};
use crate::engine::config::SceneConfig;
use crate::engine::error::SceneError;
use crate::engine::events::SceneEvent;
use crate::engine::input::{Action, InputEvent, InputRouter};
use crate::engine::items::{DisplayItem, FocusOverlay};
use crate::engine::picking::pick_at;
use crate::engine::scene::builder::{BuildReport, build_scene};
use crate::engine::scene::particles::ParticleField;
use crate::engine::scene::{ObjectId, ObjectPose, ObjectRegistry};
use bevy::log::{debug, info, warn};
use bevy::math::{EulerRot, Quat, Vec2, Vec3};
use constants::animation::{FOCUS_SCALE_RATE, HIGHLIGHT_RATE, SPIN_WOBBLE_X, SPIN_WOBBLE_Z};
use constants::camera::MAX_FRAME_DELTA;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

/// Size of the drawing surface the scene is created for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceInfo {
    pub width: f32,
    pub height: f32,
}

/// Output of one [`update`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub camera: CameraPose,
    pub mode: CameraMode,
    pub events: Vec<SceneEvent>,
    pub elapsed: f32,
    /// Bumped on every rebuild; renderers respawn meshes when it changes.
    pub generation: u64,
    pub particle_opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneStatus {
    pub item_count: usize,
    pub mode: CameraMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focused: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
    pub hints: Vec<&'static str>,
    pub running: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeardownReport {
    pub objects_released: usize,
    pub particles_released: usize,
}

const FREE_HINTS: &[&str] = &[
    "WASD to move",
    "Space/E up, Q down",
    "Shift to move faster",
    "Drag to look around",
    "Click an item to focus",
];
const FOCUSED_HINTS: &[&str] = &["Esc or click outside to return"];

pub struct SceneState {
    config: SceneConfig,
    registry: ObjectRegistry,
    camera: CameraController,
    projection: Projection,
    router: InputRouter,
    particles: ParticleField,
    selected: Option<ObjectId>,
    pending_focus: Option<ObjectId>,
    /// Focused item that a rebuild dropped. The camera returns once it can
    /// and events keep naming this item until it is free.
    released: Option<DisplayItem>,
    outbox: Vec<SceneEvent>,
    clock: f32,
    running: bool,
    generation: u64,
    rng: StdRng,
}

impl SceneState {
    pub fn new(config: SceneConfig, surface: SurfaceInfo) -> Result<Self, SceneError> {
        Self::with_rng(config, surface, StdRng::from_entropy())
    }

    /// Same as [`SceneState::new`] with a caller-supplied random source, so
    /// layouts can be reproduced.
    pub fn with_rng(
        config: SceneConfig,
        surface: SurfaceInfo,
        mut rng: StdRng,
    ) -> Result<Self, SceneError> {
        config.validate()?;
        let projection = Projection::new(surface.width, surface.height, config.camera.fov_degrees)?;
        let particles = ParticleField::scatter(
            config.particles.count,
            config.particles.bounds,
            &mut rng,
        );

        info!(
            "Scene ready: {}x{} viewport, {} particles",
            surface.width,
            surface.height,
            particles.len()
        );

        Ok(Self {
            camera: CameraController::new(config.camera),
            config,
            registry: ObjectRegistry::default(),
            projection,
            router: InputRouter::default(),
            particles,
            selected: None,
            pending_focus: None,
            released: None,
            outbox: Vec::new(),
            clock: 0.0,
            running: true,
            generation: 0,
            rng,
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Replace the whole item set. Selection and focus follow their item
    /// ids into the new set when they survive.
    pub fn set_items(&mut self, items: &[DisplayItem]) -> BuildReport {
        if !self.running {
            warn!("Ignoring item refresh after teardown");
            return BuildReport::default();
        }

        let item_id_of = |registry: &ObjectRegistry, id: Option<ObjectId>| {
            id.and_then(|id| registry.item_of(id)).map(|item| item.id.clone())
        };
        let selected_item = item_id_of(&self.registry, self.selected);
        let pending_item = item_id_of(&self.registry, self.pending_focus);
        let focused_item = self.focused_item();

        let (registry, report) = build_scene(items, &self.config.layout, &mut self.rng);
        self.registry = registry;
        self.generation += 1;

        let remap = |item: Option<String>| item.and_then(|id| self.registry.find_by_item_id(&id));
        self.selected = remap(selected_item);
        self.pending_focus = remap(pending_item);

        if self.camera.mode() == CameraMode::Free {
            return report;
        }
        let Some(focused_item) = focused_item else {
            return report;
        };
        let survivor = self
            .registry
            .find_by_item_id(&focused_item.id)
            .and_then(|id| self.registry.get(id).map(|obj| (id, obj.pose.translation)));
        match survivor {
            Some((id, position)) => {
                self.camera.retarget(id, position);
                self.released = None;
            }
            None => {
                debug!("Focused item {} dropped by refresh", focused_item.id);
                self.released = Some(focused_item);
            }
        }

        report
    }

    /// Focus an item by id as if it had been clicked.
    pub fn focus_item(&mut self, item_id: &str) -> Option<Transition> {
        let object = self.registry.find_by_item_id(item_id)?;
        Some(self.resolve_hit(object))
    }

    /// Leave focus. Only honoured while fully focused.
    pub fn request_exit(&mut self) -> Transition {
        let item = self.focused_item();
        let transition = self.camera.request_exit(self.clock);
        if transition == Transition::Started(CameraMode::ExitingFocus) {
            self.outbox.push(SceneEvent::FocusChanged {
                item,
                state: CameraMode::ExitingFocus,
            });
        }
        transition
    }

    pub fn status(&self) -> SceneStatus {
        let mode = self.camera.mode();
        let hints = match mode {
            CameraMode::Free => FREE_HINTS.to_vec(),
            CameraMode::Focused => FOCUSED_HINTS.to_vec(),
            _ => Vec::new(),
        };

        SceneStatus {
            item_count: self.registry.len(),
            mode,
            focused: self.focused_item().map(|item| item.id),
            selected: self
                .selected
                .and_then(|id| self.registry.item_of(id))
                .map(|item| item.id.clone()),
            hints,
            running: self.running,
        }
    }

    /// Detail panel for the focused item while the camera is on its way in
    /// or parked.
    pub fn overlay(&self) -> Option<FocusOverlay> {
        match self.camera.mode() {
            CameraMode::EnteringFocus | CameraMode::Focused => {
                self.focused_item().map(|item| FocusOverlay::from_item(&item))
            }
            _ => None,
        }
    }

    /// Stop the loop and release scene content. Safe to call twice.
    pub fn teardown(&mut self) -> TeardownReport {
        if !self.running {
            return TeardownReport::default();
        }

        let report = TeardownReport {
            objects_released: self.registry.len(),
            particles_released: self.particles.len(),
        };

        self.running = false;
        self.registry = ObjectRegistry::default();
        self.particles = ParticleField::scatter(0, self.particles.bounds, &mut self.rng);
        self.router.release_all();
        self.selected = None;
        self.pending_focus = None;
        self.released = None;
        self.outbox.clear();
        self.generation += 1;

        info!(
            "Scene torn down ({} objects, {} particles released)",
            report.objects_released, report.particles_released
        );
        report
    }

    /// Object the camera is focused on. `None` once a rebuild dropped it,
    /// since its old id may now belong to an unrelated object.
    fn focus_object(&self) -> Option<ObjectId> {
        if self.released.is_some() {
            return None;
        }
        self.camera.focused_object()
    }

    fn focused_item(&self) -> Option<DisplayItem> {
        if let Some(item) = &self.released {
            return Some(item.clone());
        }
        self.focus_object()
            .and_then(|id| self.registry.item_of(id))
            .cloned()
    }

    fn item(&self, id: ObjectId) -> Option<DisplayItem> {
        self.registry.item_of(id).cloned()
    }

    fn begin_focus(&mut self, object: ObjectId) -> Transition {
        let Some(position) = self.registry.get(object).map(|o| o.pose.translation) else {
            return Transition::Rejected;
        };

        let transition = self.camera.begin_focus(object, position, self.clock);
        if transition == Transition::Started(CameraMode::EnteringFocus) {
            self.selected = Some(object);
            self.outbox.push(SceneEvent::FocusChanged {
                item: self.item(object),
                state: CameraMode::EnteringFocus,
            });
        }
        transition
    }

    /// Click (or focus request) landing on an object.
    fn resolve_hit(&mut self, object: ObjectId) -> Transition {
        let mode = self.camera.mode();
        if mode.is_transitioning() {
            debug!("Ignoring focus request during camera transition");
            return Transition::Rejected;
        }

        match mode {
            CameraMode::Free => {
                self.outbox.push(SceneEvent::Selected {
                    item: self.item(object),
                });
                self.begin_focus(object)
            }
            _ if self.focus_object() == Some(object) => {
                self.outbox.push(SceneEvent::Selected {
                    item: self.item(object),
                });
                Transition::Rejected
            }
            _ => {
                self.outbox.push(SceneEvent::Selected {
                    item: self.item(object),
                });
                self.selected = Some(object);
                self.pending_focus = Some(object);
                self.request_exit()
            }
        }
    }

    fn resolve_miss(&mut self) {
        match self.camera.mode() {
            CameraMode::Free => {
                self.selected = None;
                self.outbox.push(SceneEvent::Selected { item: None });
            }
            CameraMode::Focused => {
                self.selected = None;
                self.outbox.push(SceneEvent::Selected { item: None });
                self.request_exit();
            }
            CameraMode::EnteringFocus | CameraMode::ExitingFocus => {}
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Look(delta) => self.camera.look(delta),
            Action::Pick(ndc) => {
                let hit = pick_at(ndc, &self.camera.pose(), &self.projection, &self.registry);
                match hit {
                    Some(hit) => {
                        self.resolve_hit(hit.object);
                    }
                    None => self.resolve_miss(),
                }
            }
            Action::ExitFocus => {
                self.request_exit();
            }
            Action::Resize { width, height } => {
                if let Err(err) = self.projection.resize(width, height) {
                    warn!("Keeping previous viewport: {err}");
                }
            }
        }
    }

    fn animate_objects(&mut self) {
        let t = self.clock;
        let anim = self.config.animation;
        let focused = self.focus_object();
        let calm = self.camera.mode() != CameraMode::Free;
        let amplitude = if calm {
            anim.float_amplitude_focused
        } else {
            anim.float_amplitude
        };
        let spin = if calm {
            anim.spin_speed_focused
        } else {
            anim.spin_speed
        };
        let selected = self.selected;

        for (i, obj) in self.registry.objects_mut().iter_mut().enumerate() {
            let base = obj.base_position();
            let y = base.y + (t * obj.float_speed + obj.float_phase).sin() * amplitude;
            let angle = t * spin + i as f32;
            let rotation = Quat::from_euler(
                EulerRot::XYZ,
                angle.sin() * SPIN_WOBBLE_X,
                angle,
                angle.cos() * SPIN_WOBBLE_Z,
            );

            let (scale, wireframe_opacity, highlighted) = if focused == Some(obj.id) {
                (
                    anim.focus_scale_base + (t * FOCUS_SCALE_RATE).sin() * anim.focus_scale_pulse,
                    anim.highlight_opacity_base
                        + (t * HIGHLIGHT_RATE).sin() * anim.highlight_opacity_pulse,
                    true,
                )
            } else if selected == Some(obj.id) {
                (1.0, anim.selected_wireframe_opacity, true)
            } else {
                (1.0, anim.idle_wireframe_opacity, false)
            };

            let pose = ObjectPose {
                translation: Vec3::new(base.x, y, base.z),
                rotation,
                scale,
                wireframe_opacity,
                highlighted,
            };

            // Keep the last good pose if the maths went non-finite.
            if pose.translation.is_finite() && pose.rotation.is_finite() && scale.is_finite() {
                obj.pose = pose;
            }
        }
    }

    fn advance_camera(&mut self, dt: f32) {
        if self.camera.mode() == CameraMode::Free {
            let keys = *self.router.keys();
            self.camera.fly(&keys, dt);
            return;
        }

        let look_at = self
            .focus_object()
            .and_then(|id| self.registry.get(id))
            .map(|obj| obj.pose.translation);

        match self.camera.tick(self.clock, look_at) {
            // Arrived at an item that no longer exists: turn straight round.
            Some(Transition::Completed(CameraMode::Focused)) if self.released.is_some() => {
                self.request_exit();
            }
            Some(Transition::Completed(CameraMode::Focused)) => {
                self.outbox.push(SceneEvent::FocusChanged {
                    item: self.focused_item(),
                    state: CameraMode::Focused,
                });
            }
            Some(Transition::Completed(CameraMode::Free)) => {
                self.released = None;
                self.outbox.push(SceneEvent::FocusChanged {
                    item: None,
                    state: CameraMode::Free,
                });
                if let Some(next) = self.pending_focus.take() {
                    self.begin_focus(next);
                }
            }
            _ => {
                if self.released.is_some() && self.camera.mode() == CameraMode::Focused {
                    self.request_exit();
                }
            }
        }
    }
}

fn sanitize_delta(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt.min(MAX_FRAME_DELTA)
    } else {
        0.0
    }
}

/// Advance the scene by one display refresh.
///
/// Order: input, object motion, particles, camera. Events raised by any
/// step (or by calls made since the previous frame) are returned in order.
pub fn update(state: &mut SceneState, input: &[InputEvent], dt: f32) -> Frame {
    if !state.running {
        return Frame {
            camera: state.camera.pose(),
            mode: state.camera.mode(),
            events: Vec::new(),
            elapsed: state.clock,
            generation: state.generation,
            particle_opacity: 0.0,
        };
    }

    let dt = sanitize_delta(dt);
    state.clock += dt;

    for event in input {
        let mode = state.camera.mode();
        let viewport = state.projection;
        let actions = state
            .router
            .route(*event, mode, |px: Vec2| viewport.pixel_to_ndc(px));
        for action in actions {
            state.apply(action);
        }
    }

    state.animate_objects();

    let calm = state.camera.mode() != CameraMode::Free;
    let particles = state.config.particles;
    let (speed, opacity) = if calm {
        (particles.speed_focused, particles.opacity_focused)
    } else {
        (particles.speed, particles.opacity)
    };
    state.particles.advance(state.clock, dt, speed, opacity);

    state.advance_camera(dt);

    Frame {
        camera: state.camera.pose(),
        mode: state.camera.mode(),
        events: std::mem::take(&mut state.outbox),
        elapsed: state.clock,
        generation: state.generation,
        particle_opacity: state.particles.opacity,
    }
}
