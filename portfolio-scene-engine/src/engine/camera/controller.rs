use super::projection::CameraPose;
use crate::engine::input::MotionKeys;
use crate::engine::scene::ObjectId;
use bevy::log::debug;
use bevy::math::{EulerRot, Quat, Vec2, Vec3};
use constants::camera::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraMode {
    #[default]
    #[serde(rename = "free")]
    Free,
    #[serde(rename = "entering")]
    EnteringFocus,
    #[serde(rename = "focused")]
    Focused,
    #[serde(rename = "exiting")]
    ExitingFocus,
}

impl CameraMode {
    pub fn is_transitioning(&self) -> bool {
        matches!(self, CameraMode::EnteringFocus | CameraMode::ExitingFocus)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub fov_degrees: f32,
    pub start_position: Vec3,
    pub standoff: f32,
    pub enter_secs: f32,
    pub exit_secs: f32,
    pub fly_speed: f32,
    pub boost: f32,
    pub look_sensitivity: f32,
    pub pitch_limit_degrees: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: FOV_DEGREES,
            start_position: Vec3::from(START_POSITION),
            standoff: STANDOFF_DISTANCE,
            enter_secs: FOCUS_ENTER_SECS,
            exit_secs: FOCUS_EXIT_SECS,
            fly_speed: FLY_SPEED,
            boost: FLY_BOOST,
            look_sensitivity: LOOK_SENSITIVITY,
            pitch_limit_degrees: PITCH_LIMIT_DEGREES,
        }
    }
}

/// Outcome of a focus request or a transition tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started(CameraMode),
    Completed(CameraMode),
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusTarget {
    pub object: ObjectId,
    pub look_at: Vec3,
    pub standoff_position: Vec3,
}

/// Wall-clock driven interpolation between two camera poses.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Tween {
    from: Vec3,
    to: Vec3,
    from_rotation: Quat,
    to_rotation: Quat,
    started_at: f32,
    duration: f32,
}

impl Tween {
    fn progress(&self, now: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / self.duration).clamp(0.0, 1.0)
    }
}

pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Yaw/pitch (camera looks down -Z) pointing from `from` towards `target`.
pub fn aim(from: Vec3, target: Vec3) -> Option<(f32, f32)> {
    let dir = (target - from).try_normalize()?;
    let yaw = (-dir.x).atan2(-dir.z);
    let pitch = dir.y.clamp(-1.0, 1.0).asin();
    Some((yaw, pitch))
}

fn orientation(yaw: f32, pitch: f32) -> Quat {
    Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0)
}

/// Camera state machine: `Free -> EnteringFocus -> Focused -> ExitingFocus -> Free`.
#[derive(Debug, Clone)]
pub struct CameraController {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    rotation: Quat,
    mode: CameraMode,
    saved_position: Option<Vec3>,
    saved_orientation: (f32, f32),
    focus: Option<FocusTarget>,
    tween: Option<Tween>,
    settings: CameraSettings,
}

impl CameraController {
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            position: settings.start_position,
            yaw: 0.0,
            pitch: 0.0,
            rotation: Quat::IDENTITY,
            mode: CameraMode::Free,
            saved_position: None,
            saved_orientation: (0.0, 0.0),
            focus: None,
            tween: None,
            settings,
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position,
            rotation: self.rotation,
        }
    }

    pub fn focus(&self) -> Option<&FocusTarget> {
        self.focus.as_ref()
    }

    pub fn focused_object(&self) -> Option<ObjectId> {
        self.focus.map(|f| f.object)
    }

    pub fn saved_position(&self) -> Option<Vec3> {
        self.saved_position
    }

    /// Start flying towards an object. Only accepted while free.
    pub fn begin_focus(&mut self, object: ObjectId, object_position: Vec3, now: f32) -> Transition {
        if self.mode != CameraMode::Free || !object_position.is_finite() {
            return Transition::Rejected;
        }

        let standoff_position = object_position + Vec3::Z * self.settings.standoff;
        self.saved_position = Some(self.position);
        self.saved_orientation = (self.yaw, self.pitch);
        self.focus = Some(FocusTarget {
            object,
            look_at: object_position,
            standoff_position,
        });
        self.tween = Some(Tween {
            from: self.position,
            to: standoff_position,
            from_rotation: self.rotation,
            to_rotation: self.rotation,
            started_at: now,
            duration: self.settings.enter_secs,
        });
        self.mode = CameraMode::EnteringFocus;

        debug!("Camera entering focus on {:?}", object);
        Transition::Started(CameraMode::EnteringFocus)
    }

    /// Keep following the same item after the registry was rebuilt: the
    /// object may have a new id and a new position. The standoff moves with
    /// it; a parked camera snaps there, an entering one re-aims its flight.
    pub fn retarget(&mut self, object: ObjectId, object_position: Vec3) {
        let Some(focus) = self.focus.as_mut() else {
            return;
        };
        focus.object = object;
        if !object_position.is_finite() {
            return;
        }

        let standoff_position = object_position + Vec3::Z * self.settings.standoff;
        focus.look_at = object_position;
        focus.standoff_position = standoff_position;

        match self.mode {
            CameraMode::EnteringFocus => {
                if let Some(tween) = self.tween.as_mut() {
                    tween.to = standoff_position;
                }
            }
            CameraMode::Focused => {
                self.position = standoff_position;
                self.aim_at_focus();
            }
            CameraMode::Free | CameraMode::ExitingFocus => {}
        }
        debug!("Camera retargeted to {:?}", object);
    }

    /// Start flying back to where the focus began. Only accepted while focused.
    pub fn request_exit(&mut self, now: f32) -> Transition {
        if self.mode != CameraMode::Focused {
            return Transition::Rejected;
        }

        let (yaw, pitch) = self.saved_orientation;
        self.tween = Some(Tween {
            from: self.position,
            to: self.saved_position.unwrap_or(self.position),
            from_rotation: self.rotation,
            to_rotation: orientation(yaw, pitch),
            started_at: now,
            duration: self.settings.exit_secs,
        });
        self.mode = CameraMode::ExitingFocus;

        debug!("Camera exiting focus");
        Transition::Started(CameraMode::ExitingFocus)
    }

    /// Advance a running transition. `look_at` is the focused object's
    /// current position, so the camera keeps aiming at it while it floats.
    pub fn tick(&mut self, now: f32, look_at: Option<Vec3>) -> Option<Transition> {
        if let (Some(focus), Some(target)) = (self.focus.as_mut(), look_at) {
            if target.is_finite() {
                focus.look_at = target;
            }
        }

        match self.mode {
            CameraMode::Free => None,
            CameraMode::Focused => {
                self.aim_at_focus();
                None
            }
            CameraMode::EnteringFocus => {
                let tween = self.tween?;
                let p = tween.progress(now);
                self.position = tween.from.lerp(tween.to, ease_out_cubic(p));
                self.aim_at_focus();

                if p >= 1.0 {
                    self.position = tween.to;
                    self.tween = None;
                    self.mode = CameraMode::Focused;
                    return Some(Transition::Completed(CameraMode::Focused));
                }
                None
            }
            CameraMode::ExitingFocus => {
                let tween = self.tween?;
                let p = tween.progress(now);
                let e = ease_out_cubic(p);
                self.position = tween.from.lerp(tween.to, e);
                self.rotation = tween.from_rotation.slerp(tween.to_rotation, e);

                if p >= 1.0 {
                    (self.yaw, self.pitch) = self.saved_orientation;
                    self.position = tween.to;
                    self.rotation = orientation(self.yaw, self.pitch);
                    self.tween = None;
                    self.focus = None;
                    self.mode = CameraMode::Free;
                    return Some(Transition::Completed(CameraMode::Free));
                }
                None
            }
        }
    }

    fn aim_at_focus(&mut self) {
        let Some(focus) = self.focus else {
            return;
        };
        if let Some((yaw, pitch)) = aim(self.position, focus.look_at) {
            self.rotation = orientation(yaw, pitch);
        }
    }

    /// Free-flight translation from the held movement keys.
    pub fn fly(&mut self, keys: &MotionKeys, dt: f32) {
        if self.mode != CameraMode::Free {
            return;
        }

        let mut input = Vec3::ZERO;
        if keys.forward {
            input.z -= 1.0;
        }
        if keys.back {
            input.z += 1.0;
        }
        if keys.right {
            input.x += 1.0;
        }
        if keys.left {
            input.x -= 1.0;
        }
        if keys.up {
            input.y += 1.0;
        }
        if keys.down {
            input.y -= 1.0;
        }
        if input == Vec3::ZERO {
            return;
        }

        let back = self.rotation * Vec3::Z;
        let right = self.rotation * Vec3::X;
        let world_delta = right * input.x + Vec3::Y * input.y + back * input.z;

        let mut speed = self.settings.fly_speed;
        if keys.boost {
            speed *= self.settings.boost;
        }
        if let Some(dir) = world_delta.try_normalize() {
            self.position += dir * speed * dt;
        }
    }

    /// Free-flight mouse look from a pointer delta in pixels.
    pub fn look(&mut self, delta: Vec2) {
        if self.mode != CameraMode::Free || !delta.is_finite() {
            return;
        }

        let limit = self.settings.pitch_limit_degrees.to_radians();
        self.yaw -= delta.x * self.settings.look_sensitivity;
        self.pitch = (self.pitch - delta.y * self.settings.look_sensitivity).clamp(-limit, limit);
        self.rotation = orientation(self.yaw, self.pitch);
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(CameraSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const OBJ: ObjectId = ObjectId(0);

    fn focused_camera(target: Vec3) -> CameraController {
        let mut cam = CameraController::default();
        assert_eq!(cam.begin_focus(OBJ, target, 0.0), Transition::Started(CameraMode::EnteringFocus));
        assert_eq!(cam.tick(2.0, Some(target)), Some(Transition::Completed(CameraMode::Focused)));
        cam
    }

    #[test]
    fn enter_lands_at_standoff() {
        let target = Vec3::new(3.0, 1.0, -4.0);
        let cam = focused_camera(target);

        assert_eq!(cam.mode(), CameraMode::Focused);
        assert_eq!(cam.position(), target + Vec3::new(0.0, 0.0, STANDOFF_DISTANCE));
        assert!(cam.pose().forward().abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }

    #[test]
    fn enter_then_exit_restores_saved_position() {
        let mut cam = CameraController::default();
        cam.look(Vec2::new(120.0, -40.0));
        let start = cam.position();
        let start_rotation = cam.rotation();

        cam.begin_focus(OBJ, Vec3::new(5.0, 2.0, 0.0), 10.0);
        cam.tick(10.7, None);
        assert_eq!(cam.mode(), CameraMode::EnteringFocus);
        cam.tick(11.5, None);
        assert_eq!(cam.mode(), CameraMode::Focused);

        assert_eq!(cam.request_exit(12.0), Transition::Started(CameraMode::ExitingFocus));
        cam.tick(12.5, None);
        assert_eq!(cam.mode(), CameraMode::ExitingFocus);
        assert_eq!(cam.tick(13.0, None), Some(Transition::Completed(CameraMode::Free)));

        assert_eq!(cam.position(), start);
        assert!(cam.rotation().angle_between(start_rotation) < 1e-4);
        assert!(cam.focus().is_none());
    }

    #[test]
    fn requests_rejected_while_transitioning() {
        let mut cam = CameraController::default();
        cam.begin_focus(OBJ, Vec3::ZERO, 0.0);

        assert_eq!(cam.begin_focus(ObjectId(1), Vec3::ONE, 0.5), Transition::Rejected);
        assert_eq!(cam.request_exit(0.5), Transition::Rejected);
        assert_eq!(cam.focused_object(), Some(OBJ));

        cam.tick(2.0, None);
        cam.request_exit(2.0);
        assert_eq!(cam.begin_focus(ObjectId(1), Vec3::ONE, 2.5), Transition::Rejected);
        assert_eq!(cam.request_exit(2.5), Transition::Rejected);
    }

    #[test]
    fn retarget_moves_parked_camera_to_new_standoff() {
        let mut cam = focused_camera(Vec3::new(-10.0, 0.0, 0.0));
        let moved = Vec3::new(4.0, 1.0, -2.0);

        cam.retarget(ObjectId(3), moved);
        assert_eq!(cam.mode(), CameraMode::Focused);
        assert_eq!(cam.focused_object(), Some(ObjectId(3)));
        assert_eq!(cam.position(), moved + Vec3::Z * STANDOFF_DISTANCE);
        assert!((cam.position().distance(moved) - STANDOFF_DISTANCE).abs() < 1e-4);
        assert!(cam.pose().forward().abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }

    #[test]
    fn retarget_while_entering_redirects_flight() {
        let mut cam = CameraController::default();
        cam.begin_focus(OBJ, Vec3::new(10.0, 0.0, 0.0), 0.0);
        cam.tick(0.5, None);

        let moved = Vec3::new(-6.0, 2.0, 1.0);
        cam.retarget(ObjectId(1), moved);
        assert_eq!(cam.focus().map(|f| f.standoff_position), Some(moved + Vec3::Z * STANDOFF_DISTANCE));

        assert_eq!(cam.tick(2.0, None), Some(Transition::Completed(CameraMode::Focused)));
        assert_eq!(cam.position(), moved + Vec3::Z * STANDOFF_DISTANCE);
    }

    #[test]
    fn exit_rejected_when_free() {
        let mut cam = CameraController::default();
        assert_eq!(cam.request_exit(0.0), Transition::Rejected);
        assert_eq!(cam.mode(), CameraMode::Free);
    }

    #[test]
    fn transition_is_eased() {
        let mut cam = CameraController::default();
        let from = cam.position();
        cam.begin_focus(OBJ, Vec3::new(0.0, 0.0, -20.0), 0.0);
        let to = Vec3::new(0.0, 0.0, -20.0 + STANDOFF_DISTANCE);

        cam.tick(FOCUS_ENTER_SECS * 0.5, None);
        let expected = from.lerp(to, ease_out_cubic(0.5));
        assert!(cam.position().abs_diff_eq(expected, 1e-4));
        // Ease-out covers more than half the distance at half time.
        assert!(cam.position().distance(from) > from.distance(to) * 0.5);
    }

    #[test]
    fn fly_and_look_only_when_free() {
        let mut cam = CameraController::default();
        let keys = MotionKeys {
            forward: true,
            ..Default::default()
        };
        cam.fly(&keys, 0.5);
        assert!(cam.position().abs_diff_eq(Vec3::new(0.0, 0.0, 20.0 - FLY_SPEED * 0.5), 1e-4));

        let boosted = MotionKeys {
            up: true,
            boost: true,
            ..Default::default()
        };
        let before = cam.position();
        cam.fly(&boosted, 1.0);
        assert!((cam.position().y - before.y - FLY_SPEED * FLY_BOOST).abs() < 1e-3);

        cam.begin_focus(OBJ, Vec3::ZERO, 0.0);
        let locked = cam.position();
        cam.fly(&keys, 1.0);
        let rotation = cam.rotation();
        cam.look(Vec2::new(300.0, 0.0));
        assert_eq!(cam.position(), locked);
        assert_eq!(cam.rotation(), rotation);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = CameraController::default();
        cam.look(Vec2::new(0.0, -100_000.0));
        let forward = cam.pose().forward();
        assert!(forward.y > 0.99);
    }

    #[test]
    fn random_sequences_keep_machine_consistent() {
        let mut rng = StdRng::seed_from_u64(2024);

        for _ in 0..50 {
            let mut cam = CameraController::default();
            let mut now = 0.0;
            let mut visited = vec![cam.mode()];

            for _ in 0..200 {
                now += rng.gen_range(0.0..0.6);
                let before = cam.mode();
                match rng.gen_range(0..3) {
                    0 => {
                        let target = Vec3::new(rng.gen_range(-10.0..10.0), 0.0, rng.gen_range(-10.0..10.0));
                        let accepted = cam.begin_focus(OBJ, target, now) != Transition::Rejected;
                        assert_eq!(accepted, before == CameraMode::Free);
                    }
                    1 => {
                        let accepted = cam.request_exit(now) != Transition::Rejected;
                        assert_eq!(accepted, before == CameraMode::Focused);
                    }
                    _ => {
                        cam.tick(now, None);
                    }
                }

                let after = cam.mode();
                let legal = after == before
                    || matches!(
                        (before, after),
                        (CameraMode::Free, CameraMode::EnteringFocus)
                            | (CameraMode::EnteringFocus, CameraMode::Focused)
                            | (CameraMode::Focused, CameraMode::ExitingFocus)
                            | (CameraMode::ExitingFocus, CameraMode::Free)
                    );
                assert!(legal, "{before:?} -> {after:?}");
                assert_eq!(after != CameraMode::Free, cam.focus().is_some());
                if !visited.contains(&after) {
                    visited.push(after);
                }
            }
            assert!(cam.position().is_finite());
            assert!(visited.len() >= 2);
        }
    }
}
