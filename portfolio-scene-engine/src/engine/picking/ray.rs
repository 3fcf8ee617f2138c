use bevy::math::{Mat4, Quat, Vec2, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        origin.is_finite().then_some(Self { origin, direction })
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Ray against a box of `size` centred on the transform's origin.
///
/// The ray is moved into the box's local frame; the direction is not
/// renormalised so the returned `t` stays in world units.
pub fn ray_hits_obb(ray: &Ray, transform: Mat4, size: Vec3) -> Option<f32> {
    let inv = transform.inverse();
    let o_local = inv.transform_point3(ray.origin);
    let d_local = inv.transform_vector3(ray.direction);
    let he = size * 0.5;
    ray_aabb_hit_t(o_local, d_local, -he, he)
}

// Slab-method ray-AABB intersection, returns Some(t) or None
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut tmin = f32::NEG_INFINITY;
    let mut tmax = f32::INFINITY;

    for axis in 0..3 {
        let o = ray_origin[axis];
        let d = ray_direction[axis];

        if d == 0.0 {
            // Parallel to this slab: inside it or never.
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let (mut t0, mut t1) = ((min[axis] - o) * inv, (max[axis] - o) * inv);
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        tmin = tmin.max(t0);
        tmax = tmax.min(t1);
        if tmin > tmax {
            return None;
        }
    }

    if tmax < 0.0 {
        return None;
    }
    Some(if tmin >= 0.0 { tmin } else { tmax })
}

pub fn ray_hits_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }

    let sq = disc.sqrt();
    let near = -b - sq;
    let far = -b + sq;
    if far < 0.0 {
        return None;
    }
    Some(if near >= 0.0 { near } else { far })
}

/// Ray against a capped cylinder along the transform's local Y axis.
pub fn ray_hits_cylinder(ray: &Ray, transform: Mat4, radius: f32, height: f32) -> Option<f32> {
    let inv = transform.inverse();
    let o = inv.transform_point3(ray.origin);
    let d = inv.transform_vector3(ray.direction);
    let half = height * 0.5;

    let mut best: Option<f32> = None;
    let mut consider = |t: f32| {
        if t >= 0.0 && best.is_none_or(|b| t < b) {
            best = Some(t);
        }
    };

    // Side wall.
    let a = d.x * d.x + d.z * d.z;
    if a > f32::EPSILON {
        let b = o.x * d.x + o.z * d.z;
        let c = o.x * o.x + o.z * o.z - radius * radius;
        let disc = b * b - a * c;
        if disc >= 0.0 {
            let sq = disc.sqrt();
            for t in [(-b - sq) / a, (-b + sq) / a] {
                let y = o.y + d.y * t;
                if y.abs() <= half {
                    consider(t);
                }
            }
        }
    }

    // Caps.
    if d.y.abs() > f32::EPSILON {
        for cap in [-half, half] {
            let t = (cap - o.y) / d.y;
            let x = o.x + d.x * t;
            let z = o.z + d.z * t;
            if x * x + z * z <= radius * radius {
                consider(t);
            }
        }
    }

    best
}

/// Ray against a rectangle centred at `center` that turns to face `eye`.
pub fn ray_hits_billboard(ray: &Ray, center: Vec3, size: Vec2, eye: Vec3) -> Option<f32> {
    let normal = (eye - center).try_normalize()?;
    let denom = ray.direction.dot(normal);
    if denom.abs() < 1e-6 {
        return None;
    }

    let t = (center - ray.origin).dot(normal) / denom;
    if t < 0.0 {
        return None;
    }

    let right = Vec3::Y.cross(normal).try_normalize().unwrap_or(Vec3::X);
    let up = normal.cross(right);
    let local = ray.at(t) - center;
    let inside = local.dot(right).abs() <= size.x * 0.5 && local.dot(up).abs() <= size.y * 0.5;
    inside.then_some(t)
}

pub fn object_matrix(translation: Vec3, rotation: Quat, scale: f32) -> Mat4 {
    Mat4::from_scale_rotation_translation(Vec3::splat(scale), rotation, translation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ray(origin: Vec3, dir: Vec3) -> Ray {
        Ray::new(origin, dir).unwrap()
    }

    #[test]
    fn aabb_front_and_inside() {
        let r = ray(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let t = ray_aabb_hit_t(r.origin, r.direction, Vec3::splat(-1.0), Vec3::ONE).unwrap();
        assert!((t - 9.0).abs() < 1e-5);

        let inside = ray_aabb_hit_t(Vec3::ZERO, Vec3::X, Vec3::splat(-1.0), Vec3::ONE).unwrap();
        assert!((inside - 1.0).abs() < 1e-5);
    }

    #[test]
    fn aabb_behind_misses() {
        let r = ray(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        assert_eq!(ray_aabb_hit_t(r.origin, r.direction, Vec3::splat(-1.0), Vec3::ONE), None);
    }

    #[test]
    fn obb_respects_rotation_and_scale() {
        let r = ray(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let thin = Vec3::new(4.0, 0.2, 0.2);

        let flat = object_matrix(Vec3::ZERO, Quat::IDENTITY, 1.0);
        assert!(ray_hits_obb(&r, flat, thin).is_some());

        // Bar offset along X.
        let offset = object_matrix(Vec3::new(1.5, 0.0, 0.0), Quat::IDENTITY, 1.0);
        assert!(ray_hits_obb(&r, offset, Vec3::new(1.0, 0.2, 0.2)).is_none());

        let scaled = object_matrix(Vec3::ZERO, Quat::IDENTITY, 2.0);
        let t = ray_hits_obb(&r, scaled, Vec3::ONE).unwrap();
        assert!((t - 9.0).abs() < 1e-4);
    }

    #[test]
    fn sphere_distance() {
        let r = ray(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let t = ray_hits_sphere(&r, Vec3::ZERO, 2.0).unwrap();
        assert!((t - 8.0).abs() < 1e-5);
        assert!(ray_hits_sphere(&r, Vec3::new(5.0, 0.0, 0.0), 2.0).is_none());
    }

    #[test]
    fn cylinder_side_and_cap() {
        let m = object_matrix(Vec3::ZERO, Quat::IDENTITY, 1.0);

        let side = ray(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let t = ray_hits_cylinder(&side, m, 1.0, 2.0).unwrap();
        assert!((t - 9.0).abs() < 1e-5);

        let top = ray(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y);
        let t = ray_hits_cylinder(&top, m, 1.0, 2.0).unwrap();
        assert!((t - 9.0).abs() < 1e-5);

        let over = ray(Vec3::new(0.0, 1.5, 10.0), Vec3::NEG_Z);
        assert!(ray_hits_cylinder(&over, m, 1.0, 2.0).is_none());
    }

    #[test]
    fn billboard_faces_the_eye() {
        let eye = Vec3::new(0.0, 0.0, 10.0);
        let r = ray(eye, Vec3::NEG_Z);
        let t = ray_hits_billboard(&r, Vec3::ZERO, Vec2::new(3.0, 0.75), eye).unwrap();
        assert!((t - 10.0).abs() < 1e-5);

        let high = ray(Vec3::new(0.0, 1.0, 10.0), Vec3::NEG_Z);
        assert!(ray_hits_billboard(&high, Vec3::ZERO, Vec2::new(3.0, 0.75), eye).is_none());
    }
}
