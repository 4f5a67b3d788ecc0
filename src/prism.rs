//! Axis-aligned box ("prism") centred on the object position.

use crate::{
    aabb::Aabb,
    algebra::Vec3,
    ray::{Hit, Ray, EPSILON},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prism {
    /// Full edge lengths along x, y and z.
    pub size: Vec3,
}

impl Default for Prism {
    fn default() -> Self { Self { size: Vec3::splat(1.0) } }
}

/// Entry/exit parameters of the ray against one axis slab `[lo, hi]`.
/// A zero direction component is either always inside the slab or never.
fn slab(origin: f32, dir: f32, lo: f32, hi: f32) -> Option<(f32, f32)> {
    if dir == 0.0 {
        return (lo..=hi).contains(&origin).then_some((f32::NEG_INFINITY, f32::INFINITY));
    }
    let inv = 1.0 / dir;
    let (t0, t1) = ((lo - origin) * inv, (hi - origin) * inv);
    Some(if inv < 0.0 { (t1, t0) } else { (t0, t1) })
}

impl Prism {
    pub fn new(size: Vec3) -> Self {
        Self { size }
    }

    fn half(&self) -> Vec3 {
        self.size * 0.5
    }

    /// Slab test. Only the entry face is reported, so a ray starting inside
    /// the box does not hit it.
    pub fn hit(&self, center: Vec3, ray: &Ray) -> Option<Hit> {
        let bounds = self.bounding_box(center);
        let (o, d) = (ray.origin, ray.direction);

        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;
        for (o, d, lo, hi) in [
            (o.x, d.x, bounds.min.x, bounds.max.x),
            (o.y, d.y, bounds.min.y, bounds.max.y),
            (o.z, d.z, bounds.min.z, bounds.max.z),
        ] {
            let (near, far) = slab(o, d, lo, hi)?;
            if t_min > far || near > t_max {
                return None;
            }
            t_min = t_min.max(near);
            t_max = t_max.min(far);
        }

        if t_min <= EPSILON || !t_min.is_finite() {
            return None;
        }
        let point = ray.at(t_min);
        Some(Hit { t: t_min, point, normal: self.face_normal(point - center) })
    }

    /// Outward normal of the face nearest to `local` (relative to the centre).
    /// Each axis is measured against its own half extent (`|local| / half`),
    /// not by raw `|local|`, so flat boxes pick the right face.
    fn face_normal(&self, local: Vec3) -> Vec3 {
        let half = self.half().max(Vec3::splat(f32::MIN_POSITIVE));
        let rel = Vec3::new(local.x / half.x, local.y / half.y, local.z / half.z).abs();
        let sign = |v: f32| if v > 0.0 { 1.0 } else { -1.0 };
        if rel.x >= rel.y && rel.x >= rel.z {
            Vec3::new(sign(local.x), 0.0, 0.0)
        } else if rel.y >= rel.z {
            Vec3::new(0.0, sign(local.y), 0.0)
        } else {
            Vec3::new(0.0, 0.0, sign(local.z))
        }
    }

    pub fn bounding_box(&self, center: Vec3) -> Aabb {
        Aabb::around(center, self.half())
    }

    pub fn contains(&self, center: Vec3, p: Vec3) -> bool {
        self.bounding_box(center).contains(p)
    }
}
