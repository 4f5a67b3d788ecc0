use crate::{
    aabb::Aabb,
    algebra::Vec3,
    ray::{Hit, Ray, EPSILON, PARALLEL_EPS},
};

/// Half-extent used to box an infinite plane.
const PLANE_EXTENT: f32 = 1000.0;

/// Distance from the supporting plane within which a point counts as "on" it.
const ON_PLANE_TOL: f32 = 0.1;

/// Forward `t` where `ray` meets the plane through `point` with unit `normal`.
/// `None` when the ray runs parallel to the plane or the crossing is behind it.
pub(crate) fn plane_t(point: Vec3, normal: Vec3, ray: &Ray) -> Option<f32> {
    let denom = normal.dot(ray.direction);
    if denom.abs() < PARALLEL_EPS {            // ray ‖ plane
        return None;
    }
    let t = (point - ray.origin).dot(normal) / denom;
    (t > EPSILON).then_some(t)
}

/// Orthonormal in-plane basis `(u, v)` for a unit `normal`.
pub(crate) fn plane_basis(normal: Vec3) -> (Vec3, Vec3) {
    let reference = if normal.y.abs() < 0.95 { Vec3::Y } else { Vec3::X };
    let u = normal.cross(reference).normalized();
    let v = u.cross(normal).normalized();
    (u, v)
}

fn on_plane(point: Vec3, normal: Vec3, p: Vec3) -> bool {
    (p - point).dot(normal).abs() < ON_PLANE_TOL
}

/// Infinite plane through the object position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
}

impl Default for Plane {
    fn default() -> Self { Self { normal: Vec3::Y } }
}

impl Plane {
    pub fn new(normal: Vec3) -> Self {
        Self { normal: normal.normalized() }
    }

    pub fn hit(&self, point: Vec3, ray: &Ray) -> Option<Hit> {
        let t = plane_t(point, self.normal, ray)?;
        Some(Hit::new(ray, t, self.normal))
    }

    pub fn bounding_box(&self, _point: Vec3) -> Aabb {
        Aabb::around(Vec3::ZERO, Vec3::splat(PLANE_EXTENT))
    }

    pub fn contains(&self, point: Vec3, p: Vec3) -> bool {
        on_plane(point, self.normal, p)
    }
}

/// Finite rectangle centred on the object position. `width` runs along the
/// `u` axis of [`plane_basis`], `height` along `v`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectPlane {
    pub normal: Vec3,
    pub width: f32,
    pub height: f32,
}

impl Default for RectPlane {
    fn default() -> Self { Self { normal: Vec3::Y, width: 2.0, height: 2.0 } }
}

impl RectPlane {
    pub fn new(width: f32, height: f32, normal: Vec3) -> Self {
        Self { normal: normal.normalized(), width, height }
    }

    fn within_extents(&self, d: Vec3) -> bool {
        let (u, v) = plane_basis(self.normal);
        d.dot(u).abs() <= self.width * 0.5 && d.dot(v).abs() <= self.height * 0.5
    }

    pub fn hit(&self, center: Vec3, ray: &Ray) -> Option<Hit> {
        let t = plane_t(center, self.normal, ray)?;
        let hit = Hit::new(ray, t, self.normal);
        self.within_extents(hit.point - center).then_some(hit)
    }

    pub fn bounding_box(&self, center: Vec3) -> Aabb {
        let (u, v) = plane_basis(self.normal);
        let hu = u * (self.width * 0.5);
        let hv = v * (self.height * 0.5);
        let corners = [center + hu + hv, center + hu - hv, center - hu + hv, center - hu - hv];
        Aabb::new(
            corners.iter().fold(corners[0], |m, c| m.min(*c)),
            corners.iter().fold(corners[0], |m, c| m.max(*c)),
        )
        .pad(self.normal * 0.01)
    }

    pub fn contains(&self, center: Vec3, p: Vec3) -> bool {
        on_plane(center, self.normal, p) && self.within_extents(p - center)
    }
}
