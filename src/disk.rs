use crate::{
    aabb::Aabb,
    algebra::Vec3,
    plane::plane_t,
    ray::{Hit, Ray},
};

/// Flat disk centred on the object position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Disk {
    pub normal: Vec3,
    pub radius: f32,
}

impl Default for Disk {
    fn default() -> Self { Self { normal: Vec3::Y, radius: 1.0 } }
}

impl Disk {
    pub fn new(radius: f32, normal: Vec3) -> Self {
        Self { normal: normal.normalized(), radius }
    }

    pub fn hit(&self, center: Vec3, ray: &Ray) -> Option<Hit> {
        let t = plane_t(center, self.normal, ray)?;
        let hit = Hit::new(ray, t, self.normal);
        ((hit.point - center).length_squared() <= self.radius * self.radius).then_some(hit)
    }

    /// Conservative: the full radius on every axis, regardless of orientation.
    pub fn bounding_box(&self, center: Vec3) -> Aabb {
        Aabb::around(center, Vec3::splat(self.radius))
    }

    pub fn contains(&self, center: Vec3, p: Vec3) -> bool {
        let d = p - center;
        d.dot(self.normal).abs() <= 0.1 && d.length_squared() <= self.radius * self.radius
    }
}
