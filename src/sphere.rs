//! src/sphere.rs
//! -------------
//! Sphere of constant radius around the object position.

use crate::{
    aabb::Aabb,
    algebra::Vec3,
    ray::{Hit, Ray, EPSILON},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub radius: f32,
}

impl Default for Sphere {
    fn default() -> Self { Self { radius: 1.0 } }
}

impl Sphere {
    /// Intersect a ray with the sphere centred at `center`.
    /// Returns the *closest forward* hit; the far root is used when the ray
    /// starts inside.
    pub fn hit(&self, center: Vec3, ray: &Ray) -> Option<Hit> {
        // Analytic quadratic
        let oc   = ray.origin - center;
        let a    = ray.direction.dot(ray.direction);
        let b    = 2.0 * oc.dot(ray.direction);
        let c    = oc.dot(oc) - self.radius * self.radius;
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 { return None; }

        let sqrt_d = disc.sqrt();
        let t1 = (-b - sqrt_d) / (2.0 * a);
        let t2 = (-b + sqrt_d) / (2.0 * a);
        let t = if t1 > EPSILON {
            t1
        } else if t2 > EPSILON {
            t2
        } else {
            return None;
        };

        let point = ray.at(t);
        Some(Hit { t, point, normal: (point - center).normalized() })
    }

    pub fn bounding_box(&self, center: Vec3) -> Aabb {
        Aabb::around(center, Vec3::splat(self.radius))
    }

    pub fn contains(&self, center: Vec3, p: Vec3) -> bool {
        (p - center).length_squared() <= self.radius * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_through_center_hits_near_side() {
        let s = Sphere { radius: 1.0 };
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = s.hit(Vec3::ZERO, &ray).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-5);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn ray_from_inside_uses_far_root() {
        let s = Sphere { radius: 2.0 };
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let hit = s.hit(Vec3::ZERO, &ray).unwrap();
        assert!((hit.t - 2.0).abs() < 1e-5);
        assert!((hit.normal - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn miss_and_behind() {
        let s = Sphere::default();
        let off = Ray::new(Vec3::new(0.0, 2.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(s.hit(Vec3::ZERO, &off).is_none());
        let behind = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(s.hit(Vec3::ZERO, &behind).is_none());
    }

    #[test]
    fn normal_is_parallel_to_radius_vector() {
        let s = Sphere { radius: 1.5 };
        let c = Vec3::new(1.0, -1.0, 0.5);
        let ray = Ray::new(Vec3::new(4.0, 2.0, 3.0), c - Vec3::new(4.0, 2.0, 3.0));
        let hit = s.hit(c, &ray).unwrap();
        let radial = (hit.point - c).normalized();
        assert!(radial.cross(hit.normal).length() < 1e-4);
        assert!(radial.dot(hit.normal) > 0.0);
        assert!(s.contains(c, hit.point - hit.normal * 1e-4));
    }
}
