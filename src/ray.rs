//! Rays and shape-level hit records.

use crate::algebra::Vec3;

/// Smallest accepted forward distance along a ray. Keeps secondary rays
/// from re-hitting the surface they start on.
pub const EPSILON: f32 = 0.001;

/// Below this `|n·d|` a ray counts as parallel to a plane.
pub const PARALLEL_EPS: f32 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length, or zero for a degenerate input direction.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction: direction.normalized() }
    }

    /// Point at parameter `t`: `origin + direction * t`.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Nearest forward intersection of a ray with a single shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub t: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

impl Hit {
    pub fn new(ray: &Ray, t: f32, normal: Vec3) -> Self {
        Self { t, point: ray.at(t), normal }
    }
}
