//! Square-based pyramid. The base is horizontal, the apex sits above the base
//! centre, and the whole solid is vertically centred on the object position.

use crate::{
    aabb::Aabb,
    algebra::Vec3,
    ray::{Hit, Ray, EPSILON, PARALLEL_EPS},
};

/// Far bound of the clipping interval before any exit plane is seen.
const T_FAR: f32 = 1e30;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pyramid {
    pub base_size: f32,
    pub height: f32,
}

impl Default for Pyramid {
    fn default() -> Self { Self { base_size: 1.0, height: 1.0 } }
}

/// Plane `n·p + d = 0` with the solid on the negative side.
#[derive(Clone, Copy, Debug)]
struct HalfSpace {
    n: Vec3,
    d: f32,
}

impl HalfSpace {
    /// Plane through three points, flipped so that `inside` is behind it.
    fn through(p0: Vec3, p1: Vec3, p2: Vec3, inside: Vec3) -> Self {
        let n = (p1 - p0).cross(p2 - p0).normalized();
        let d = -n.dot(p0);
        if n.dot(inside) + d > 0.0 {
            Self { n: -n, d: -d }
        } else {
            Self { n, d }
        }
    }

    fn distance(&self, p: Vec3) -> f32 {
        self.n.dot(p) + self.d
    }
}

impl Pyramid {
    pub fn new(base_size: f32, height: f32) -> Self {
        Self { base_size, height }
    }

    fn base_y(&self, center: Vec3) -> f32 { center.y - self.height * 0.5 }
    fn apex_y(&self, center: Vec3) -> f32 { center.y + self.height * 0.5 }

    pub fn apex(&self, center: Vec3) -> Vec3 {
        Vec3::new(center.x, self.apex_y(center), center.z)
    }

    /// Base plane followed by the four sides.
    fn faces(&self, center: Vec3) -> [HalfSpace; 5] {
        let half = self.base_size * 0.5;
        let base_y = self.base_y(center);
        let apex = self.apex(center);
        let a = Vec3::new(center.x - half, base_y, center.z - half);
        let b = Vec3::new(center.x + half, base_y, center.z - half);
        let c = Vec3::new(center.x + half, base_y, center.z + half);
        let d = Vec3::new(center.x - half, base_y, center.z + half);

        [
            HalfSpace { n: -Vec3::Y, d: base_y },
            HalfSpace::through(apex, b, a, center),
            HalfSpace::through(apex, c, b, center),
            HalfSpace::through(apex, d, c, center),
            HalfSpace::through(apex, a, d, center),
        ]
    }

    /// Convex clipping: shrink `[t_enter, t_exit]` against every face and
    /// report the entry point.
    pub fn hit(&self, center: Vec3, ray: &Ray) -> Option<Hit> {
        let mut t_enter = EPSILON;
        let mut t_exit = T_FAR;
        let mut enter_normal = Vec3::Y;

        for face in self.faces(center) {
            let denom = face.n.dot(ray.direction);
            let dist = face.distance(ray.origin);
            if denom.abs() < PARALLEL_EPS {
                if dist > 0.0 {
                    return None;
                }
                continue;
            }
            let t = -dist / denom;
            if denom > 0.0 {
                t_exit = t_exit.min(t);
            } else if t > t_enter {
                t_enter = t;
                enter_normal = face.n;
            }
            if t_enter > t_exit {
                return None;
            }
        }

        // A ray that starts inside never raises t_enter past EPSILON.
        (t_enter > EPSILON).then(|| Hit::new(ray, t_enter, enter_normal))
    }

    pub fn bounding_box(&self, center: Vec3) -> Aabb {
        let half = self.base_size * 0.5;
        Aabb::new(
            Vec3::new(center.x - half, self.base_y(center), center.z - half),
            Vec3::new(center.x + half, self.apex_y(center), center.z + half),
        )
    }

    pub fn contains(&self, center: Vec3, p: Vec3) -> bool {
        if p.y < self.base_y(center) || p.y > self.apex_y(center) {
            return false;
        }
        self.faces(center).iter().all(|f| f.distance(p) <= 0.0)
    }
}
